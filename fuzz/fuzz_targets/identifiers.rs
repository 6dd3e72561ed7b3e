#![no_main]

use arbitrary::Arbitrary;
use healthcare_client::gate::same_address;
use healthcare_client::{AccountId, ContractId, PatientId};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    ParseAccount { raw: String },
    ParseContract { raw: String },
    ParsePatientId { raw: String },
    CompareAddresses { left: String, right: String },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    for action in actions {
        match action {
            FuzzAction::ParseAccount { raw } => {
                if let Ok(id) = AccountId::parse(&raw) {
                    // Canonical form must re-parse to itself, in any case.
                    assert_eq!(AccountId::parse(id.as_str()).as_ref(), Ok(&id));
                    assert_eq!(AccountId::parse(&id.as_str().to_lowercase()), Ok(id));
                }
            }
            FuzzAction::ParseContract { raw } => {
                if let Ok(id) = ContractId::parse(&raw) {
                    assert!(AccountId::parse(id.as_str()).is_ok());
                }
            }
            FuzzAction::ParsePatientId { raw } => {
                if let Ok(id) = PatientId::parse(&raw) {
                    assert_eq!(PatientId::parse(&id.to_string()), Ok(id));
                }
            }
            FuzzAction::CompareAddresses { left, right } => {
                assert_eq!(same_address(&left, &right), same_address(&right, &left));
                assert!(same_address(&left, &left));
            }
        }
    }
});
