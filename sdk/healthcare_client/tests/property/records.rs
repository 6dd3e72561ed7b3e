//! Property-based tests for the read/write protocol against the sandbox.
//!
//! Invariants tested:
//! - Two fetches with no intervening write return the same sequence
//! - A confirmed `add_record` adds exactly one matching record, stamped
//!   within the confirmation window

use healthcare_client::{PatientId, RecordsClient, Signer, Uint256};
use proptest::prelude::*;

use crate::common::{block_on, setup_test_env};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_fetch_is_idempotent(patient in any::<[u8; 32]>(), existing in 0usize..4) {
        let ctx = setup_test_env();
        let client = RecordsClient::new(
            ctx.network.clone(),
            ctx.contract.clone(),
            Signer::bind(ctx.owner.clone()),
        );
        let patient_id = PatientId::from(Uint256::from_be_bytes(patient));

        block_on(async {
            for n in 0..existing {
                let name = format!("patient-{n}");
                client
                    .add_record(patient_id, &name, "diag", "treat")
                    .await
                    .unwrap()
                    .wait()
                    .await
                    .unwrap();
            }
        });

        let first = block_on(client.get_patient_records(patient_id)).unwrap();
        let second = block_on(client.get_patient_records(patient_id)).unwrap();
        prop_assert_eq!(first.len(), existing);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_confirmed_add_appends_one_matching_record(
        patient in any::<[u8; 32]>(),
        existing in 0usize..3,
        name in "[A-Za-z ]{0,16}",
        diagnosis in "[A-Za-z ]{0,16}",
        treatment in "[A-Za-z ]{0,16}",
    ) {
        let ctx = setup_test_env();
        let client = RecordsClient::new(
            ctx.network.clone(),
            ctx.contract.clone(),
            Signer::bind(ctx.owner.clone()),
        );
        let patient_id = PatientId::from(Uint256::from_be_bytes(patient));

        let (before, submitted_at, receipt) = block_on(async {
            for _ in 0..existing {
                client
                    .add_record(patient_id, "earlier", "earlier", "earlier")
                    .await
                    .unwrap()
                    .wait()
                    .await
                    .unwrap();
            }
            let before = client.get_patient_records(patient_id).await.unwrap();
            let submitted_at = ctx.env.ledger().timestamp();
            let receipt = client
                .add_record(patient_id, &name, &diagnosis, &treatment)
                .await
                .unwrap()
                .wait()
                .await
                .unwrap();
            (before, submitted_at, receipt)
        });

        let after = block_on(client.get_patient_records(patient_id)).unwrap();
        prop_assert_eq!(after.len(), before.len() + 1);
        prop_assert_eq!(&after[..before.len()], before.as_slice());

        let added = after.last().unwrap();
        prop_assert_eq!(&added.patient_name, &name);
        prop_assert_eq!(&added.diagnosis, &diagnosis);
        prop_assert_eq!(&added.treatment, &treatment);
        prop_assert!(added.timestamp > Uint256::from(submitted_at));
        prop_assert!(added.timestamp <= Uint256::from(receipt.ledger_timestamp));
    }
}
