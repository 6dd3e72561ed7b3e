//! The network seam between the contract client and a ledger.

use core::fmt;

use crate::address::{AccountId, ContractId};
use crate::errors::ClientError;
use crate::interface::{PatientId, PatientRecord};
use crate::wallet::Signer;

/// State-mutating contract invocation carried by a transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContractCall {
    AddRecord {
        patient_id: PatientId,
        patient_name: String,
        diagnosis: String,
        treatment: String,
    },
    AuthorizeProvider {
        provider: AccountId,
    },
}

impl ContractCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            ContractCall::AddRecord { .. } => "add_record",
            ContractCall::AuthorizeProvider { .. } => "authorized_provider",
        }
    }
}

/// Hash identifying a submitted transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Proof that a transaction was included in a closed ledger.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Receipt {
    pub hash: TxHash,
    pub ledger_sequence: u32,
    pub ledger_timestamp: u64,
}

/// A ledger that hosts the records contract.
///
/// Writes follow a two-phase protocol: [`submit`](Self::submit) hands the
/// transaction to the network, [`confirm`](Self::confirm) resolves once it is
/// included. A submitted transaction that is never confirmed has no effect.
#[allow(async_fn_in_trait)]
pub trait RecordsNetwork {
    async fn owner(&self, contract: &ContractId) -> Result<AccountId, ClientError>;

    async fn patient_records(
        &self,
        contract: &ContractId,
        patient_id: PatientId,
    ) -> Result<Vec<PatientRecord>, ClientError>;

    async fn submit(
        &self,
        contract: &ContractId,
        signer: &Signer,
        call: ContractCall,
    ) -> Result<TxHash, ClientError>;

    async fn confirm(&self, hash: &TxHash) -> Result<Receipt, ClientError>;
}
