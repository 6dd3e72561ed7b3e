use tracing::{debug, info, instrument};

use crate::address::{AccountId, ContractId};
use crate::errors::ClientError;
use crate::interface::{PatientId, PatientRecord};
use crate::network::{ContractCall, Receipt, RecordsNetwork, TxHash};
use crate::wallet::Signer;

/// Contract client bound to one contract id, one signer and one network.
///
/// The client forwards calls as-is. It performs no owner check of its own;
/// access control is the contract's job.
#[derive(Clone, Debug)]
pub struct RecordsClient<N> {
    network: N,
    contract: ContractId,
    signer: Signer,
}

impl<N: RecordsNetwork> RecordsClient<N> {
    pub fn new(network: N, contract: ContractId, signer: Signer) -> Self {
        Self {
            network,
            contract,
            signer,
        }
    }

    pub fn contract(&self) -> &ContractId {
        &self.contract
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub async fn get_owner(&self) -> Result<AccountId, ClientError> {
        self.network.owner(&self.contract).await
    }

    #[instrument(skip(self), fields(contract = %self.contract))]
    pub async fn get_patient_records(
        &self,
        patient_id: PatientId,
    ) -> Result<Vec<PatientRecord>, ClientError> {
        let records = self
            .network
            .patient_records(&self.contract, patient_id)
            .await?;
        debug!(count = records.len(), "patient records read");
        Ok(records)
    }

    #[instrument(skip(self, patient_name, diagnosis, treatment), fields(contract = %self.contract))]
    pub async fn add_record(
        &self,
        patient_id: PatientId,
        patient_name: &str,
        diagnosis: &str,
        treatment: &str,
    ) -> Result<PendingTransaction<'_, N>, ClientError> {
        self.submit(ContractCall::AddRecord {
            patient_id,
            patient_name: patient_name.to_owned(),
            diagnosis: diagnosis.to_owned(),
            treatment: treatment.to_owned(),
        })
        .await
    }

    #[instrument(skip(self), fields(contract = %self.contract))]
    pub async fn authorized_provider(
        &self,
        provider: &AccountId,
    ) -> Result<PendingTransaction<'_, N>, ClientError> {
        self.submit(ContractCall::AuthorizeProvider {
            provider: provider.clone(),
        })
        .await
    }

    async fn submit(&self, call: ContractCall) -> Result<PendingTransaction<'_, N>, ClientError> {
        let function = call.function_name();
        let hash = self
            .network
            .submit(&self.contract, &self.signer, call)
            .await?;
        info!(%hash, function, "transaction submitted");
        Ok(PendingTransaction {
            network: &self.network,
            hash,
            function,
        })
    }
}

/// A submitted transaction awaiting confirmation.
#[must_use = "a transaction has no effect until it is confirmed with `wait`"]
#[derive(Debug)]
pub struct PendingTransaction<'a, N> {
    network: &'a N,
    hash: TxHash,
    function: &'static str,
}

impl<N: RecordsNetwork> PendingTransaction<'_, N> {
    pub fn hash(&self) -> &TxHash {
        &self.hash
    }

    /// Waits until the transaction is included. There is no timeout.
    pub async fn wait(self) -> Result<Receipt, ClientError> {
        let receipt = self.network.confirm(&self.hash).await?;
        info!(
            hash = %receipt.hash,
            function = self.function,
            ledger = receipt.ledger_sequence,
            "transaction confirmed"
        );
        Ok(receipt)
    }
}
