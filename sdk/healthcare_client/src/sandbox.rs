//! Local network and wallet backed by a Soroban host environment.
//!
//! `SandboxNetwork` drives a deployed records contract inside an [`Env`].
//! Submitted transactions wait in a queue; confirming one closes a ledger
//! (sequence + 1, timestamp + close time) and executes the invocation with
//! only the signer's authorization for that exact call. A failed invocation
//! is rolled back by the host, so it leaves no contract-side trace.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use soroban_sdk::testutils::{Address as _, Ledger as _, MockAuth, MockAuthInvoke};
use soroban_sdk::{Address, Bytes, BytesN, Env, IntoVal, String as SorobanString, Val, Vec};
use tracing::{debug, warn};

use crate::address::{AccountId, ContractId};
use crate::config::ClientConfig;
use crate::errors::{settle, ClientError};
use crate::interface::{HealthcareRecordsClient, PatientId, PatientRecord};
use crate::network::{ContractCall, Receipt, RecordsNetwork, TxHash};
use crate::wallet::{Signer, WalletProvider};

#[derive(Clone, Debug)]
struct QueuedTransaction {
    contract: ContractId,
    caller: AccountId,
    call: ContractCall,
}

/// Transactions dropped without `wait` stay in the queue for the life of
/// the network and are never executed. The queue is not capped.
#[derive(Clone)]
pub struct SandboxNetwork {
    env: Env,
    close_seconds: u64,
    queue: Rc<RefCell<BTreeMap<TxHash, QueuedTransaction>>>,
    nonce: Rc<Cell<u64>>,
    submitted: Rc<Cell<u64>>,
}

impl SandboxNetwork {
    /// Wraps `env`, deriving its network id from the configured passphrase.
    /// A ledger still at timestamp zero is moved to the current wall clock.
    pub fn new(env: Env, config: &ClientConfig) -> Self {
        let passphrase = Bytes::from_slice(&env, config.network_passphrase.as_bytes());
        let network_id: BytesN<32> = env.crypto().sha256(&passphrase).into();
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        env.ledger().with_mut(|li| {
            li.network_id = network_id.to_array();
            if li.timestamp == 0 {
                li.timestamp = now;
            }
        });

        Self {
            env,
            close_seconds: config.ledger_close_seconds,
            queue: Rc::new(RefCell::new(BTreeMap::new())),
            nonce: Rc::new(Cell::new(0)),
            submitted: Rc::new(Cell::new(0)),
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Number of transactions accepted by `submit` so far.
    pub fn submitted_count(&self) -> u64 {
        self.submitted.get()
    }

    /// Number of submitted transactions not yet confirmed, including any
    /// that were dropped.
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    fn transaction_hash(&self, contract: &ContractId, caller: &AccountId, nonce: u64) -> TxHash {
        let mut preimage = std::vec::Vec::with_capacity(8 + 2 * 56);
        preimage.extend_from_slice(&nonce.to_be_bytes());
        preimage.extend_from_slice(contract.as_str().as_bytes());
        preimage.extend_from_slice(caller.as_str().as_bytes());
        let digest: BytesN<32> = self
            .env
            .crypto()
            .sha256(&Bytes::from_slice(&self.env, &preimage))
            .into();
        TxHash(digest.to_array())
    }

    fn close_ledger(&self) {
        let close_seconds = self.close_seconds;
        self.env.ledger().with_mut(|li| {
            li.sequence_number = li.sequence_number.saturating_add(1);
            li.timestamp = li.timestamp.saturating_add(close_seconds);
        });
    }

    /// Restricts authorization to `caller` signing exactly this invocation.
    fn authorize(&self, caller: &Address, contract: &Address, fn_name: &str, args: Vec<Val>) {
        self.env.mock_auths(&[MockAuth {
            address: caller,
            invoke: &MockAuthInvoke {
                contract,
                fn_name,
                args,
                sub_invokes: &[],
            },
        }]);
    }

    fn execute(&self, tx: &QueuedTransaction) -> Result<(), ClientError> {
        let env = &self.env;
        let contract = tx.contract.to_address(env);
        let caller = tx.caller.to_address(env);
        let client = HealthcareRecordsClient::new(env, &contract);
        let function = tx.call.function_name();

        match &tx.call {
            ContractCall::AddRecord {
                patient_id,
                patient_name,
                diagnosis,
                treatment,
            } => {
                let patient_id = patient_id.to_u256(env);
                let patient_name = SorobanString::from_str(env, patient_name);
                let diagnosis = SorobanString::from_str(env, diagnosis);
                let treatment = SorobanString::from_str(env, treatment);
                let args: Vec<Val> = (
                    caller.clone(),
                    patient_id.clone(),
                    patient_name.clone(),
                    diagnosis.clone(),
                    treatment.clone(),
                )
                    .into_val(env);
                self.authorize(&caller, &contract, function, args);
                settle(
                    client.try_add_record(
                        &caller,
                        &patient_id,
                        &patient_name,
                        &diagnosis,
                        &treatment,
                    ),
                    ClientError::Write,
                )
            }
            ContractCall::AuthorizeProvider { provider } => {
                let provider = provider.to_address(env);
                let args: Vec<Val> = (caller.clone(), provider.clone()).into_val(env);
                self.authorize(&caller, &contract, function, args);
                settle(
                    client.try_authorized_provider(&caller, &provider),
                    ClientError::Write,
                )
            }
        }
    }
}

impl RecordsNetwork for SandboxNetwork {
    async fn owner(&self, contract: &ContractId) -> Result<AccountId, ClientError> {
        let address = contract.to_address(&self.env);
        let client = HealthcareRecordsClient::new(&self.env, &address);
        let owner = settle(client.try_get_owner(), ClientError::Read)?;
        AccountId::from_address(&owner)
            .map_err(|err| ClientError::Read(format!("owner address: {err}")))
    }

    async fn patient_records(
        &self,
        contract: &ContractId,
        patient_id: PatientId,
    ) -> Result<std::vec::Vec<PatientRecord>, ClientError> {
        let address = contract.to_address(&self.env);
        let client = HealthcareRecordsClient::new(&self.env, &address);
        let records = settle(
            client.try_get_patient_records(&patient_id.to_u256(&self.env)),
            ClientError::Read,
        )?;
        records.iter().map(|r| PatientRecord::from_wire(&r)).collect()
    }

    async fn submit(
        &self,
        contract: &ContractId,
        signer: &Signer,
        call: ContractCall,
    ) -> Result<TxHash, ClientError> {
        let nonce = self.nonce.get();
        self.nonce.set(nonce.saturating_add(1));

        let caller = signer.address().clone();
        let hash = self.transaction_hash(contract, &caller, nonce);
        debug!(%hash, function = call.function_name(), "transaction queued");
        self.queue.borrow_mut().insert(
            hash,
            QueuedTransaction {
                contract: contract.clone(),
                caller,
                call,
            },
        );
        self.submitted.set(self.submitted.get().saturating_add(1));
        Ok(hash)
    }

    async fn confirm(&self, hash: &TxHash) -> Result<Receipt, ClientError> {
        let tx = self
            .queue
            .borrow_mut()
            .remove(hash)
            .ok_or_else(|| ClientError::Write(format!("transaction {hash} is not pending")))?;

        self.close_ledger();
        if let Err(err) = self.execute(&tx) {
            warn!(%hash, function = tx.call.function_name(), %err, "transaction reverted");
            return Err(err);
        }

        Ok(Receipt {
            hash: *hash,
            ledger_sequence: self.env.ledger().sequence(),
            ledger_timestamp: self.env.ledger().timestamp(),
        })
    }
}

/// Stand-in for a browser wallet: approves with a fixed account, or refuses
/// every connection request.
#[derive(Clone, Debug)]
pub struct SandboxWallet {
    account: Option<AccountId>,
}

impl SandboxWallet {
    pub fn approving(account: AccountId) -> Self {
        Self {
            account: Some(account),
        }
    }

    pub fn rejecting() -> Self {
        Self { account: None }
    }

    /// A wallet holding a freshly generated account.
    pub fn generate(env: &Env) -> Result<Self, ClientError> {
        let account = AccountId::from_address(&Address::generate(env))
            .map_err(|err| ClientError::Connection(format!("generated account: {err}")))?;
        Ok(Self::approving(account))
    }

    pub fn account(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }
}

impl WalletProvider for SandboxWallet {
    async fn request_signer(&self) -> Result<Signer, ClientError> {
        match &self.account {
            Some(account) => Ok(Signer::bind(account.clone())),
            None => Err(ClientError::Connection(
                "user rejected the connection request".into(),
            )),
        }
    }
}
