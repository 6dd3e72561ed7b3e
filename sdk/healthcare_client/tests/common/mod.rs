#![allow(dead_code)]
//! Records contract fixture and sandbox setup shared by the integration tests.

use std::future::Future;

use healthcare_client::{
    AccountId, ClientConfig, ContractId, HealthcareRecordsInterface, Record, SandboxNetwork,
    SandboxWallet,
};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, Address, Env, String,
    Vec, U256,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum FixtureError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    NextId,
    Provider(Address),
    Records(U256),
}

/// Minimal stand-in for the deployed records contract: the owner and the
/// providers it authorizes may append records; anyone may read them.
#[contract]
pub struct HealthcareRecordsFixture;

#[contractimpl]
impl HealthcareRecordsFixture {
    pub fn initialize(env: Env, owner: Address) {
        if env.storage().instance().has(&DataKey::Owner) {
            panic_with_error!(&env, FixtureError::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage()
            .persistent()
            .set(&DataKey::Provider(owner), &true);
    }

    pub fn is_provider(env: Env, account: Address) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Provider(account))
            .unwrap_or(false)
    }
}

fn owner_of(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .unwrap_or_else(|| panic_with_error!(env, FixtureError::NotInitialized))
}

#[contractimpl]
impl HealthcareRecordsInterface for HealthcareRecordsFixture {
    fn get_owner(env: Env) -> Address {
        owner_of(&env)
    }

    fn get_patient_records(env: Env, patient_id: U256) -> Vec<Record> {
        env.storage()
            .persistent()
            .get(&DataKey::Records(patient_id))
            .unwrap_or_else(|| Vec::new(&env))
    }

    fn add_record(
        env: Env,
        caller: Address,
        patient_id: U256,
        patient_name: String,
        diagnosis: String,
        treatment: String,
    ) {
        caller.require_auth();
        if !Self::is_provider(env.clone(), caller) {
            panic_with_error!(&env, FixtureError::Unauthorized);
        }

        let record_id: u32 = env.storage().instance().get(&DataKey::NextId).unwrap_or(1);
        env.storage()
            .instance()
            .set(&DataKey::NextId, &(record_id + 1));

        let key = DataKey::Records(patient_id);
        let mut records: Vec<Record> = env
            .storage()
            .persistent()
            .get(&key)
            .unwrap_or_else(|| Vec::new(&env));
        records.push_back(Record {
            record_id: U256::from_u32(&env, record_id),
            patient_name,
            diagnosis,
            treatment,
            timestamp: U256::from_u128(&env, u128::from(env.ledger().timestamp())),
        });
        env.storage().persistent().set(&key, &records);
    }

    fn authorized_provider(env: Env, caller: Address, provider: Address) {
        caller.require_auth();
        if caller != owner_of(&env) {
            panic_with_error!(&env, FixtureError::Unauthorized);
        }
        env.storage()
            .persistent()
            .set(&DataKey::Provider(provider), &true);
    }
}

pub struct TestContext {
    pub env: Env,
    pub fixture: HealthcareRecordsFixtureClient<'static>,
    pub contract: ContractId,
    pub owner: AccountId,
    pub network: SandboxNetwork,
}

/// Creates a Soroban environment, deploys the fixture owned by a fresh
/// account and wraps it in a sandbox network.
pub fn setup_test_env() -> TestContext {
    let env = Env::default();

    let contract_address = env.register(HealthcareRecordsFixture, ());
    let fixture = HealthcareRecordsFixtureClient::new(&env, &contract_address);

    let owner = Address::generate(&env);
    fixture.initialize(&owner);

    let contract = ContractId::from_address(&contract_address).unwrap();
    let config = ClientConfig::new(contract.as_str());
    let network = SandboxNetwork::new(env.clone(), &config);

    TestContext {
        env,
        fixture,
        contract,
        owner: AccountId::from_address(&owner).unwrap(),
        network,
    }
}

/// Generates an account that the fixture knows nothing about.
pub fn create_test_account(ctx: &TestContext) -> AccountId {
    AccountId::from_address(&Address::generate(&ctx.env)).unwrap()
}

pub fn wallet_for(account: &AccountId) -> SandboxWallet {
    SandboxWallet::approving(account.clone())
}

pub fn is_provider(ctx: &TestContext, account: &AccountId) -> bool {
    ctx.fixture.is_provider(&account.to_address(&ctx.env))
}

/// Drives a future on a current-thread runtime. The Soroban host is not
/// `Send`, so the futures in these tests never leave this thread.
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}
