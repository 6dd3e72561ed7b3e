//! Client for a deployed healthcare records contract.
//!
//! This crate provides:
//! - [`Session`]: one-shot connection to an injected wallet.
//! - [`RecordsClient`]: the four contract operations, with two-phase
//!   submit / confirm for writes.
//! - [`AuthorizationGate`]: client-side owner check for provider
//!   authorization (the contract stays the enforcement point).
//! - [`FormController`]: form state, record cache and action state machine,
//!   with observer notifications.
//! - A local Soroban-host network and wallet (requires the `sandbox` feature).
//!
//! All record storage and access control lives in the contract.

pub mod address;
pub mod client;
pub mod config;
pub mod controller;
pub mod display;
pub mod errors;
pub mod gate;
pub mod interface;
pub mod network;
#[cfg(feature = "sandbox")]
pub mod sandbox;
pub mod wallet;


pub use address::{AccountId, AddressError, ContractId};
pub use client::{PendingTransaction, RecordsClient};
pub use config::ClientConfig;
pub use controller::{
    Action, ActionState, ControllerEvent, Field, FormController, PendingInput,
};
pub use errors::{ClientError, ErrorCategory};
pub use gate::AuthorizationGate;
pub use interface::{
    HealthcareRecordsClient, HealthcareRecordsInterface, PatientId, PatientRecord, Record,
    Uint256, Uint256Error,
};
pub use network::{ContractCall, Receipt, RecordsNetwork, TxHash};
#[cfg(feature = "sandbox")]
pub use sandbox::{SandboxNetwork, SandboxWallet};
pub use wallet::{Session, Signer, WalletProvider};
