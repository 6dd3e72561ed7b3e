//! Interface schema of the deployed healthcare records contract.
//!
//! The schema is the binding contract between this client and the
//! collaborator: function names, argument order and the `Record` field order
//! and widths must match the deployed contract exactly.

use core::fmt;
use core::str::FromStr;

use soroban_sdk::{contractclient, contracttype, Address, Bytes, Env, String, Vec, U256};
use thiserror::Error;

use crate::errors::ClientError;

/// One patient record as stored by the contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub record_id: U256,
    pub patient_name: String,
    pub diagnosis: String,
    pub treatment: String,
    pub timestamp: U256,
}

#[contractclient(name = "HealthcareRecordsClient")]
pub trait HealthcareRecordsInterface {
    /// Address of the contract owner.
    fn get_owner(env: Env) -> Address;

    /// Every record stored for `patient_id`, oldest first. Unknown patients
    /// yield an empty list.
    fn get_patient_records(env: Env, patient_id: U256) -> Vec<Record>;

    /// Appends a record for `patient_id`. `caller` must authorize the call.
    fn add_record(
        env: Env,
        caller: Address,
        patient_id: U256,
        patient_name: String,
        diagnosis: String,
        treatment: String,
    );

    /// Adds `provider` to the authorization list. Only the owner may call it.
    fn authorized_provider(env: Env, caller: Address, provider: Address);
}

/// Unsigned 256-bit integer held as big-endian bytes, the width of every
/// numeric field in the contract schema.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Uint256([u8; 32]);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Uint256Error {
    #[error("value is empty")]
    Empty,
    #[error("invalid digit {0:?}")]
    InvalidDigit(char),
    #[error("value exceeds 2^256 - 1")]
    Overflow,
}

impl Uint256 {
    pub const ZERO: Self = Self([0; 32]);
    pub const MAX: Self = Self([0xff; 32]);

    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Parses unsigned decimal digits, up to 2^256 - 1.
    pub fn parse_decimal(digits: &str) -> Result<Self, Uint256Error> {
        if digits.is_empty() {
            return Err(Uint256Error::Empty);
        }
        let mut value = [0u8; 32];
        for c in digits.chars() {
            let mut carry = c.to_digit(10).ok_or(Uint256Error::InvalidDigit(c))?;
            for byte in value.iter_mut().rev() {
                let acc = u32::from(*byte) * 10 + carry;
                *byte = (acc & 0xff) as u8;
                carry = acc >> 8;
            }
            if carry != 0 {
                return Err(Uint256Error::Overflow);
            }
        }
        Ok(Self(value))
    }

    /// `None` when the value does not fit in 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        let (high, low) = self.0.split_at(24);
        if high.iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(low);
        Some(u64::from_be_bytes(buf))
    }

    pub fn to_u256(&self, env: &Env) -> U256 {
        U256::from_be_bytes(env, &Bytes::from_array(env, &self.0))
    }

    pub fn from_u256(value: &U256) -> Self {
        let mut be = [0u8; 32];
        value.to_be_bytes().copy_into_slice(&mut be);
        Self(be)
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        Self::from(u128::from(value))
    }
}

impl From<u128> for Uint256 {
    fn from(value: u128) -> Self {
        let mut be = [0u8; 32];
        be[16..].copy_from_slice(&value.to_be_bytes());
        Self(be)
    }
}

impl FromStr for Uint256 {
    type Err = Uint256Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        let mut digits = std::vec::Vec::with_capacity(78);
        loop {
            let mut rem = 0u32;
            for byte in value.iter_mut() {
                let acc = (rem << 8) | u32::from(*byte);
                *byte = (acc / 10) as u8;
                rem = acc % 10;
            }
            digits.push(b'0' + rem as u8);
            if value.iter().all(|b| *b == 0) {
                break;
            }
        }
        digits.reverse();
        f.pad(core::str::from_utf8(&digits).map_err(|_| fmt::Error)?)
    }
}

/// Patient identifier entered in the form. Full `U256` range.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PatientId(Uint256);

impl PatientId {
    pub fn new(value: u128) -> Self {
        Self(Uint256::from(value))
    }

    pub fn parse(input: &str) -> Result<Self, ClientError> {
        Uint256::parse_decimal(input.trim())
            .map(Self)
            .map_err(|err| ClientError::invalid("patient id", err.to_string()))
    }

    pub fn value(&self) -> Uint256 {
        self.0
    }

    pub fn to_u256(&self, env: &Env) -> U256 {
        self.0.to_u256(env)
    }
}

impl From<Uint256> for PatientId {
    fn from(value: Uint256) -> Self {
        Self(value)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Client-side copy of a [`Record`], detached from the host environment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientRecord {
    pub record_id: Uint256,
    pub patient_name: std::string::String,
    pub diagnosis: std::string::String,
    pub treatment: std::string::String,
    /// Unix seconds of the ledger that included the record.
    pub timestamp: Uint256,
}

impl PatientRecord {
    pub fn from_wire(record: &Record) -> Result<Self, ClientError> {
        Ok(Self {
            record_id: Uint256::from_u256(&record.record_id),
            patient_name: to_std_string(&record.patient_name)?,
            diagnosis: to_std_string(&record.diagnosis)?,
            treatment: to_std_string(&record.treatment)?,
            timestamp: Uint256::from_u256(&record.timestamp),
        })
    }
}

pub(crate) fn to_std_string(value: &String) -> Result<std::string::String, ClientError> {
    let mut buf = vec![0u8; value.len() as usize];
    value.copy_into_slice(&mut buf);
    std::string::String::from_utf8(buf)
        .map_err(|_| ClientError::Read("record field is not valid UTF-8".into()))
}
