//! Strkey identifiers for accounts and contracts.
//!
//! A strkey is the RFC 4648 base32 encoding (no padding) of a version byte,
//! a 32-byte payload and a little-endian CRC16-XModem checksum, 56 characters
//! in total. Strkeys are compared case-insensitively: parsing upper-cases the
//! input before validating it, so two spellings of one key compare equal.

use core::fmt;
use core::str::FromStr;

use soroban_sdk::{Address, Env, String as SorobanString};
use thiserror::Error;

const STRKEY_LEN: usize = 56;
const DECODED_LEN: usize = 35;
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Version byte of an ed25519 account key (`G...`).
const VERSION_ACCOUNT: u8 = 6 << 3;
/// Version byte of a contract id (`C...`).
const VERSION_CONTRACT: u8 = 2 << 3;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AddressError {
    #[error("expected {STRKEY_LEN} characters, found {0}")]
    Length(usize),
    #[error("character {0:?} is not in the base32 alphabet")]
    Alphabet(char),
    #[error("unexpected version byte {0:#04x}")]
    Version(u8),
    #[error("checksum mismatch")]
    Checksum,
}

/// An account (`G...`) or contract (`C...`) address able to sign or be
/// referenced by a transaction.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let normalized = input.trim().to_ascii_uppercase();
        match decode(&normalized)? {
            VERSION_ACCOUNT | VERSION_CONTRACT => Ok(Self(normalized)),
            other => Err(AddressError::Version(other)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_address(&self, env: &Env) -> Address {
        Address::from_string(&SorobanString::from_str(env, &self.0))
    }

    /// Reads the strkey of a host address.
    pub fn from_address(address: &Address) -> Result<Self, AddressError> {
        let strkey = address.to_string();
        let mut buf = vec![0u8; strkey.len() as usize];
        strkey.copy_into_slice(&mut buf);
        let text = String::from_utf8_lossy(&buf);
        Self::parse(&text)
    }
}

impl FromStr for AccountId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a deployed contract. Only `C...` strkeys are accepted.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ContractId(AccountId);

impl ContractId {
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let normalized = input.trim().to_ascii_uppercase();
        match decode(&normalized)? {
            VERSION_CONTRACT => Ok(Self(AccountId(normalized))),
            other => Err(AddressError::Version(other)),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn to_address(&self, env: &Env) -> Address {
        self.0.to_address(env)
    }

    pub fn from_address(address: &Address) -> Result<Self, AddressError> {
        let account = AccountId::from_address(address)?;
        Self::parse(account.as_str())
    }
}

impl FromStr for ContractId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validates an upper-case strkey and returns its version byte.
fn decode(strkey: &str) -> Result<u8, AddressError> {
    if let Some(c) = strkey.chars().find(|c| !c.is_ascii()) {
        return Err(AddressError::Alphabet(c));
    }
    if strkey.len() != STRKEY_LEN {
        return Err(AddressError::Length(strkey.len()));
    }

    let mut decoded = [0u8; DECODED_LEN];
    let mut written = 0;
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for c in strkey.bytes() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or(AddressError::Alphabet(char::from(c)))?;
        buffer = (buffer << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            decoded[written] = (buffer >> bits) as u8;
            written += 1;
            buffer &= (1 << bits) - 1;
        }
    }

    let (body, checksum) = decoded.split_at(DECODED_LEN - 2);
    if crc16_xmodem(body) != u16::from_le_bytes([checksum[0], checksum[1]]) {
        return Err(AddressError::Checksum);
    }
    Ok(body[0])
}

fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}
