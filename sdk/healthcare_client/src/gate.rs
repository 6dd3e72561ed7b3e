//! Client-side owner gate for provider authorization.
//!
//! The gate only spares the user a transaction that the contract would
//! reject anyway. The contract remains the enforcement point: nothing in the
//! contract client consults the gate.

use crate::address::AccountId;
use crate::errors::ClientError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AuthorizationGate {
    is_owner: bool,
}

impl AuthorizationGate {
    /// Computed once, right after the session connects.
    pub fn derive(account: &AccountId, owner: &AccountId) -> Self {
        Self {
            is_owner: same_address(account.as_str(), owner.as_str()),
        }
    }

    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    pub fn check(&self) -> Result<(), ClientError> {
        if self.is_owner {
            Ok(())
        } else {
            Err(ClientError::AuthorizationDenied)
        }
    }
}

/// Address identifiers are not case-sensitive.
pub fn same_address(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
