use core::fmt::Debug;

use thiserror::Error;

/// Error categories used when logging a failed action.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    /// No wallet, or the wallet refused the connection request.
    Connection,
    /// A read-only contract call failed.
    Read,
    /// A transaction was rejected at submission or failed to confirm.
    Write,
    /// The client-side owner gate blocked the call before submission.
    Authorization,
    /// Form input or configuration could not be converted to wire types.
    Validation,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ClientError {
    #[error("wallet connection failed: {0}")]
    Connection(String),

    #[error("contract read failed: {0}")]
    Read(String),

    #[error("transaction failed: {0}")]
    Write(String),

    #[error("only the contract owner can authorize providers")]
    AuthorizationDenied,

    #[error("wallet is not connected")]
    NotConnected,

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Connection(_) | ClientError::NotConnected => ErrorCategory::Connection,
            ClientError::Read(_) => ErrorCategory::Read,
            ClientError::Write(_) => ErrorCategory::Write,
            ClientError::AuthorizationDenied => ErrorCategory::Authorization,
            ClientError::InvalidInput { .. } | ClientError::Config(_) => ErrorCategory::Validation,
        }
    }

    /// Returns the blocking alert shown to the user, if this error has one.
    /// Every other error is only logged.
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            ClientError::AuthorizationDenied => Some("Only contract owner can authorize providers"),
            _ => None,
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ClientError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Flattens the nested result of a Soroban `try_*` client call.
///
/// The outer `Err` carries the contract error (or the host's invoke error);
/// the inner `Err` means the returned value could not be decoded.
pub(crate) fn settle<T, C, E, I>(
    outcome: Result<Result<T, C>, Result<E, I>>,
    kind: fn(String) -> ClientError,
) -> Result<T, ClientError>
where
    C: Debug,
    E: Debug,
    I: Debug,
{
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(conversion)) => Err(kind(format!("malformed response: {conversion:?}"))),
        Err(Ok(contract)) => Err(kind(format!("contract error: {contract:?}"))),
        Err(Err(invoke)) => Err(kind(format!("invocation aborted: {invoke:?}"))),
    }
}
