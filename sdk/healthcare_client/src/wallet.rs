//! Wallet session: a single connection to an injected wallet.

use crate::address::AccountId;
use crate::errors::ClientError;

/// Capability bound to one account, used to authorize outgoing transactions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Signer {
    account: AccountId,
}

impl Signer {
    pub fn bind(account: AccountId) -> Self {
        Self { account }
    }

    pub fn address(&self) -> &AccountId {
        &self.account
    }
}

/// Wallet injected by the host environment.
#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    /// Asks the wallet for a signer bound to the user's selected account.
    /// The wallet may prompt the user, who may refuse.
    async fn request_signer(&self) -> Result<Signer, ClientError>;
}

/// An established wallet connection. Never reassigned once created.
#[derive(Clone, Debug)]
pub struct Session {
    account: AccountId,
    signer: Signer,
    connected: bool,
}

impl Session {
    /// Connects to the injected wallet, if the host provides one.
    pub async fn connect<W: WalletProvider>(wallet: Option<&W>) -> Result<Self, ClientError> {
        let wallet =
            wallet.ok_or_else(|| ClientError::Connection("no injected wallet found".into()))?;
        let signer = wallet.request_signer().await?;
        let account = signer.address().clone();
        tracing::debug!(%account, "wallet signer acquired");
        Ok(Self {
            account,
            signer,
            connected: true,
        })
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
