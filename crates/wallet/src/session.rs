use crate::errors::*;
use crate::gas::GasLimits;
use crate::provider::WalletProvider;
use chrono::{DateTime, Utc};
use researchchain_types::Address;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Connected,
    Disconnected,
}

/// Authenticated wallet context passed explicitly to the submission flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSession {
    account: Address,
    chain_id: u64,
    gas: GasLimits,
    connected_at: DateTime<Utc>,
    state: SessionState,
}

impl WalletSession {
    /// Connect through a provider, signing with its first account.
    pub async fn connect<P>(provider: &P, gas: GasLimits) -> Result<Self>
    where
        P: WalletProvider + ?Sized,
    {
        let accounts = provider.request_accounts().await?;
        let account = *accounts.first().ok_or(WalletError::NoAccounts)?;
        let chain_id = provider.chain_id().await?;

        info!(%account, chain_id, "wallet session connected");
        Ok(Self::new(account, chain_id, gas))
    }

    /// Build a connected session for a known account.
    pub fn new(account: Address, chain_id: u64, gas: GasLimits) -> Self {
        Self {
            account,
            chain_id,
            gas,
            connected_at: Utc::now(),
            state: SessionState::Connected,
        }
    }

    /// Tear the session down; every later signing request fails.
    pub fn disconnect(&mut self) {
        if self.state == SessionState::Connected {
            info!(account = %self.account, "wallet session disconnected");
        }
        self.state = SessionState::Disconnected;
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Signing identity, available only while connected.
    pub fn signer(&self) -> Result<Address> {
        match self.state {
            SessionState::Connected => Ok(self.account),
            SessionState::Disconnected => Err(WalletError::NotConnected),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn gas_limits(&self) -> GasLimits {
        self.gas
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticWalletProvider;

    #[tokio::test]
    async fn test_connect_uses_first_account() {
        let account = Address::new([7u8; 20]);
        let provider = StaticWalletProvider::new(account, 11155111);

        let session = WalletSession::connect(&provider, GasLimits::default())
            .await
            .unwrap();

        assert_eq!(session.signer().unwrap(), account);
        assert_eq!(session.chain_id(), 11155111);
        assert_eq!(session.gas_limits().publish, 500_000);
    }

    #[tokio::test]
    async fn test_locked_provider_cannot_connect() {
        let provider = StaticWalletProvider::locked(1);
        let result = WalletSession::connect(&provider, GasLimits::default()).await;
        assert!(matches!(result, Err(WalletError::NoAccounts)));
    }

    #[test]
    fn test_disconnect_revokes_signer() {
        let mut session = WalletSession::new(Address::new([1u8; 20]), 1, GasLimits::default());
        assert!(session.is_connected());

        session.disconnect();
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(matches!(session.signer(), Err(WalletError::NotConnected)));

        // Idempotent.
        session.disconnect();
        assert!(!session.is_connected());
    }
}
