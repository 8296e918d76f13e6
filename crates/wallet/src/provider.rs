use crate::errors::*;
use async_trait::async_trait;
use researchchain_types::Address;

/// Source of signing accounts (a browser extension, a keystore, a fixed address).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the provider for its accounts; the first one signs.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    async fn chain_id(&self) -> Result<u64>;
}

/// Provider that always answers with a preconfigured account.
#[derive(Debug, Clone)]
pub struct StaticWalletProvider {
    accounts: Vec<Address>,
    chain_id: u64,
}

impl StaticWalletProvider {
    pub fn new(account: Address, chain_id: u64) -> Self {
        Self {
            accounts: vec![account],
            chain_id,
        }
    }

    /// A provider with no unlocked accounts.
    pub fn locked(chain_id: u64) -> Self {
        Self {
            accounts: Vec::new(),
            chain_id,
        }
    }
}

#[async_trait]
impl WalletProvider for StaticWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }
}
