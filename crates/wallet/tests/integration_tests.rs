use async_trait::async_trait;
use researchchain_wallet::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider that rejects the first `rejections` account requests, like a
/// user dismissing the wallet prompt.
struct PromptingProvider {
    accounts: Vec<Address>,
    rejections: usize,
    requests: AtomicUsize,
}

#[async_trait]
impl WalletProvider for PromptingProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let attempt = self.requests.fetch_add(1, Ordering::SeqCst);
        if attempt < self.rejections {
            return Err(WalletError::Rejected("user denied account access".into()));
        }
        Ok(self.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(11155111)
    }
}

#[tokio::test]
async fn test_session_lifecycle() {
    let primary = Address::new([0xaa; 20]);
    let secondary = Address::new([0xbb; 20]);
    let provider = PromptingProvider {
        accounts: vec![primary, secondary],
        rejections: 1,
        requests: AtomicUsize::new(0),
    };
    let gas = GasLimits {
        publish: 750_000,
        pricing: 150_000,
    };

    // Denied prompt
    let denied = WalletSession::connect(&provider, gas).await;
    assert!(matches!(denied, Err(WalletError::Rejected(_))));

    // Second prompt accepted; first account signs
    let mut session = WalletSession::connect(&provider, gas).await.unwrap();
    assert_eq!(session.signer().unwrap(), primary);
    assert_eq!(session.chain_id(), 11155111);
    assert_eq!(session.gas_limits(), gas);
    assert_eq!(session.state(), SessionState::Connected);

    session.disconnect();
    assert!(session.signer().is_err());
    assert_eq!(provider.requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let a = StaticWalletProvider::new(Address::new([1u8; 20]), 1);
    let b = StaticWalletProvider::new(Address::new([2u8; 20]), 1);

    let mut first = WalletSession::connect(&a, GasLimits::default()).await.unwrap();
    let second = WalletSession::connect(&b, GasLimits::default()).await.unwrap();

    first.disconnect();
    assert!(!first.is_connected());
    assert_eq!(second.signer().unwrap(), Address::new([2u8; 20]));
}
