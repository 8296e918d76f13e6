use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Wallet provider returned no accounts")]
    NoAccounts,

    #[error("Wallet request rejected: {0}")]
    Rejected(String),

    #[error("Wallet provider error: {0}")]
    ProviderError(String),
}

pub type Result<T> = std::result::Result<T, WalletError>;
