//! ResearchChain wallet session
//!
//! A [`WalletSession`] is the explicit context every signed registry call
//! runs under. It is built once when a wallet connects and torn down on
//! disconnect; nothing about the connected account lives in globals.

pub mod errors;
pub mod gas;
pub mod provider;
pub mod session;

pub use errors::*;
pub use gas::GasLimits;
pub use provider::{StaticWalletProvider, WalletProvider};
pub use session::{SessionState, WalletSession};

/// Re-export commonly used types
pub use researchchain_types::Address;
