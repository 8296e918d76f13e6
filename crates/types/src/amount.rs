//! Research token amounts.
//!
//! Access prices are expressed in the platform token, which uses 18 decimal
//! places like most ERC-20 tokens. All arithmetic happens on atomic units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of decimal places of the research token.
pub const TOKEN_DECIMALS: u32 = 18;

/// Atomic unit type: 1 token = 10^18 atomic units.
pub type AtomicUnits = u128;

/// One full token in atomic units.
pub const ATOMIC_PER_TOKEN: AtomicUnits = 10u128.pow(TOKEN_DECIMALS);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must not be negative")]
    Negative,
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("too many decimal places (max 18)")]
    TooPrecise,
    #[error("amount overflows the token range")]
    Overflow,
}

/// Non-negative token amount in atomic units.
///
/// Serialised as a decimal string of atomic units; JSON numbers cannot hold
/// the full `u128` range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(pub AtomicUnits);

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .trim()
            .parse::<u128>()
            .map(Amount)
            .map_err(|e| AmountError::InvalidNumber(format!("{value}: {e}")))
    }
}

impl Amount {
    pub const fn from_atomic(atomic: AtomicUnits) -> Self {
        Self(atomic)
    }

    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * ATOMIC_PER_TOKEN)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn atomic(&self) -> AtomicUnits {
        self.0
    }

    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn saturating_sub(&self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// Parse a decimal token string such as `"5"` or `"0.25"`.
    pub fn from_str_tokens(s: &str) -> Result<Self, AmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        if s.starts_with('-') {
            return Err(AmountError::Negative);
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if frac.contains('.') {
            return Err(AmountError::InvalidNumber(s.to_string()));
        }
        if frac.len() > TOKEN_DECIMALS as usize {
            return Err(AmountError::TooPrecise);
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|e| AmountError::InvalidNumber(format!("{s}: {e}")))?
        };

        let fractional: u128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = TOKEN_DECIMALS as usize);
            padded
                .parse()
                .map_err(|e| AmountError::InvalidNumber(format!("{s}: {e}")))?
        };

        whole
            .checked_mul(ATOMIC_PER_TOKEN)
            .and_then(|w| w.checked_add(fractional))
            .map(Amount)
            .ok_or(AmountError::Overflow)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_tokens(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / ATOMIC_PER_TOKEN;
        let fractional = self.0 % ATOMIC_PER_TOKEN;

        if fractional == 0 {
            write!(f, "{whole} RCT")
        } else {
            let fractional_str = format!("{fractional:018}");
            write!(f, "{whole}.{} RCT", fractional_str.trim_end_matches('0'))
        }
    }
}
