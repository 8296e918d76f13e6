use serde::{Deserialize, Serialize};

/// Default gas limit for `publishPaper`.
pub const DEFAULT_PUBLISH_GAS_LIMIT: u64 = 500_000;
/// Default gas limit for the spend authorization and price-setting calls.
pub const DEFAULT_PRICING_GAS_LIMIT: u64 = 200_000;

/// Fixed gas limits attached to registry calls signed by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasLimits {
    pub publish: u64,
    pub pricing: u64,
}

impl Default for GasLimits {
    fn default() -> Self {
        Self {
            publish: DEFAULT_PUBLISH_GAS_LIMIT,
            pricing: DEFAULT_PRICING_GAS_LIMIT,
        }
    }
}
