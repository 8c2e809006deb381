use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The user's stake in a single pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPosition {
    pub pool_id: String,
    pub token0_amount: Decimal,
    pub token1_amount: Decimal,
    /// Fraction of the pool owned, in [0, 1].
    pub share: Decimal,
    pub value: Decimal,
}

impl PoolPosition {
    /// An empty position in `pool_id`.
    pub fn empty(pool_id: impl Into<String>) -> Self {
        Self {
            pool_id: pool_id.into(),
            token0_amount: Decimal::ZERO,
            token1_amount: Decimal::ZERO,
            share: Decimal::ZERO,
            value: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.token0_amount.is_zero() && self.token1_amount.is_zero()
    }
}
