use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A two-sided liquidity reserve.
///
/// `total_liquidity` and `user_liquidity` are snapshot figures supplied with
/// the pool; they are not re-derived from the token balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: String,
    pub token0: String,
    pub token1: String,
    pub token0_balance: Decimal,
    pub token1_balance: Decimal,
    pub apr: Decimal, // percent
    pub total_liquidity: Decimal,
    pub user_liquidity: Decimal,
    pub rewards: Decimal,
    pub volume24h: Decimal,
}

impl Pool {
    /// Returns true if `symbol` is one of the two pooled tokens.
    pub fn holds(&self, symbol: &str) -> bool {
        self.token0 == symbol || self.token1 == symbol
    }

    /// Pair label in `TOKEN0/TOKEN1` form.
    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.token0, self.token1)
    }
}
