//! Capabilities other components depend on instead of concrete stores.

use crate::entities::asset::{Asset, AssetId};
use crate::error::BalanceError;
use rust_decimal::Decimal;

/// A signed change to one asset's balance.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceChange {
    pub asset_id: AssetId,
    pub delta: Decimal,
}

impl BalanceChange {
    pub fn debit(asset_id: AssetId, amount: Decimal) -> Self {
        Self {
            asset_id,
            delta: -amount,
        }
    }

    pub fn credit(asset_id: AssetId, amount: Decimal) -> Self {
        Self {
            asset_id,
            delta: amount,
        }
    }
}

/// Read and mutate access to asset balances.
pub trait BalanceSource: Send + Sync {
    /// Snapshot of the asset with `id`, if any.
    fn find_by_id(&self, id: &AssetId) -> Option<Asset>;

    /// Snapshot of the first asset with `symbol`, if any.
    fn find_by_symbol(&self, symbol: &str) -> Option<Asset>;

    /// Replaces a balance. Unknown ids and negative values are ignored.
    fn update_balance(&self, id: &AssetId, new_balance: Decimal);

    /// Applies every change or none of them.
    ///
    /// Changes are validated against the balances they would produce,
    /// including earlier changes to the same asset in `changes`. No balance
    /// may end up negative. Observers never see a partial application.
    fn apply(&self, changes: &[BalanceChange]) -> Result<(), BalanceError>;
}
