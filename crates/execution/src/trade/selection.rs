//! Transient trade selection.

use dex_domain::entities::AssetId;
use rust_decimal::Decimal;

/// Source, destination and input amount chosen by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeSelection {
    /// Asset to sell.
    pub from: Option<AssetId>,
    /// Asset to buy.
    pub to: Option<AssetId>,
    /// Units of the source asset to sell.
    pub amount: Decimal,
}

impl TradeSelection {
    /// Returns both ids if both sides are selected.
    pub fn pair(&self) -> Option<(&AssetId, &AssetId)> {
        Some((self.from.as_ref()?, self.to.as_ref()?))
    }
}
