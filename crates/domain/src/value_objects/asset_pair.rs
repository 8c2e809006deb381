use crate::entities::asset::Asset;
use crate::math::valuation::{convert, exchange_rate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A source/destination selection with its implied exchange rate.
///
/// Built from live asset snapshots on every read and never stored, so the
/// rate always reflects the current prices of both endpoints.
///
/// `rate` is the price ratio `to.price / from.price`. Trades conserve value,
/// so `amount` source units buy `amount * from.price / to.price` destination
/// units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPair {
    pub from_asset: Asset,
    pub to_asset: Asset,
    pub rate: Decimal,
}

impl AssetPair {
    /// Prices the pair. Returns `None` unless both endpoints have a positive price.
    pub fn new(from_asset: Asset, to_asset: Asset) -> Option<Self> {
        if from_asset.price <= Decimal::ZERO || to_asset.price <= Decimal::ZERO {
            return None;
        }
        let rate = exchange_rate(from_asset.price, to_asset.price)?;
        Some(Self {
            from_asset,
            to_asset,
            rate,
        })
    }

    /// Destination units received for `amount` source units, `None` if the
    /// amount is too large to price.
    pub fn output_for(&self, amount: Decimal) -> Option<Decimal> {
        convert(amount, self.from_asset.price, self.to_asset.price)
    }

    /// The same pair traded the other way.
    pub fn reversed(&self) -> Option<Self> {
        Self::new(self.to_asset.clone(), self.from_asset.clone())
    }
}
