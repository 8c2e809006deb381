use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a trade would do if confirmed now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePreview {
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    pub rate: Decimal,
    /// Always zero: trades settle at the flat spot rate.
    pub price_impact: Decimal,
    pub fee: Decimal,
    pub min_received: Decimal,
}
