use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for a traded market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub id: String,
    pub pair: String,
    pub price: Decimal,
    pub volume24h: Decimal,
    pub change24h: Decimal, // percent
    pub tvl: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPair {
    pub id: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub last_price: Decimal,
    pub volume24h: Decimal,
    pub change24h: Decimal,
}
