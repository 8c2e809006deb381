//! Initial in-memory state.

use crate::error::SeedError;
use chrono::{Duration, Utc};
use dex_domain::entities::{
    Asset, MarketStats, Pool, PoolPosition, TradingPair, TransactionInput,
};
use dex_domain::enums::{AssetType, TransactionType};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to populate a [`crate::Store`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Seed {
    pub assets: Vec<Asset>,
    pub pools: Vec<Pool>,
    pub positions: Vec<PoolPosition>,
    pub markets: Vec<MarketStats>,
    pub trading_pairs: Vec<TradingPair>,
    pub transactions: Vec<TransactionInput>,
}

impl Seed {
    /// Parses a seed from JSON.
    ///
    /// # Errors
    /// Returns an error if the JSON does not describe a seed.
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a seed from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Demo portfolio, pools, markets and history.
    #[must_use]
    pub fn demo() -> Self {
        let now = Utc::now();

        let assets = vec![
            Asset::new("1", "BTC", "Bitcoin", dec!(1.2), dec!(65000), AssetType::Sat20),
            Asset::new("2", "ORDI", "Ordinals", dec!(1000), dec!(50), AssetType::Brc20),
            Asset::new("3", "MEME", "Memecoin", dec!(5000), dec!(0.1), AssetType::Rune),
            Asset::new("4", "USDT", "Tether", dec!(10000), dec!(1), AssetType::Other),
        ];

        let pools = vec![
            Pool {
                id: "btc-usdt".to_string(),
                token0: "BTC".to_string(),
                token1: "USDT".to_string(),
                token0_balance: dec!(100),
                token1_balance: dec!(6500000),
                apr: dec!(12.5),
                total_liquidity: dec!(6500000),
                user_liquidity: dec!(65000),
                rewards: dec!(150),
                volume24h: dec!(1200000),
            },
            Pool {
                id: "eth-usdt".to_string(),
                token0: "ETH".to_string(),
                token1: "USDT".to_string(),
                token0_balance: dec!(1000),
                token1_balance: dec!(3500000),
                apr: dec!(8.2),
                total_liquidity: dec!(3500000),
                user_liquidity: dec!(35000),
                rewards: dec!(80),
                volume24h: dec!(800000),
            },
        ];

        let positions = vec![PoolPosition {
            pool_id: "btc-usdt".to_string(),
            token0_amount: dec!(1),
            token1_amount: dec!(65000),
            share: dec!(0.01),
            value: dec!(65000),
        }];

        let markets = vec![
            MarketStats {
                id: "eth-usdt".to_string(),
                pair: "ETH/USDT".to_string(),
                price: dec!(3500),
                volume24h: dec!(1250000),
                change24h: dec!(2.5),
                tvl: dec!(5000000),
            },
            MarketStats {
                id: "btc-usdt".to_string(),
                pair: "BTC/USDT".to_string(),
                price: dec!(65000),
                volume24h: dec!(3500000),
                change24h: dec!(-1.2),
                tvl: dec!(12000000),
            },
        ];

        let trading_pairs = vec![
            TradingPair {
                id: "eth-usdt".to_string(),
                base_asset: "ETH".to_string(),
                quote_asset: "USDT".to_string(),
                last_price: dec!(3500),
                volume24h: dec!(1250000),
                change24h: dec!(2.5),
            },
            TradingPair {
                id: "btc-usdt".to_string(),
                base_asset: "BTC".to_string(),
                quote_asset: "USDT".to_string(),
                last_price: dec!(65000),
                volume24h: dec!(3500000),
                change24h: dec!(-1.2),
            },
        ];

        let transactions = vec![
            TransactionInput::completed(TransactionType::Swap, "BTC", "USDT", dec!(0.5), dec!(32500))
                .with_timestamp(now - Duration::hours(1))
                .with_hash("0x1234...5678")
                .with_fee(dec!(0.001)),
            TransactionInput::completed(
                TransactionType::AddLiquidity,
                "ETH",
                "USDT",
                dec!(10),
                dec!(35000),
            )
            .with_timestamp(now - Duration::hours(2))
            .with_hash("0x5678...9012")
            .with_fee(dec!(0.002)),
            TransactionInput::completed(TransactionType::Mint, "MEME", "MEME", dec!(0), dec!(1000))
                .with_timestamp(now - Duration::hours(24))
                .with_hash("0x9012...3456")
                .with_fee(dec!(0.0005)),
        ];

        Self {
            assets,
            pools,
            positions,
            markets,
            trading_pairs,
            transactions,
        }
    }
}
