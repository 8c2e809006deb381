//! Read-only market statistics.

use dex_domain::entities::{MarketStats, TradingPair};
use dex_domain::math::valuation::checked_sum;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Market statistics and trading pairs. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct MarketRegistry {
    stats: Arc<Vec<MarketStats>>,
    pairs: Arc<Vec<TradingPair>>,
}

impl MarketRegistry {
    /// Creates a registry over fixed statistics.
    #[must_use]
    pub fn new(stats: Vec<MarketStats>, pairs: Vec<TradingPair>) -> Self {
        Self {
            stats: Arc::new(stats),
            pairs: Arc::new(pairs),
        }
    }

    pub fn market_stats(&self) -> &[MarketStats] {
        &self.stats
    }

    pub fn trading_pairs(&self) -> &[TradingPair] {
        &self.pairs
    }

    pub fn find_stats(&self, id: &str) -> Option<&MarketStats> {
        self.stats.iter().find(|s| s.id == id)
    }

    pub fn find_pair(&self, base: &str, quote: &str) -> Option<&TradingPair> {
        self.pairs
            .iter()
            .find(|p| p.base_asset == base && p.quote_asset == quote)
    }

    /// Sum of 24h volume over all markets, `None` on overflow.
    pub fn total_volume_24h(&self) -> Option<Decimal> {
        checked_sum(self.stats.iter().map(|s| s.volume24h))
    }

    /// Sum of TVL over all markets, `None` on overflow.
    pub fn total_tvl(&self) -> Option<Decimal> {
        checked_sum(self.stats.iter().map(|s| s.tvl))
    }
}
