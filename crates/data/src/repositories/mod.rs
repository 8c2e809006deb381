//! In-memory repositories for portfolio, pool, market and ledger state.
//!
//! Every repository is cheap to clone and shares its state, so the same
//! instance can be handed to several engines.

mod asset_registry;
mod ledger;
mod market_registry;
mod pool_registry;

pub use asset_registry::AssetRegistry;
pub use ledger::Ledger;
pub use market_registry::MarketRegistry;
pub use pool_registry::{PoolRegistry, Withdrawal};

use crate::error::SeedError;
use crate::seed::Seed;

/// The process-wide set of stores, built explicitly and passed to callers.
#[derive(Clone, Default)]
pub struct Store {
    assets: AssetRegistry,
    pools: PoolRegistry,
    markets: MarketRegistry,
    ledger: Ledger,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store populated from `seed`.
    ///
    /// # Errors
    /// Returns an error if the seed contains duplicate ids or positions in
    /// unknown pools.
    pub fn from_seed(seed: Seed) -> Result<Self, SeedError> {
        let assets = AssetRegistry::new();
        for asset in seed.assets {
            assets.register(asset)?;
        }

        let pools = PoolRegistry::new();
        for pool in seed.pools {
            pools.register_pool(pool)?;
        }
        for position in seed.positions {
            pools.open_position(position)?;
        }

        let markets = MarketRegistry::new(seed.markets, seed.trading_pairs);
        let ledger = Ledger::with_history(seed.transactions);

        Ok(Self {
            assets,
            pools,
            markets,
            ledger,
        })
    }

    /// Returns the asset registry.
    #[must_use]
    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Returns the pool registry.
    #[must_use]
    pub fn pools(&self) -> &PoolRegistry {
        &self.pools
    }

    /// Returns the market statistics.
    #[must_use]
    pub fn markets(&self) -> &MarketRegistry {
        &self.markets
    }

    /// Returns the transaction ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}
