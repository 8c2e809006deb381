pub mod asset;
pub mod market;
pub mod pool;
pub mod position;
pub mod transaction;

// Re-export for easier access
pub use asset::{Asset, AssetId};
pub use market::{MarketStats, TradingPair};
pub use pool::Pool;
pub use position::PoolPosition;
pub use transaction::{Transaction, TransactionId, TransactionInput};
