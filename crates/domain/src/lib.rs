//! Domain model for a DEX client: assets, pools, positions and the ledger's
//! transactions, plus the valuation math shared by every component.

/// Core entities.
pub mod entities;
/// Enumerations shared across entities.
pub mod enums;
/// Error types.
pub mod error;
/// Valuation math.
pub mod math;
/// Capabilities injected into engines.
pub mod ports;
/// Derived values that are never stored.
pub mod value_objects;

pub use error::{BalanceError, MintError, PoolError, TradeError};
