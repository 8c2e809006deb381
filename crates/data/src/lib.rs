//! In-memory state stores for the DEX client.
//!
//! All state lives in process memory and starts from a [`seed::Seed`],
//! either the built-in demo data or a JSON file.

/// Error types.
pub mod error;
/// Repositories.
pub mod repositories;
/// Initial state.
pub mod seed;

pub use error::{RegistryError, SeedError};
pub use repositories::{AssetRegistry, Ledger, MarketRegistry, PoolRegistry, Store, Withdrawal};
pub use seed::Seed;
