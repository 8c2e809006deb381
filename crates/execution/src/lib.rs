//! Trade execution and portfolio operations.
//!
//! This crate provides the commands that mutate portfolio state:
//! - Spot-rate trade quoting and execution
//! - Liquidity deposits and withdrawals
//! - Asset minting
//!
//! Every successful command appends a record to the ledger in the same
//! step as its balance changes.

/// Prelude module for convenient imports.
pub mod prelude;

/// Engine configuration.
pub mod config;
/// Liquidity deposits and withdrawals.
pub mod liquidity;
/// Asset minting.
pub mod mint;
/// Trade quoting and execution.
pub mod trade;

/// Opaque settlement reference attached to ledger records.
pub(crate) fn settlement_hash() -> String {
    format!("0x{}", uuid::Uuid::new_v4().simple())
}
