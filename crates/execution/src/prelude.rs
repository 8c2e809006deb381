//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use dex_execution::prelude::*;
//! ```

// Config
pub use crate::config::{ConfigError, EngineConfig};

// Liquidity
pub use crate::liquidity::{LiquidityDesk, LiquidityReceipt};

// Mint
pub use crate::mint::Minter;

// Trade
pub use crate::trade::{TradeEngine, TradeSelection};
