//! Trade execution between two portfolio assets.
//!
//! - Pair selection and input amount
//! - Spot-rate quotes and previews
//! - Atomic execution with a ledger record

mod engine;
mod selection;

pub use engine::*;
pub use selection::*;
