use crate::entities::asset::AssetId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failure of an atomic balance change.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BalanceError {
    #[error("Asset '{0}' not found")]
    AssetNotFound(AssetId),

    #[error("Insufficient {asset} balance: available {available}, required {required}")]
    InsufficientBalance {
        asset: AssetId,
        available: Decimal,
        required: Decimal,
    },

    #[error("Balance of {0} would exceed the representable range")]
    Overflow(AssetId),
}

/// Reasons a trade is refused. A refused trade never mutates state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradeError {
    #[error("Trading pair is not resolved")]
    PairUnresolved,

    #[error("Trade amount must be positive")]
    NonPositiveAmount,

    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        available: Decimal,
        required: Decimal,
    },

    #[error("Pair has a zero-priced side; no exchange rate exists")]
    DegenerateRate,

    #[error("Trade amount is too large to settle")]
    AmountOutOfRange,
}

impl From<BalanceError> for TradeError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::AssetNotFound(_) => Self::PairUnresolved,
            BalanceError::InsufficientBalance {
                available,
                required,
                ..
            } => Self::InsufficientBalance {
                available,
                required,
            },
            BalanceError::Overflow(_) => Self::AmountOutOfRange,
        }
    }
}

/// Liquidity pool errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoolError {
    #[error("Pool '{0}' not found")]
    PoolNotFound(String),

    #[error("No position in pool '{0}'")]
    PositionNotFound(String),

    #[error("Liquidity amounts must be positive")]
    NonPositiveAmount,

    #[error("Withdrawal fraction must be in (0, 1], got {0}")]
    InvalidFraction(Decimal),

    #[error("No asset with symbol '{0}' in the portfolio")]
    AssetNotFound(String),

    #[error("Liquidity amounts are too large for pool '{0}'")]
    AmountOutOfRange(String),

    #[error(transparent)]
    Balance(#[from] BalanceError),
}

/// Mint errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MintError {
    #[error("Mint amount must be positive")]
    NonPositiveAmount,

    #[error(transparent)]
    Balance(#[from] BalanceError),
}
