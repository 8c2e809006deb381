//! Engine configuration.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable holding the flat network fee recorded per operation.
pub const NETWORK_FEE_ENV: &str = "DEX_NETWORK_FEE";
/// Environment variable holding the slippage tolerance in basis points.
pub const SLIPPAGE_BPS_ENV: &str = "DEX_SLIPPAGE_BPS";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Slippage tolerance must be at most 10000 bps, got {0}")]
    SlippageOutOfRange(u32),
}

/// Settings shared by the trade engine and the desks.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Flat fee recorded on each ledger entry. Not deducted from balances.
    pub network_fee: Decimal,
    /// Tolerance used for the minimum-received figure of a trade preview.
    pub slippage_bps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network_fee: Decimal::new(1, 3), // 0.001
            slippage_bps: 50,                // 0.5%
        }
    }
}

impl EngineConfig {
    /// Reads overrides from the process environment.
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`; unset keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if a value is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(NETWORK_FEE_ENV) {
            config.network_fee = Decimal::from_str(value.trim())
                .ok()
                .filter(|fee| *fee >= Decimal::ZERO)
                .ok_or(ConfigError::InvalidValue {
                    key: NETWORK_FEE_ENV,
                    value,
                })?;
        }

        if let Some(value) = lookup(SLIPPAGE_BPS_ENV) {
            let bps = value
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: SLIPPAGE_BPS_ENV,
                    value: value.clone(),
                })?;
            if bps > 10_000 {
                return Err(ConfigError::SlippageOutOfRange(bps));
            }
            config.slippage_bps = bps;
        }

        Ok(config)
    }

    /// Slippage tolerance as a fraction.
    pub fn slippage_fraction(&self) -> Decimal {
        Decimal::from(self.slippage_bps) / Decimal::from(10_000)
    }
}
