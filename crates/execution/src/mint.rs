//! Asset minting.

use crate::config::EngineConfig;
use crate::settlement_hash;
use dex_data::Ledger;
use dex_domain::MintError;
use dex_domain::entities::{AssetId, Transaction, TransactionInput};
use dex_domain::enums::TransactionType;
use dex_domain::error::BalanceError;
use dex_domain::ports::{BalanceChange, BalanceSource};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

/// Credits newly minted units to portfolio assets.
pub struct Minter {
    balances: Arc<dyn BalanceSource>,
    ledger: Ledger,
    config: EngineConfig,
}

impl Minter {
    pub fn new(balances: Arc<dyn BalanceSource>, ledger: Ledger, config: EngineConfig) -> Self {
        Self {
            balances,
            ledger,
            config,
        }
    }

    /// Mints `amount` units of `asset_id` and appends a `MINT` record.
    ///
    /// # Errors
    /// Returns an error if the amount is not positive or the asset is unknown.
    pub fn mint(&self, asset_id: &AssetId, amount: Decimal) -> Result<Transaction, MintError> {
        let result = self.ledger.record(|| {
            if amount <= Decimal::ZERO {
                return Err(MintError::NonPositiveAmount);
            }
            let asset = self
                .balances
                .find_by_id(asset_id)
                .ok_or_else(|| BalanceError::AssetNotFound(asset_id.clone()))?;

            self.balances
                .apply(&[BalanceChange::credit(asset.id.clone(), amount)])?;

            Ok(TransactionInput::completed(
                TransactionType::Mint,
                asset.symbol.clone(),
                asset.symbol,
                Decimal::ZERO,
                amount,
            )
            .with_hash(settlement_hash())
            .with_fee(self.config.network_fee))
        });

        match &result {
            Ok(tx) => info!(id = %tx.id, asset = %tx.to_asset, amount = %amount, "Minted"),
            Err(err) => warn!(asset = %asset_id, error = %err, "Mint refused"),
        }
        result
    }
}
