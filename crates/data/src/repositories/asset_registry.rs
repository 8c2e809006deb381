//! Asset registry: the authoritative list of portfolio holdings.

use crate::error::RegistryError;
use dex_domain::entities::{Asset, AssetId};
use dex_domain::error::BalanceError;
use dex_domain::math::valuation::total_value;
use dex_domain::ports::{BalanceChange, BalanceSource};
use rust_decimal::Decimal;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// Registry of holdings in registration order.
#[derive(Clone, Default)]
pub struct AssetRegistry {
    assets: Arc<RwLock<Vec<Asset>>>,
}

impl AssetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an asset.
    ///
    /// # Errors
    /// Returns an error if an asset with the same id is already registered,
    /// or if its balance or price is negative.
    pub fn register(&self, asset: Asset) -> Result<(), RegistryError> {
        if asset.balance < Decimal::ZERO {
            return Err(RegistryError::NegativeBalance(asset.id));
        }
        if asset.price < Decimal::ZERO {
            return Err(RegistryError::NegativePrice(asset.id));
        }
        let mut assets = self.write();
        if assets.iter().any(|a| a.id == asset.id) {
            return Err(RegistryError::DuplicateAsset(asset.id));
        }
        debug!(id = %asset.id, symbol = %asset.symbol, "Asset registered");
        assets.push(asset);
        Ok(())
    }

    /// Snapshot of all assets.
    pub fn assets(&self) -> Vec<Asset> {
        self.read().clone()
    }

    /// Finds an asset by id.
    pub fn find_by_id(&self, id: &AssetId) -> Option<Asset> {
        self.read().iter().find(|a| &a.id == id).cloned()
    }

    /// Finds the first asset carrying `symbol`.
    pub fn find_by_symbol(&self, symbol: &str) -> Option<Asset> {
        self.read().iter().find(|a| a.symbol == symbol).cloned()
    }

    /// Portfolio value: sum of balance * price over all assets.
    ///
    /// Returns `None` if the sum is too large to represent.
    pub fn total_value(&self) -> Option<Decimal> {
        total_value(self.read().iter().map(|a| (a.balance, a.price)))
    }

    /// Replaces the balance of `id`.
    ///
    /// Unknown ids are ignored. Negative balances are refused and logged.
    pub fn update_balance(&self, id: &AssetId, new_balance: Decimal) {
        if new_balance < Decimal::ZERO {
            warn!(id = %id, balance = %new_balance, "Refusing negative balance");
            return;
        }
        let mut assets = self.write();
        if let Some(asset) = assets.iter_mut().find(|a| &a.id == id) {
            asset.balance = new_balance;
            debug!(id = %id, balance = %new_balance, "Balance updated");
        }
    }

    /// Applies all balance changes under a single write lock, or none.
    ///
    /// # Errors
    /// Returns an error if an asset is unknown, or a balance would go
    /// negative or overflow.
    pub fn apply(&self, changes: &[BalanceChange]) -> Result<(), BalanceError> {
        let mut assets = self.write();

        // Stage resulting balances so repeated ids see earlier changes.
        let mut staged: Vec<(usize, Decimal)> = Vec::with_capacity(changes.len());
        for change in changes {
            let index = assets
                .iter()
                .position(|a| a.id == change.asset_id)
                .ok_or_else(|| BalanceError::AssetNotFound(change.asset_id.clone()))?;

            let current = staged
                .iter()
                .rev()
                .find(|(i, _)| *i == index)
                .map_or(assets[index].balance, |(_, b)| *b);
            let next = current
                .checked_add(change.delta)
                .ok_or_else(|| BalanceError::Overflow(change.asset_id.clone()))?;

            if next < Decimal::ZERO {
                return Err(BalanceError::InsufficientBalance {
                    asset: change.asset_id.clone(),
                    available: current,
                    required: -change.delta,
                });
            }
            staged.push((index, next));
        }

        for (index, balance) in staged {
            assets[index].balance = balance;
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Asset>> {
        self.assets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Asset>> {
        self.assets.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BalanceSource for AssetRegistry {
    fn find_by_id(&self, id: &AssetId) -> Option<Asset> {
        AssetRegistry::find_by_id(self, id)
    }

    fn find_by_symbol(&self, symbol: &str) -> Option<Asset> {
        AssetRegistry::find_by_symbol(self, symbol)
    }

    fn update_balance(&self, id: &AssetId, new_balance: Decimal) {
        AssetRegistry::update_balance(self, id, new_balance);
    }

    fn apply(&self, changes: &[BalanceChange]) -> Result<(), BalanceError> {
        AssetRegistry::apply(self, changes)
    }
}
