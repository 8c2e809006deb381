//! Pool registry: liquidity pools and the user's positions in them.
//!
//! Liquidity is measured on the token1 (quote) side: a position's share is
//! `token1_amount / pool.token1_balance` and its value is
//! `share * pool.total_liquidity`.

use crate::error::RegistryError;
use dex_domain::PoolError;
use dex_domain::entities::{Pool, PoolPosition};
use dex_domain::math::valuation::checked_sum;
use rust_decimal::Decimal;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct PoolBook {
    pools: Vec<Pool>,
    positions: Vec<PoolPosition>,
}

impl PoolBook {
    fn pool_index(&self, pool_id: &str) -> Result<usize, PoolError> {
        self.pools
            .iter()
            .position(|p| p.id == pool_id)
            .ok_or_else(|| PoolError::PoolNotFound(pool_id.to_string()))
    }
}

/// Tokens returned by a liquidity withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    /// Pool withdrawn from.
    pub pool_id: String,
    /// Token0 returned.
    pub token0_amount: Decimal,
    /// Token1 returned.
    pub token1_amount: Decimal,
    /// Position left behind, `None` if fully withdrawn.
    pub remaining: Option<PoolPosition>,
}

/// Registry of pools and positions. At most one position per pool.
#[derive(Clone, Default)]
pub struct PoolRegistry {
    book: Arc<RwLock<PoolBook>>,
}

impl PoolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pool.
    ///
    /// # Errors
    /// Returns an error if the pool id is already registered.
    pub fn register_pool(&self, pool: Pool) -> Result<(), RegistryError> {
        let mut book = self.write();
        if book.pools.iter().any(|p| p.id == pool.id) {
            return Err(RegistryError::DuplicatePool(pool.id));
        }
        debug!(pool = %pool.id, pair = %pool.pair_label(), "Pool registered");
        book.pools.push(pool);
        Ok(())
    }

    /// Records an existing position, as loaded from seed data.
    ///
    /// # Errors
    /// Returns an error if the pool is unknown or already has a position.
    pub fn open_position(&self, position: PoolPosition) -> Result<(), RegistryError> {
        let mut book = self.write();
        if !book.pools.iter().any(|p| p.id == position.pool_id) {
            return Err(RegistryError::UnknownPool(position.pool_id));
        }
        if book.positions.iter().any(|p| p.pool_id == position.pool_id) {
            return Err(RegistryError::DuplicatePosition(position.pool_id));
        }
        book.positions.push(position);
        Ok(())
    }

    /// Snapshot of all pools.
    pub fn pools(&self) -> Vec<Pool> {
        self.read().pools.clone()
    }

    /// Snapshot of all positions.
    pub fn positions(&self) -> Vec<PoolPosition> {
        self.read().positions.clone()
    }

    /// Finds a pool by id.
    pub fn find_by_id(&self, id: &str) -> Option<Pool> {
        self.read().pools.iter().find(|p| p.id == id).cloned()
    }

    /// Finds the user's position in `pool_id`.
    pub fn position_for(&self, pool_id: &str) -> Option<PoolPosition> {
        self.read()
            .positions
            .iter()
            .find(|p| p.pool_id == pool_id)
            .cloned()
    }

    /// Sum of total liquidity over all pools, `None` on overflow.
    pub fn total_value_locked(&self) -> Option<Decimal> {
        checked_sum(self.read().pools.iter().map(|p| p.total_liquidity))
    }

    /// Sum of the user's liquidity over all pools, `None` on overflow.
    pub fn total_user_liquidity(&self) -> Option<Decimal> {
        checked_sum(self.read().pools.iter().map(|p| p.user_liquidity))
    }

    /// Deposits both tokens into `pool_id`, creating the position if needed.
    ///
    /// Does not touch asset balances; callers debit the portfolio.
    ///
    /// # Errors
    /// Returns an error if an amount is not positive, the pool is unknown or
    /// a resulting balance would overflow. Nothing changes on error.
    pub fn add_liquidity(
        &self,
        pool_id: &str,
        amount0: Decimal,
        amount1: Decimal,
    ) -> Result<PoolPosition, PoolError> {
        if amount0 <= Decimal::ZERO || amount1 <= Decimal::ZERO {
            return Err(PoolError::NonPositiveAmount);
        }

        let mut book = self.write();
        let index = book.pool_index(pool_id)?;

        let out_of_range = || PoolError::AmountOutOfRange(pool_id.to_string());
        let mut pool = book.pools[index].clone();
        pool.token0_balance = pool.token0_balance.checked_add(amount0).ok_or_else(out_of_range)?;
        pool.token1_balance = pool.token1_balance.checked_add(amount1).ok_or_else(out_of_range)?;
        pool.total_liquidity = pool.total_liquidity.checked_add(amount1).ok_or_else(out_of_range)?;
        pool.user_liquidity = pool.user_liquidity.checked_add(amount1).ok_or_else(out_of_range)?;

        let existing = book.positions.iter().position(|p| p.pool_id == pool_id);
        let mut position = existing
            .map_or_else(|| PoolPosition::empty(pool_id), |i| book.positions[i].clone());
        position.token0_amount = position.token0_amount.checked_add(amount0).ok_or_else(out_of_range)?;
        position.token1_amount = position.token1_amount.checked_add(amount1).ok_or_else(out_of_range)?;
        revalue(&mut position, &pool);

        book.pools[index] = pool;
        match existing {
            Some(i) => book.positions[i] = position.clone(),
            None => book.positions.push(position.clone()),
        }

        info!(
            pool = %pool_id,
            amount0 = %amount0,
            amount1 = %amount1,
            share = %position.share,
            "Liquidity added"
        );
        Ok(position)
    }

    /// Withdraws `fraction` of the position in `pool_id`.
    ///
    /// Does not touch asset balances; callers credit the portfolio.
    ///
    /// # Errors
    /// Returns an error if the fraction is outside (0, 1], or the pool or
    /// position is unknown.
    pub fn remove_liquidity(&self, pool_id: &str, fraction: Decimal) -> Result<Withdrawal, PoolError> {
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(PoolError::InvalidFraction(fraction));
        }

        let mut book = self.write();
        let index = book.pool_index(pool_id)?;
        let position_index = book
            .positions
            .iter()
            .position(|p| p.pool_id == pool_id)
            .ok_or_else(|| PoolError::PositionNotFound(pool_id.to_string()))?;

        let (token0_amount, token1_amount) = {
            let position = &book.positions[position_index];
            if fraction == Decimal::ONE {
                (position.token0_amount, position.token1_amount)
            } else {
                (position.token0_amount * fraction, position.token1_amount * fraction)
            }
        };

        let pool = &mut book.pools[index];
        pool.token0_balance = (pool.token0_balance - token0_amount).max(Decimal::ZERO);
        pool.token1_balance = (pool.token1_balance - token1_amount).max(Decimal::ZERO);
        pool.total_liquidity = (pool.total_liquidity - token1_amount).max(Decimal::ZERO);
        pool.user_liquidity = (pool.user_liquidity - token1_amount).max(Decimal::ZERO);
        let pool = pool.clone();

        let remaining = if fraction == Decimal::ONE {
            book.positions.remove(position_index);
            None
        } else {
            let position = &mut book.positions[position_index];
            position.token0_amount -= token0_amount;
            position.token1_amount -= token1_amount;
            revalue(position, &pool);
            Some(position.clone())
        };

        info!(
            pool = %pool_id,
            fraction = %fraction,
            amount0 = %token0_amount,
            amount1 = %token1_amount,
            "Liquidity removed"
        );
        Ok(Withdrawal {
            pool_id: pool_id.to_string(),
            token0_amount,
            token1_amount,
            remaining,
        })
    }

    /// Puts `pool` and its position back to an earlier snapshot.
    ///
    /// Used to undo a withdrawal whose tokens could not be credited.
    pub fn restore(&self, pool: Pool, position: Option<PoolPosition>) {
        let mut book = self.write();
        book.positions.retain(|p| p.pool_id != pool.id);
        if let Some(position) = position {
            book.positions.push(position);
        }
        if let Some(slot) = book.pools.iter_mut().find(|p| p.id == pool.id) {
            debug!(pool = %pool.id, "Pool restored");
            *slot = pool;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PoolBook> {
        self.book.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PoolBook> {
        self.book.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Recomputes share and value from the pool's current state.
fn revalue(position: &mut PoolPosition, pool: &Pool) {
    position.share = if pool.token1_balance.is_zero() {
        Decimal::ZERO
    } else {
        position
            .token1_amount
            .checked_div(pool.token1_balance)
            .map_or(Decimal::ONE, |share| share.min(Decimal::ONE))
    };
    // share <= 1, so the product cannot exceed total_liquidity.
    position.value = position.share * pool.total_liquidity;
}
