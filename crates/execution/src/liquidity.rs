//! Liquidity deposits and withdrawals against the user's portfolio.

use crate::config::EngineConfig;
use crate::settlement_hash;
use dex_data::{Ledger, PoolRegistry, Withdrawal};
use dex_domain::PoolError;
use dex_domain::entities::{Asset, Pool, PoolPosition, Transaction, TransactionInput};
use dex_domain::enums::TransactionType;
use dex_domain::ports::{BalanceChange, BalanceSource};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of a liquidity operation.
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidityReceipt {
    /// Ledger record of the operation.
    pub transaction: Transaction,
    /// Position after the operation, `None` if it was closed.
    pub position: Option<PoolPosition>,
}

/// Moves tokens between the portfolio and liquidity pools.
pub struct LiquidityDesk {
    balances: Arc<dyn BalanceSource>,
    pools: PoolRegistry,
    ledger: Ledger,
    config: EngineConfig,
}

impl LiquidityDesk {
    /// Creates a new liquidity desk.
    pub fn new(
        balances: Arc<dyn BalanceSource>,
        pools: PoolRegistry,
        ledger: Ledger,
        config: EngineConfig,
    ) -> Self {
        Self {
            balances,
            pools,
            ledger,
            config,
        }
    }

    /// Deposits `amount0` of token0 and `amount1` of token1 into `pool_id`.
    ///
    /// Both tokens are debited from the portfolio, the position grows and an
    /// `ADD_LIQUIDITY` record is appended. On failure nothing changes.
    ///
    /// # Errors
    /// Returns an error if an amount is not positive, the pool is unknown, a
    /// pooled token is missing from the portfolio or its balance is too low.
    pub fn add_liquidity(
        &self,
        pool_id: &str,
        amount0: Decimal,
        amount1: Decimal,
    ) -> Result<LiquidityReceipt, PoolError> {
        let mut position = None;

        let result = self.ledger.record(|| {
            if amount0 <= Decimal::ZERO || amount1 <= Decimal::ZERO {
                return Err(PoolError::NonPositiveAmount);
            }
            let pool = self.find_pool(pool_id)?;
            let (asset0, asset1) = self.pooled_assets(&pool)?;

            self.balances.apply(&[
                BalanceChange::debit(asset0.id.clone(), amount0),
                BalanceChange::debit(asset1.id.clone(), amount1),
            ])?;

            match self.pools.add_liquidity(pool_id, amount0, amount1) {
                Ok(added) => position = Some(added),
                Err(err) => {
                    self.refund(&asset0, amount0, &asset1, amount1);
                    return Err(err);
                }
            }

            Ok(TransactionInput::completed(
                TransactionType::AddLiquidity,
                pool.token0,
                pool.token1,
                amount0,
                amount1,
            )
            .with_hash(settlement_hash())
            .with_fee(self.config.network_fee))
        });

        match result {
            Ok(transaction) => {
                info!(id = %transaction.id, pool = %pool_id, "Liquidity deposit recorded");
                Ok(LiquidityReceipt {
                    transaction,
                    position,
                })
            }
            Err(err) => {
                warn!(pool = %pool_id, error = %err, "Liquidity deposit refused");
                Err(err)
            }
        }
    }

    /// Withdraws `fraction` (in (0, 1]) of the position in `pool_id`.
    ///
    /// Both tokens are credited to the portfolio and a `REMOVE_LIQUIDITY`
    /// record is appended. A full withdrawal closes the position.
    ///
    /// On failure nothing changes: a withdrawal whose tokens cannot be
    /// credited is put back into the pool.
    ///
    /// # Errors
    /// Returns an error if the fraction is out of range, the pool or position
    /// is unknown, a pooled token is missing from the portfolio or a credit
    /// is refused.
    pub fn remove_liquidity(
        &self,
        pool_id: &str,
        fraction: Decimal,
    ) -> Result<LiquidityReceipt, PoolError> {
        let mut position = None;

        let result = self.ledger.record(|| {
            let pool = self.find_pool(pool_id)?;
            let (asset0, asset1) = self.pooled_assets(&pool)?;
            let snapshot = self.pools.position_for(pool_id);

            let Withdrawal {
                token0_amount,
                token1_amount,
                remaining,
                ..
            } = self.pools.remove_liquidity(pool_id, fraction)?;

            if let Err(err) = self.balances.apply(&[
                BalanceChange::credit(asset0.id, token0_amount),
                BalanceChange::credit(asset1.id, token1_amount),
            ]) {
                self.pools.restore(pool, snapshot);
                return Err(err.into());
            }
            position = remaining;

            Ok(TransactionInput::completed(
                TransactionType::RemoveLiquidity,
                pool.token0,
                pool.token1,
                token0_amount,
                token1_amount,
            )
            .with_hash(settlement_hash())
            .with_fee(self.config.network_fee))
        });

        match result {
            Ok(transaction) => {
                info!(id = %transaction.id, pool = %pool_id, "Liquidity withdrawal recorded");
                Ok(LiquidityReceipt {
                    transaction,
                    position,
                })
            }
            Err(err) => {
                warn!(pool = %pool_id, error = %err, "Liquidity withdrawal refused");
                Err(err)
            }
        }
    }

    fn find_pool(&self, pool_id: &str) -> Result<Pool, PoolError> {
        self.pools
            .find_by_id(pool_id)
            .ok_or_else(|| PoolError::PoolNotFound(pool_id.to_string()))
    }

    fn pooled_assets(&self, pool: &Pool) -> Result<(Asset, Asset), PoolError> {
        let asset0 = self
            .balances
            .find_by_symbol(&pool.token0)
            .ok_or_else(|| PoolError::AssetNotFound(pool.token0.clone()))?;
        let asset1 = self
            .balances
            .find_by_symbol(&pool.token1)
            .ok_or_else(|| PoolError::AssetNotFound(pool.token1.clone()))?;
        Ok((asset0, asset1))
    }

    fn refund(&self, asset0: &Asset, amount0: Decimal, asset1: &Asset, amount1: Decimal) {
        let refund = [
            BalanceChange::credit(asset0.id.clone(), amount0),
            BalanceChange::credit(asset1.id.clone(), amount1),
        ];
        if let Err(err) = self.balances.apply(&refund) {
            error!(error = %err, "Failed to refund liquidity deposit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_data::{AssetRegistry, Seed, Store};
    use dex_domain::entities::AssetId;
    use dex_domain::error::BalanceError;
    use rust_decimal_macros::dec;

    fn desk() -> (Store, LiquidityDesk) {
        let store = Store::from_seed(Seed::demo()).unwrap();
        let desk = LiquidityDesk::new(
            Arc::new(store.assets().clone()),
            store.pools().clone(),
            store.ledger().clone(),
            EngineConfig::default(),
        );
        (store, desk)
    }

    fn balance(store: &Store, id: &str) -> Decimal {
        store.assets().find_by_id(&AssetId::new(id)).unwrap().balance
    }

    #[test]
    fn test_add_liquidity_debits_and_records() {
        let (store, desk) = desk();

        let receipt = desk
            .add_liquidity("btc-usdt", dec!(0.1), dec!(6500))
            .unwrap();

        assert_eq!(balance(&store, "1"), dec!(1.1));
        assert_eq!(balance(&store, "4"), dec!(3500));
        let position = receipt.position.unwrap();
        assert_eq!(position.token0_amount, dec!(1.1));
        assert_eq!(position.token1_amount, dec!(71500));
        assert_eq!(receipt.transaction.tx_type, TransactionType::AddLiquidity);
        assert_eq!(receipt.transaction.from_asset, "BTC");
        assert_eq!(store.ledger().transactions()[0], receipt.transaction);
    }

    #[test]
    fn test_add_liquidity_insufficient_balance() {
        let (store, desk) = desk();
        let before = store.ledger().len();

        let err = desk
            .add_liquidity("btc-usdt", dec!(0.1), dec!(20000))
            .unwrap_err();
        assert!(matches!(
            err,
            PoolError::Balance(BalanceError::InsufficientBalance { .. })
        ));
        assert_eq!(balance(&store, "1"), dec!(1.2));
        assert_eq!(balance(&store, "4"), dec!(10000));
        assert_eq!(store.pools().position_for("btc-usdt").unwrap().token0_amount, dec!(1));
        assert_eq!(store.ledger().len(), before);
    }

    #[test]
    fn test_add_liquidity_missing_asset() {
        let (store, desk) = desk();
        // The demo portfolio holds no ETH.
        assert_eq!(
            desk.add_liquidity("eth-usdt", dec!(1), dec!(3500)),
            Err(PoolError::AssetNotFound("ETH".to_string()))
        );
        assert_eq!(
            desk.add_liquidity("sol-usdt", dec!(1), dec!(1)),
            Err(PoolError::PoolNotFound("sol-usdt".to_string()))
        );
        assert_eq!(store.pools().total_value_locked(), Some(dec!(10000000)));
    }

    #[test]
    fn test_remove_liquidity_credits_and_closes() {
        let (store, desk) = desk();

        let half = desk.remove_liquidity("btc-usdt", dec!(0.5)).unwrap();
        assert_eq!(balance(&store, "1"), dec!(1.7));
        assert_eq!(balance(&store, "4"), dec!(42500));
        assert!(half.position.is_some());
        assert_eq!(half.transaction.tx_type, TransactionType::RemoveLiquidity);

        let rest = desk.remove_liquidity("btc-usdt", Decimal::ONE).unwrap();
        assert!(rest.position.is_none());
        assert_eq!(balance(&store, "1"), dec!(2.2));
        assert!(store.pools().position_for("btc-usdt").is_none());

        assert_eq!(
            desk.remove_liquidity("btc-usdt", Decimal::ONE),
            Err(PoolError::PositionNotFound("btc-usdt".to_string()))
        );
    }

    /// Resolves assets from a real registry but refuses every change.
    struct FrozenBalances {
        assets: AssetRegistry,
    }

    impl BalanceSource for FrozenBalances {
        fn find_by_id(&self, id: &AssetId) -> Option<Asset> {
            self.assets.find_by_id(id)
        }

        fn find_by_symbol(&self, symbol: &str) -> Option<Asset> {
            self.assets.find_by_symbol(symbol)
        }

        fn update_balance(&self, _id: &AssetId, _new_balance: Decimal) {}

        fn apply(&self, changes: &[BalanceChange]) -> Result<(), BalanceError> {
            Err(BalanceError::Overflow(changes[0].asset_id.clone()))
        }
    }

    #[test]
    fn test_refused_credit_restores_pool() {
        let store = Store::from_seed(Seed::demo()).unwrap();
        let desk = LiquidityDesk::new(
            Arc::new(FrozenBalances {
                assets: store.assets().clone(),
            }),
            store.pools().clone(),
            store.ledger().clone(),
            EngineConfig::default(),
        );
        let pool = store.pools().find_by_id("btc-usdt").unwrap();
        let position = store.pools().position_for("btc-usdt");
        let before = store.ledger().len();

        for fraction in [dec!(0.5), Decimal::ONE] {
            assert_eq!(
                desk.remove_liquidity("btc-usdt", fraction),
                Err(PoolError::Balance(BalanceError::Overflow(AssetId::new("1"))))
            );
            assert_eq!(store.pools().find_by_id("btc-usdt"), Some(pool.clone()));
            assert_eq!(store.pools().position_for("btc-usdt"), position);
        }
        assert_eq!(store.ledger().len(), before);
    }
}
