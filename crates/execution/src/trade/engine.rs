//! Trade engine.

use super::TradeSelection;
use crate::config::EngineConfig;
use crate::settlement_hash;
use dex_data::Ledger;
use dex_domain::TradeError;
use dex_domain::entities::{AssetId, Transaction, TransactionInput};
use dex_domain::enums::TransactionType;
use dex_domain::ports::{BalanceChange, BalanceSource};
use dex_domain::value_objects::{AssetPair, TradePreview};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Prices and executes trades against a [`BalanceSource`].
///
/// Quotes are recomputed from live balances and prices on every call.
pub struct TradeEngine {
    /// Balance store.
    balances: Arc<dyn BalanceSource>,
    /// Ledger receiving a record for every executed trade.
    ledger: Ledger,
    /// Configuration.
    config: EngineConfig,
    /// Current selection.
    selection: TradeSelection,
}

impl TradeEngine {
    /// Creates a new trade engine with an empty selection.
    pub fn new(balances: Arc<dyn BalanceSource>, ledger: Ledger, config: EngineConfig) -> Self {
        Self {
            balances,
            ledger,
            config,
            selection: TradeSelection::default(),
        }
    }

    /// Selects both sides of the trade. Selecting the same asset twice is allowed.
    pub fn select_pair(&mut self, from: AssetId, to: AssetId) {
        self.selection.from = Some(from);
        self.selection.to = Some(to);
    }

    pub fn set_from_asset(&mut self, from: AssetId) {
        self.selection.from = Some(from);
    }

    pub fn set_to_asset(&mut self, to: AssetId) {
        self.selection.to = Some(to);
    }

    /// Sets the number of source units to sell.
    pub fn set_amount(&mut self, amount: Decimal) {
        self.selection.amount = amount;
    }

    /// Gets the current selection.
    pub fn selection(&self) -> &TradeSelection {
        &self.selection
    }

    /// Gets the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Prices the selected pair.
    ///
    /// Returns `None` if either side is unselected or unknown, or if either
    /// side is zero-priced.
    pub fn quote(&self) -> Option<AssetPair> {
        self.try_quote().ok()
    }

    /// Prices the selected pair, reporting why no quote exists.
    ///
    /// # Errors
    /// `PairUnresolved` if a side is missing, `DegenerateRate` if a side has
    /// no price.
    pub fn try_quote(&self) -> Result<AssetPair, TradeError> {
        let (from_id, to_id) = self.selection.pair().ok_or(TradeError::PairUnresolved)?;
        let from = self
            .balances
            .find_by_id(from_id)
            .ok_or(TradeError::PairUnresolved)?;
        let to = self
            .balances
            .find_by_id(to_id)
            .ok_or(TradeError::PairUnresolved)?;

        let pair = AssetPair::new(from, to).ok_or(TradeError::DegenerateRate)?;
        debug!(
            from = %pair.from_asset.symbol,
            to = %pair.to_asset.symbol,
            rate = %pair.rate,
            "Pair quoted"
        );
        Ok(pair)
    }

    /// Destination units the current amount would buy.
    ///
    /// Zero without a quote, or when the amount is too large to price.
    pub fn estimated_output(&self) -> Decimal {
        self.quote()
            .and_then(|pair| pair.output_for(self.selection.amount))
            .unwrap_or(Decimal::ZERO)
    }

    /// Full preview of the selected trade, `None` without a quote or when the
    /// amount is too large to price.
    pub fn preview(&self) -> Option<TradePreview> {
        let pair = self.quote()?;
        let to_amount = pair.output_for(self.selection.amount)?;
        let min_received = to_amount.checked_mul(Decimal::ONE - self.config.slippage_fraction())?;

        Some(TradePreview {
            from_amount: self.selection.amount,
            to_amount,
            rate: pair.rate,
            price_impact: Decimal::ZERO,
            fee: self.config.network_fee,
            min_received,
        })
    }

    /// Executes the selected trade.
    ///
    /// Debits the source asset, credits the destination asset with the same
    /// value at spot prices and appends a `SWAP` record, as a single step.
    /// On failure nothing changes.
    ///
    /// # Errors
    /// Returns the reason the trade was refused.
    pub fn execute(&self) -> Result<Transaction, TradeError> {
        let amount = self.selection.amount;

        let result = self.ledger.record(|| {
            let pair = self.try_quote()?;
            if amount <= Decimal::ZERO {
                return Err(TradeError::NonPositiveAmount);
            }
            if pair.from_asset.balance < amount {
                return Err(TradeError::InsufficientBalance {
                    available: pair.from_asset.balance,
                    required: amount,
                });
            }

            let output = pair
                .output_for(amount)
                .ok_or(TradeError::AmountOutOfRange)?;
            self.balances.apply(&[
                BalanceChange::debit(pair.from_asset.id.clone(), amount),
                BalanceChange::credit(pair.to_asset.id.clone(), output),
            ])?;

            Ok(TransactionInput::completed(
                TransactionType::Swap,
                pair.from_asset.symbol,
                pair.to_asset.symbol,
                amount,
                output,
            )
            .with_hash(settlement_hash())
            .with_fee(self.config.network_fee))
        });

        match &result {
            Ok(tx) => info!(
                id = %tx.id,
                from = %tx.from_asset,
                to = %tx.to_asset,
                amount_in = %tx.from_amount,
                amount_out = %tx.to_amount,
                "Trade executed"
            ),
            Err(err) => warn!(error = %err, amount = %amount, "Trade refused"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_data::AssetRegistry;
    use dex_domain::entities::Asset;
    use dex_domain::enums::AssetType;
    use dex_domain::error::BalanceError;
    use dex_domain::value_objects::TransactionFilter;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn registry() -> AssetRegistry {
        let registry = AssetRegistry::new();
        for asset in [
            Asset::new("1", "BTC", "Bitcoin", dec!(1.2), dec!(65000), AssetType::Sat20),
            Asset::new("2", "ORDI", "Ordinals", dec!(1000), dec!(50), AssetType::Brc20),
            Asset::new("4", "USDT", "Tether", dec!(10000), dec!(1), AssetType::Other),
            Asset::new("5", "DUST", "Dust", dec!(10), dec!(0), AssetType::Rune),
        ] {
            registry.register(asset).unwrap();
        }
        registry
    }

    fn engine(registry: &AssetRegistry, ledger: &Ledger) -> TradeEngine {
        TradeEngine::new(
            Arc::new(registry.clone()),
            ledger.clone(),
            EngineConfig::default(),
        )
    }

    fn balance(registry: &AssetRegistry, id: &str) -> Decimal {
        registry.find_by_id(&AssetId::new(id)).unwrap().balance
    }

    #[test]
    fn test_btc_to_usdt_round_trip() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("1"), AssetId::new("4"));
        engine.set_amount(dec!(0.5));
        assert_eq!(engine.estimated_output(), dec!(32500));

        let tx = engine.execute().unwrap();
        assert_eq!(balance(&registry, "1"), dec!(0.7));
        assert_eq!(balance(&registry, "4"), dec!(42500));

        assert_eq!(tx.tx_type, TransactionType::Swap);
        assert_eq!(tx.from_asset, "BTC");
        assert_eq!(tx.to_amount, dec!(32500));
        assert!(tx.hash.starts_with("0x"));
        assert_eq!(ledger.transactions(), vec![tx]);
    }

    #[test]
    fn test_insufficient_balance_leaves_state_unchanged() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("1"), AssetId::new("4"));
        engine.set_amount(dec!(5));

        assert_eq!(
            engine.execute(),
            Err(TradeError::InsufficientBalance {
                available: dec!(1.2),
                required: dec!(5),
            })
        );
        assert_eq!(balance(&registry, "1"), dec!(1.2));
        assert_eq!(balance(&registry, "4"), dec!(10000));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_exact_balance_drains_to_zero() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("1"), AssetId::new("4"));
        engine.set_amount(dec!(1.2));
        engine.execute().unwrap();
        assert_eq!(balance(&registry, "1"), Decimal::ZERO);

        // Anything more than the (now empty) balance is refused.
        engine.set_amount(dec!(0.0001));
        assert!(engine.execute().is_err());
        assert_eq!(balance(&registry, "1"), Decimal::ZERO);
    }

    #[test]
    fn test_non_positive_amount() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("1"), AssetId::new("4"));
        for amount in [Decimal::ZERO, dec!(-1)] {
            engine.set_amount(amount);
            assert_eq!(engine.execute(), Err(TradeError::NonPositiveAmount));
        }
        assert_eq!(balance(&registry, "4"), dec!(10000));
    }

    #[test]
    fn test_unresolved_pair() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);
        engine.set_amount(dec!(1));

        assert!(engine.quote().is_none());
        assert_eq!(engine.estimated_output(), Decimal::ZERO);
        assert_eq!(engine.execute(), Err(TradeError::PairUnresolved));

        engine.select_pair(AssetId::new("1"), AssetId::new("99"));
        assert!(engine.quote().is_none());
        assert_eq!(engine.execute(), Err(TradeError::PairUnresolved));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_rates_are_reciprocal() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("2"), AssetId::new("1"));
        assert_eq!(engine.quote().unwrap().rate, dec!(1300));

        engine.select_pair(AssetId::new("1"), AssetId::new("2"));
        let rate = engine.quote().unwrap().rate;
        assert!((rate - dec!(0.000769)).abs() < dec!(0.000001));
        assert!((rate * dec!(1300) - Decimal::ONE).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_quote_reflects_live_balances() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("1"), AssetId::new("4"));
        registry.update_balance(&AssetId::new("1"), dec!(3));
        assert_eq!(engine.quote().unwrap().from_asset.balance, dec!(3));
    }

    #[test]
    fn test_zero_priced_side_is_refused() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("5"), AssetId::new("4"));
        engine.set_amount(dec!(1));

        assert!(engine.quote().is_none());
        assert_eq!(engine.try_quote(), Err(TradeError::DegenerateRate));
        assert_eq!(engine.execute(), Err(TradeError::DegenerateRate));
        assert_eq!(balance(&registry, "5"), dec!(10));

        engine.select_pair(AssetId::new("4"), AssetId::new("5"));
        assert_eq!(engine.estimated_output(), Decimal::ZERO);
        assert_eq!(engine.execute(), Err(TradeError::DegenerateRate));
        assert_eq!(balance(&registry, "4"), dec!(10000));
    }

    #[test]
    fn test_preview() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        assert!(engine.preview().is_none());

        engine.select_pair(AssetId::new("1"), AssetId::new("4"));
        engine.set_amount(dec!(0.5));
        let preview = engine.preview().unwrap();
        assert_eq!(preview.to_amount, dec!(32500));
        assert_eq!(preview.price_impact, Decimal::ZERO);
        assert_eq!(preview.fee, dec!(0.001));
        assert_eq!(preview.min_received, dec!(32337.5));
    }

    #[test]
    fn test_each_trade_is_recorded() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("4"), AssetId::new("2"));
        engine.set_amount(dec!(100));
        let first = engine.execute().unwrap();
        let second = engine.execute().unwrap();

        assert!(second.id > first.id);
        let swaps = ledger.filter(&TransactionFilter::new().with_asset("ORDI"));
        assert_eq!(swaps.len(), 2);
        assert_eq!(balance(&registry, "2"), dec!(1004));
    }

    /// Balance source that serves fixed assets and refuses every change.
    struct RejectingBalances {
        assets: Vec<Asset>,
        applied: Mutex<usize>,
    }

    impl BalanceSource for RejectingBalances {
        fn find_by_id(&self, id: &AssetId) -> Option<Asset> {
            self.assets.iter().find(|a| &a.id == id).cloned()
        }

        fn find_by_symbol(&self, symbol: &str) -> Option<Asset> {
            self.assets.iter().find(|a| a.symbol == symbol).cloned()
        }

        fn update_balance(&self, _id: &AssetId, _new_balance: Decimal) {}

        fn apply(&self, changes: &[BalanceChange]) -> Result<(), BalanceError> {
            *self.applied.lock().unwrap() += 1;
            Err(BalanceError::AssetNotFound(changes[0].asset_id.clone()))
        }
    }

    #[test]
    fn test_store_rejection_is_not_recorded() {
        let balances = Arc::new(RejectingBalances {
            assets: registry().assets(),
            applied: Mutex::new(0),
        });
        let ledger = Ledger::new();
        let mut engine = TradeEngine::new(balances.clone(), ledger.clone(), EngineConfig::default());

        engine.select_pair(AssetId::new("1"), AssetId::new("4"));
        engine.set_amount(dec!(0.5));

        assert_eq!(engine.execute(), Err(TradeError::PairUnresolved));
        assert_eq!(*balances.applied.lock().unwrap(), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_oversized_amount_is_refused() {
        let registry = registry();
        let ledger = Ledger::new();
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("1"), AssetId::new("4"));
        engine.set_amount(Decimal::MAX);
        assert_eq!(engine.estimated_output(), Decimal::ZERO);
        assert!(engine.quote().is_some());
        assert!(engine.preview().is_none());

        // Enough balance to pass the balance check, so pricing is what fails.
        registry.update_balance(&AssetId::new("1"), Decimal::MAX);
        assert_eq!(engine.execute(), Err(TradeError::AmountOutOfRange));
        assert_eq!(balance(&registry, "1"), Decimal::MAX);
        assert_eq!(balance(&registry, "4"), dec!(10000));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_credit_overflow_is_refused() {
        let registry = registry();
        let ledger = Ledger::new();
        registry.update_balance(&AssetId::new("4"), Decimal::MAX);
        let mut engine = engine(&registry, &ledger);

        engine.select_pair(AssetId::new("1"), AssetId::new("4"));
        engine.set_amount(dec!(1));
        assert_eq!(engine.execute(), Err(TradeError::AmountOutOfRange));
        assert_eq!(balance(&registry, "1"), dec!(1.2));
        assert_eq!(balance(&registry, "4"), Decimal::MAX);
        assert!(ledger.is_empty());

        // The ledger lock is still usable after the refusal.
        engine.select_pair(AssetId::new("4"), AssetId::new("2"));
        engine.set_amount(dec!(100));
        assert!(engine.execute().is_ok());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_concurrent_full_balance_trades_settle_once() {
        let store = dex_data::Store::from_seed(dex_data::Seed::demo()).unwrap();
        let history = store.ledger().len();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut engine = TradeEngine::new(
                        Arc::new(store.assets().clone()),
                        store.ledger().clone(),
                        EngineConfig::default(),
                    );
                    engine.select_pair(AssetId::new("1"), AssetId::new("4"));
                    engine.set_amount(dec!(1.2));
                    engine.execute()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(successes, 1);
        assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
            r,
            Err(TradeError::InsufficientBalance { .. })
        )));
        assert!(store.assets().assets().iter().all(|a| a.balance >= Decimal::ZERO));
        assert_eq!(balance(store.assets(), "1"), Decimal::ZERO);
        assert_eq!(balance(store.assets(), "4"), dec!(88000));
        assert_eq!(store.ledger().len(), history + successes);
    }
}
