use crate::entities::transaction::Transaction;
use crate::enums::TransactionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ledger query. Unset criteria match everything; set criteria are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(rename = "type")]
    pub tx_type: Option<TransactionType>,
    /// Symbol matched against either side of the transaction.
    pub asset: Option<String>,
    /// Inclusive lower bound.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub end_date: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, tx_type: TransactionType) -> Self {
        self.tx_type = Some(tx_type);
        self
    }

    #[must_use]
    pub fn with_asset(mut self, symbol: impl Into<String>) -> Self {
        self.asset = Some(symbol.into());
        self
    }

    #[must_use]
    pub fn between(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(tx_type) = self.tx_type
            && tx.tx_type != tx_type
        {
            return false;
        }
        if let Some(asset) = &self.asset
            && !tx.involves(asset)
        {
            return false;
        }
        if let Some(start) = self.start_date
            && tx.timestamp < start
        {
            return false;
        }
        if let Some(end) = self.end_date
            && tx.timestamp > end
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::transaction::{TransactionId, TransactionInput};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn tx_at(timestamp: DateTime<Utc>) -> Transaction {
        TransactionInput::completed(TransactionType::Swap, "BTC", "USDT", dec!(1), dec!(2))
            .with_timestamp(timestamp)
            .into_transaction(TransactionId(1))
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(TransactionFilter::new().matches(&tx_at(Utc::now())));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let t = Utc::now();
        let tx = tx_at(t);

        assert!(TransactionFilter::new().between(Some(t), Some(t)).matches(&tx));
        assert!(
            !TransactionFilter::new()
                .between(Some(t + Duration::seconds(1)), None)
                .matches(&tx)
        );
        assert!(
            !TransactionFilter::new()
                .between(None, Some(t - Duration::seconds(1)))
                .matches(&tx)
        );
    }

    #[test]
    fn test_criteria_are_anded() {
        let tx = tx_at(Utc::now());
        let filter = TransactionFilter::new()
            .with_type(TransactionType::Swap)
            .with_asset("ETH");
        assert!(!filter.matches(&tx));

        let filter = TransactionFilter::new()
            .with_type(TransactionType::Swap)
            .with_asset("BTC");
        assert!(filter.matches(&tx));
    }
}
