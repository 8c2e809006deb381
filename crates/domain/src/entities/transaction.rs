use crate::enums::{TransactionStatus, TransactionType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger-assigned transaction identifier. Strictly increasing within a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded operation. Immutable once appended to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    /// Symbol of the asset given up.
    pub from_asset: String,
    /// Symbol of the asset received.
    pub to_asset: String,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub hash: String,
    pub fee: Decimal,
}

impl Transaction {
    /// Returns true if `symbol` is on either side of the transaction.
    pub fn involves(&self, symbol: &str) -> bool {
        self.from_asset == symbol || self.to_asset == symbol
    }
}

/// Everything a transaction carries except its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub from_asset: String,
    pub to_asset: String,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub hash: String,
    pub fee: Decimal,
}

impl TransactionInput {
    /// A completed operation stamped with the current time.
    pub fn completed(
        tx_type: TransactionType,
        from_asset: impl Into<String>,
        to_asset: impl Into<String>,
        from_amount: Decimal,
        to_amount: Decimal,
    ) -> Self {
        Self {
            tx_type,
            from_asset: from_asset.into(),
            to_asset: to_asset.into(),
            from_amount,
            to_amount,
            timestamp: Utc::now(),
            status: TransactionStatus::Completed,
            hash: String::new(),
            fee: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    #[must_use]
    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = fee;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attaches the ledger-assigned id.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            tx_type: self.tx_type,
            from_asset: self.from_asset,
            to_asset: self.to_asset,
            from_amount: self.from_amount,
            to_amount: self.to_amount,
            timestamp: self.timestamp,
            status: self.status,
            hash: self.hash,
            fee: self.fee,
        }
    }
}
