//! Append-only transaction ledger.

use dex_domain::entities::{Transaction, TransactionId, TransactionInput};
use dex_domain::value_objects::TransactionFilter;
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug)]
struct LedgerState {
    /// Most recent first.
    entries: VecDeque<Transaction>,
    /// Next id to assign. Only ever increases.
    next_id: u64,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 1,
        }
    }
}

impl LedgerState {
    fn push(&mut self, input: TransactionInput) -> Transaction {
        let id = TransactionId(self.next_id);
        self.next_id += 1;
        let tx = input.into_transaction(id);
        self.entries.push_front(tx.clone());
        tx
    }
}

/// Record of executed operations, newest first.
#[derive(Clone, Default)]
pub struct Ledger {
    state: Arc<RwLock<LedgerState>>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger pre-populated with `history`.
    ///
    /// Entries are appended oldest first, so ids follow timestamp order.
    #[must_use]
    pub fn with_history(mut history: Vec<TransactionInput>) -> Self {
        history.sort_by_key(|input| input.timestamp);
        let ledger = Self::new();
        for input in history {
            ledger.append(input);
        }
        ledger
    }

    /// Assigns the next id and records `input` as the newest entry.
    pub fn append(&self, input: TransactionInput) -> Transaction {
        let tx = self.write().push(input);
        debug!(id = %tx.id, tx_type = %tx.tx_type, "Transaction appended");
        tx
    }

    /// Runs `operation` while holding the ledger's write lock and appends
    /// the record it produces.
    ///
    /// Readers of the ledger cannot observe the period between the
    /// operation's side effects and the append. Nothing is appended if the
    /// operation fails.
    ///
    /// # Errors
    /// Returns the operation's error unchanged.
    pub fn record<F, E>(&self, operation: F) -> Result<Transaction, E>
    where
        F: FnOnce() -> Result<TransactionInput, E>,
    {
        let mut state = self.write();
        let input = operation()?;
        let tx = state.push(input);
        debug!(id = %tx.id, tx_type = %tx.tx_type, "Transaction recorded");
        Ok(tx)
    }

    /// Entries matching `filter`, newest first.
    pub fn filter(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.read()
            .entries
            .iter()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect()
    }

    /// All entries, newest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.read().entries.iter().cloned().collect()
    }

    /// Finds an entry by id.
    pub fn find(&self, id: TransactionId) -> Option<Transaction> {
        self.read().entries.iter().find(|tx| tx.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
