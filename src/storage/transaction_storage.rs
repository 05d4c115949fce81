use crate::models::Transaction;
use crate::types::{AccountCode, TransactionId};
use dashmap::DashMap;

/// Audit copy of every recorded transaction, indexed by id and by the account
/// whose log holds it.
pub struct TransactionStorage {
    transactions: DashMap<TransactionId, Transaction>,
    by_account: DashMap<AccountCode, Vec<TransactionId>>
}

impl TransactionStorage {
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
            by_account: DashMap::new()
        }
    }

    /// Appends a transaction to `owner`'s index. Recording the same id twice is a no-op.
    pub fn record(&self, owner: &AccountCode, transaction: Transaction) {
        let id = transaction.id();

        if self.transactions.insert(id, transaction).is_none() {
            self.by_account.entry(owner.clone()).or_default().push(id);
        }
    }

    /// Overwrites the stored copy after a status change.
    pub fn replace(&self, transaction: Transaction) {
        if let Some(mut stored) = self.transactions.get_mut(&transaction.id()) {
            *stored = transaction;
        }
    }

    pub fn find(&self, transaction_id: TransactionId) -> Option<Transaction> {
        self.transactions.get(&transaction_id).map(|entry| entry.value().clone())
    }

    /// Transactions of one account in recording order.
    pub fn for_account(&self, account_code: &AccountCode) -> Vec<Transaction> {
        let Some(ids) = self.by_account.get(account_code).map(|entry| entry.value().clone()) else {
            return Vec::new()
        };

        ids.into_iter().filter_map(|id| self.find(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl Default for TransactionStorage {
    fn default() -> Self {
        Self::new()
    }
}
