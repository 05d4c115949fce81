use crate::models::Account;
use crate::storage::SharedAccount;
use crate::types::{AccountCode, UserId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// In-memory account registry keyed by account code. Last write wins.
pub struct AccountStorage {
    accounts: DashMap<AccountCode, SharedAccount>
}

impl AccountStorage {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new()
        }
    }

    /// Stores the account under its own code and returns the shared handle.
    pub fn save(&self, account: Account) -> SharedAccount {
        let code = account.account_code().clone();
        let shared = Arc::new(Mutex::new(account));
        self.accounts.insert(code, shared.clone());
        shared
    }

    /// Stores the account only if its code is still free; `None` on a collision.
    pub fn insert_new(&self, account: Account) -> Option<SharedAccount> {
        match self.accounts.entry(account.account_code().clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                let shared = Arc::new(Mutex::new(account));
                vacant.insert(shared.clone());
                Some(shared)
            }
        }
    }

    pub fn find(&self, account_code: &AccountCode) -> Option<SharedAccount> {
        self.accounts.get(account_code).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, account_code: &AccountCode) -> bool {
        self.accounts.contains_key(account_code)
    }

    pub fn find_by_holder(&self, holder: UserId) -> Vec<SharedAccount> {
        self.accounts.iter()
            .filter(|entry| entry.value().lock().holder() == holder)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn remove(&self, account_code: &AccountCode) -> Option<SharedAccount> {
        self.accounts.remove(account_code).map(|(_, account)| account)
    }

    pub fn all(&self) -> Vec<SharedAccount> {
        self.accounts.iter().map(|entry| entry.value().clone()).collect()
    }
}

impl Default for AccountStorage {
    fn default() -> Self {
        Self::new()
    }
}
