mod account_storage;
#[cfg(test)]
mod tests;
mod transaction_storage;
mod user_storage;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::Account;

pub use account_storage::AccountStorage;
pub use transaction_storage::TransactionStorage;
pub use user_storage::UserStorage;

/// An account behind its own lock; the registry hands these out so callers
/// serialize every mutation of one account.
pub type SharedAccount = Arc<Mutex<Account>>;
