mod clock;
mod entropy;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::{TransactionId, UserId};

pub use clock::{Clock, FixedClock, SystemClock};
pub use entropy::{Entropy, SeededEntropy, ThreadEntropy};

/// The time and randomness sources every ledger operation draws from.
///
/// Cloning is cheap; all clones share the same clock and entropy source.
#[derive(Clone)]
pub struct LedgerContext {
    clock: Arc<dyn Clock>,
    entropy: Arc<dyn Entropy>
}

impl LedgerContext {
    pub fn new(clock: Arc<dyn Clock>, entropy: Arc<dyn Entropy>) -> Self {
        Self { clock, entropy }
    }

    /// Wall clock and the thread-local CSPRNG.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(ThreadEntropy))
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }

    /// An eight digit, zero padded account number.
    pub fn account_number(&self) -> String {
        format!("{:08}", self.entropy.account_number())
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.entropy.identifier()
    }

    pub fn user_id(&self) -> UserId {
        self.entropy.identifier()
    }

    /// Receipt code in the form `YYYYMMDD-NNNNNN`, dated by `at`.
    pub fn authentication_code(&self, at: NaiveDateTime) -> String {
        format!("{}-{:06}", at.format("%Y%m%d"), self.entropy.authentication_suffix())
    }
}
