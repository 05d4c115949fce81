use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

const ACCOUNT_NUMBER_BOUND: u32 = 100_000_000;
const AUTHENTICATION_SUFFIX_MIN: u32 = 100_000;
const AUTHENTICATION_SUFFIX_BOUND: u32 = 1_000_000;

/// Source of the random values stamped onto accounts and transactions.
pub trait Entropy: Send + Sync {
    /// A value in `[0, 100_000_000)`.
    fn account_number(&self) -> u32;
    /// A value in `[100_000, 1_000_000)`.
    fn authentication_suffix(&self) -> u32;
    /// A random (v4) identifier for transactions and users.
    fn identifier(&self) -> Uuid;
}

/// Thread-local CSPRNG; each thread draws from its own generator, so concurrent
/// callers never contend or share state.
pub struct ThreadEntropy;

impl Entropy for ThreadEntropy {
    fn account_number(&self) -> u32 {
        rand::rng().random_range(0..ACCOUNT_NUMBER_BOUND)
    }

    fn authentication_suffix(&self) -> u32 {
        rand::rng().random_range(AUTHENTICATION_SUFFIX_MIN..AUTHENTICATION_SUFFIX_BOUND)
    }

    fn identifier(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Reproducible entropy for tests and replays.
pub struct SeededEntropy {
    rng: Mutex<StdRng>
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed))
        }
    }
}

impl Entropy for SeededEntropy {
    fn account_number(&self) -> u32 {
        self.rng.lock().random_range(0..ACCOUNT_NUMBER_BOUND)
    }

    fn authentication_suffix(&self) -> u32 {
        self.rng.lock().random_range(AUTHENTICATION_SUFFIX_MIN..AUTHENTICATION_SUFFIX_BOUND)
    }

    fn identifier(&self) -> Uuid {
        let bytes: [u8; 16] = self.rng.lock().random();
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}
