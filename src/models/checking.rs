use crate::models::errors::LedgerError;
use crate::types::Money;

/// Checking-specific policy: an overdraft floor and a monthly fee that is
/// waived once the balance reaches a threshold.
#[derive(Debug, Clone)]
pub struct CheckingAccount {
    overdraft_limit: Money,
    monthly_fee: Money,
    fee_waiver_threshold: Money
}

impl CheckingAccount {
    /// # Errors
    /// Returns `LedgerError::Validation` for a negative overdraft limit.
    pub fn new(overdraft_limit: Money, monthly_fee: Money, fee_waiver_threshold: Money) -> Result<Self, LedgerError> {
        validate_overdraft_limit(overdraft_limit)?;

        Ok(Self {
            overdraft_limit,
            monthly_fee,
            fee_waiver_threshold
        })
    }

    pub fn overdraft_limit(&self) -> Money {
        self.overdraft_limit
    }

    /// Prefer [`Account::set_overdraft_limit`](crate::models::Account::set_overdraft_limit), which also checks the balance.
    pub(crate) fn set_overdraft_limit(&mut self, overdraft_limit: Money) -> Result<(), LedgerError> {
        validate_overdraft_limit(overdraft_limit)?;
        self.overdraft_limit = overdraft_limit;

        Ok(())
    }

    /// Lowest balance a withdrawal or transfer may leave behind.
    pub fn floor(&self) -> Money {
        -self.overdraft_limit
    }

    pub fn monthly_fee(&self, balance: Money) -> Money {
        if balance >= self.fee_waiver_threshold {
            return Money::ZERO
        }

        self.monthly_fee
    }

    pub fn total_available_balance(&self, balance: Money) -> Option<Money> {
        balance.checked_add(self.overdraft_limit)
    }
}

fn validate_overdraft_limit(overdraft_limit: Money) -> Result<(), LedgerError> {
    if overdraft_limit.is_negative() {
        return Err(LedgerError::validation("overdraft limit", format!("[{overdraft_limit}] must not be negative")))
    }

    Ok(())
}
