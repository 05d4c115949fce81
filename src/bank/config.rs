use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::Money;

/// Numeric policy applied to accounts the bank opens.
#[derive(Debug, Clone)]
pub struct BankConfig {
    pub default_overdraft_limit: Money,
    pub monthly_fee: Money,
    pub fee_waiver_threshold: Money,
    pub default_rate_return: Decimal,
    pub account_number_attempts: usize
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            default_overdraft_limit: Money::new(dec!(500.00)),
            monthly_fee: Money::new(dec!(12.00)),
            fee_waiver_threshold: Money::new(dec!(1000.00)),
            default_rate_return: dec!(0.005),
            account_number_attempts: 16
        }
    }
}

impl BankConfig {
    pub fn with_default_overdraft_limit(mut self, limit: Money) -> Self {
        self.default_overdraft_limit = limit;
        self
    }

    pub fn with_monthly_fee(mut self, fee: Money, waiver_threshold: Money) -> Self {
        self.monthly_fee = fee;
        self.fee_waiver_threshold = waiver_threshold;
        self
    }

    pub fn with_default_rate_return(mut self, rate: Decimal) -> Self {
        self.default_rate_return = rate;
        self
    }

    pub fn with_account_number_attempts(mut self, attempts: usize) -> Self {
        self.account_number_attempts = attempts.max(1);
        self
    }
}
