use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::errors::LedgerError;
use crate::types::Money;

const MAXIMUM_RATE_RETURN: Decimal = dec!(0.10);

/// Savings-specific policy: no overdraft, no fee, and a yield that becomes
/// payable once per cycle on the anniversary day of the month.
#[derive(Debug, Clone)]
pub struct SavingsAccount {
    rate_return: Decimal,
    anniversary_date: NaiveDate,
    last_income: NaiveDate
}

impl SavingsAccount {
    /// Opens the savings policy on `opened_on`, which becomes both the anniversary
    /// and the first `last_income` date so no yield is due on the opening day.
    ///
    /// # Errors
    /// Returns `LedgerError::Validation` when `rate_return` is outside `[0, 0.10]`.
    pub fn new(rate_return: Decimal, opened_on: NaiveDate) -> Result<Self, LedgerError> {
        if rate_return < Decimal::ZERO || rate_return > MAXIMUM_RATE_RETURN {
            return Err(LedgerError::validation("rate return", format!("[{rate_return}] must be between 0% and 10%")))
        }

        Ok(Self {
            rate_return,
            anniversary_date: opened_on,
            last_income: opened_on
        })
    }

    pub fn rate_return(&self) -> Decimal {
        self.rate_return
    }

    pub fn anniversary_date(&self) -> NaiveDate {
        self.anniversary_date
    }

    pub fn last_income(&self) -> NaiveDate {
        self.last_income
    }

    pub fn floor(&self) -> Money {
        Money::ZERO
    }

    pub fn monthly_fee(&self) -> Money {
        Money::ZERO
    }

    /// The anniversary day in `today`'s month, clamped to that month's length;
    /// if it is already behind `today`, the same day one month later.
    pub fn next_anniversary(&self, today: NaiveDate) -> NaiveDate {
        let candidate = anniversary_in_month(self.anniversary_date.day(), today);

        if candidate >= today {
            return candidate
        }

        today
            .with_day(1)
            .and_then(|first| first.checked_add_months(Months::new(1)))
            .map_or(candidate, |next_month| anniversary_in_month(self.anniversary_date.day(), next_month))
    }

    /// True on or after the next anniversary unless income was already
    /// recorded on or after the day before it.
    pub fn can_apply_yield(&self, today: NaiveDate) -> bool {
        let next_anniversary = self.next_anniversary(today);
        let cycle_start = next_anniversary.pred_opt().unwrap_or(next_anniversary);

        today >= next_anniversary && self.last_income < cycle_start
    }

    pub fn days_until_next_yield(&self, today: NaiveDate) -> i64 {
        (self.next_anniversary(today) - today).num_days()
    }

    pub fn estimated_yield(&self, balance: Money) -> Option<Money> {
        balance.apply_rate(self.rate_return)
    }

    pub(crate) fn record_income(&mut self, today: NaiveDate) {
        self.last_income = today;
    }
}

fn anniversary_in_month(anniversary_day: u32, in_month: NaiveDate) -> NaiveDate {
    let day = anniversary_day.min(days_in_month(in_month));

    in_month.with_day(day).unwrap_or(in_month)
}

fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);

    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(28, |last| last.day())
}
