use crate::types::errors::MonetaryError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::Neg;
use std::str::FromStr;

const DECIMAL_PLACES: u32 = 2;

/// A monetary value held at a fixed scale of two decimal places.
///
/// Every constructor rounds with banker's rounding (half-even), so a `Money`
/// never carries more precision than a ledger entry can record.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Money(value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven))
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Multiplies by a rate and rounds the product back to scale 2.
    pub fn apply_rate(self, rate: Decimal) -> Option<Money> {
        self.0.checked_mul(rate).map(Money::new)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Display for Money {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        value.rescale(DECIMAL_PLACES);
        write!(formatter, "{value}")
    }
}

impl FromStr for Money {
    type Err = MonetaryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(MonetaryError::InvalidFormat("Value is an empty string".to_string()));
        }

        let decimal = Decimal::from_str(value).map_err(|source| MonetaryError::Parse {
            value: value.to_string(),
            source
        })?;

        Ok(Money::new(decimal))
    }
}
