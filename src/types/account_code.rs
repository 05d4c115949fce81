use std::fmt;
use std::fmt::{Display, Formatter};

/// External lookup key of an account: `<branch>-<number>`.
///
/// Ordering is lexicographic on the full key, which gives every pair of accounts
/// a fixed lock order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountCode(String);

impl AccountCode {
    pub fn new(branch_code: &str, number: &str) -> Self {
        Self(format!("{branch_code}-{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccountCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for AccountCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
