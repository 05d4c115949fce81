use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Account, TransactionStatus};
use crate::types::{AccountCode, Money, TransactionId, UserId};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Amount [{amount}] must be greater than zero")]
    InvalidAmount {
        amount: Money
    },
    #[error("Account [{account_code}] is not active")]
    AccountInactive {
        account_code: AccountCode
    },
    #[error("Insufficient funds in account [{account_code}]: balance [{balance}], requested [{amount}], floor [{floor}]")]
    InsufficientFunds {
        account_code: AccountCode,
        balance: Money,
        amount: Money,
        floor: Money
    },
    #[error("Invalid destination account [{}]", .account_code.as_ref().map_or("none", AccountCode::as_str))]
    InvalidDestination {
        account_code: Option<AccountCode>
    },
    #[error("Transaction [{transaction_id}] cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        transaction_id: TransactionId,
        from: TransactionStatus,
        to: TransactionStatus
    },
    #[error("Transaction [{transaction_id}] was not found in account [{account_code}]")]
    TransactionNotFound {
        account_code: AccountCode,
        transaction_id: TransactionId
    },
    #[error("Account [{account_code}] was not found")]
    AccountNotFound {
        account_code: AccountCode
    },
    #[error("User [{user_id}] was not found")]
    UserNotFound {
        user_id: UserId
    },
    #[error("The {field} [{value}] is already registered")]
    DuplicateIdentifier {
        field: &'static str,
        value: String
    },
    #[error("Invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String
    },
    #[error("Yield for account [{account_code}] is not due before {next_anniversary}")]
    YieldNotDue {
        account_code: AccountCode,
        next_anniversary: NaiveDate
    },
    #[error("Account [{account_code}] does not earn yield")]
    YieldUnsupported {
        account_code: AccountCode
    },
    #[error("Account [{account_code}] still holds a balance of [{balance}]")]
    OutstandingBalance {
        account_code: AccountCode,
        balance: Money
    },
    #[error("Numeric overflow occurred in account [{account_code}]")]
    Overflow {
        account_code: AccountCode
    }
}

impl LedgerError {
    //NOTE: Most variants are keyed by the account they concern; these keep call sites short.

    pub fn account_inactive(account: &Account) -> Self {
        Self::AccountInactive { account_code: account.account_code().clone() }
    }

    pub fn invalid_destination(account_code: Option<&AccountCode>) -> Self {
        Self::InvalidDestination { account_code: account_code.cloned() }
    }

    pub fn account_not_found(account_code: &AccountCode) -> Self {
        Self::AccountNotFound { account_code: account_code.clone() }
    }

    pub fn overflow(account_code: &AccountCode) -> Self {
        Self::Overflow { account_code: account_code.clone() }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation { field, reason: reason.into() }
    }
}
