use crate::models::errors::LedgerError;
use crate::models::Account;
use crate::types::{AccountCode, Money};

/// Deposit, withdraw and transfer amounts must be strictly positive.
pub fn validate_amount(amount: Money) -> Result<(), LedgerError> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidAmount { amount })
    }

    Ok(())
}

pub fn validate_active(account: &Account) -> Result<(), LedgerError> {
    if !account.is_active() {
        return Err(LedgerError::account_inactive(account))
    }

    Ok(())
}

/// Fails when taking `amount` out of `balance` would leave it below `floor`.
pub fn validate_sufficient_funds(account_code: &AccountCode, balance: Money, amount: Money, floor: Money) -> Result<(), LedgerError> {
    match balance.checked_sub(amount) {
        Some(remaining) if remaining >= floor => Ok(()),
        _ => Err(LedgerError::InsufficientFunds {
            account_code: account_code.clone(),
            balance,
            amount,
            floor
        })
    }
}
