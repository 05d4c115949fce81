use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;

use crate::context::LedgerContext;
use crate::models::errors::LedgerError;
use crate::models::{Direction, TransactionStatus, TransactionType};
use crate::types::{AccountCode, Money, TransactionId};

/// The caller-supplied half of a ledger entry; identity, timestamps and the
/// resulting balance are filled in by [`Transaction::record`].
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub previous_balance: Money,
    pub origin: Option<AccountCode>,
    pub destination: Option<AccountCode>,
    pub description: String
}

/// A single, immutable ledger entry.
///
/// Apart from `status`, nothing changes after [`Transaction::record`] returns.
/// Origin and destination are weak references by account key; the transaction
/// owns neither account.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TransactionId,
    transaction_type: TransactionType,
    /// Unsigned amount; the type's direction decides the sign.
    amount: Money,
    /// Balance of the owning account before this entry.
    previous_balance: Money,
    /// `previous_balance` moved by `amount` in the type's direction.
    balance_after: Money,
    /// Debited account, if any.
    origin: Option<AccountCode>,
    /// Credited account, if any.
    destination: Option<AccountCode>,
    description: String,
    /// The only field that changes after recording.
    status: TransactionStatus,
    /// `YYYYMMDD-NNNNNN`, dated by `date_time`.
    authentication_code: String,
    date_time: NaiveDateTime
}

impl Transaction {
    /// Stamps an entry with a fresh id, timestamp and authentication code and
    /// derives its `balance_after`. The transaction starts out pending.
    ///
    /// # Errors
    /// Returns `LedgerError::Overflow` if the resulting balance is not representable.
    pub fn record(entry: LedgerEntry, context: &LedgerContext) -> Result<Self, LedgerError> {
        let amount = Money::new(entry.amount.amount());
        let previous_balance = Money::new(entry.previous_balance.amount());

        let balance_after = match entry.transaction_type.direction() {
            Direction::Credit => previous_balance.checked_add(amount),
            Direction::Debit => previous_balance.checked_sub(amount),
            Direction::Neutral => Some(previous_balance)
        };

        let balance_after = balance_after.ok_or_else(|| {
            let owner = entry.destination.as_ref().or(entry.origin.as_ref());
            LedgerError::Overflow {
                account_code: owner.cloned().unwrap_or_else(|| AccountCode::from("unknown"))
            }
        })?;

        let date_time = context.now();

        Ok(Self {
            id: context.transaction_id(),
            transaction_type: entry.transaction_type,
            amount,
            previous_balance,
            balance_after,
            origin: entry.origin,
            destination: entry.destination,
            description: entry.description,
            status: TransactionStatus::Pending,
            authentication_code: context.authentication_code(date_time),
            date_time
        })
    }

    pub fn confirm(&mut self) -> Result<(), LedgerError> {
        self.transition(TransactionStatus::Confirmed)
    }

    pub fn cancel(&mut self) -> Result<(), LedgerError> {
        self.transition(TransactionStatus::Cancelled)
    }

    fn transition(&mut self, to: TransactionStatus) -> Result<(), LedgerError> {
        if self.status != TransactionStatus::Pending {
            return Err(LedgerError::InvalidTransition {
                transaction_id: self.id,
                from: self.status,
                to
            })
        }

        self.status = to;

        Ok(())
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    /// The amount as it affected the owning account's balance.
    pub fn signed_amount(&self) -> Money {
        match self.transaction_type.direction() {
            Direction::Credit => self.amount,
            Direction::Debit => -self.amount,
            Direction::Neutral => Money::ZERO
        }
    }

    pub fn previous_balance(&self) -> Money {
        self.previous_balance
    }

    pub fn balance_after(&self) -> Money {
        self.balance_after
    }

    pub fn origin(&self) -> Option<&AccountCode> {
        self.origin.as_ref()
    }

    pub fn destination(&self) -> Option<&AccountCode> {
        self.destination.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn authentication_code(&self) -> &str {
        &self.authentication_code
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.date_time
    }

    /// Multi-line receipt listing every field.
    pub fn detailed(&self) -> String {
        let code_or_na = |code: Option<&AccountCode>| code.map_or_else(|| "N/A".to_string(), AccountCode::to_string);

        format!(
            "Transaction Details:\n\
             ID: {}\n\
             Type: {}\n\
             Amount: $ {}\n\
             Previous Balance: $ {}\n\
             Balance After: $ {}\n\
             Date: {}\n\
             Origin: {}\n\
             Destination: {}\n\
             Status: {}\n\
             Auth Code: {}\n\
             Description: {}\n",
            self.id,
            self.transaction_type.label(),
            self.amount,
            self.previous_balance,
            self.balance_after,
            self.date_time.format("%d/%m/%Y %H:%M:%S"),
            code_or_na(self.origin.as_ref()),
            code_or_na(self.destination.as_ref()),
            self.status.label(),
            self.authentication_code,
            self.description
        )
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.authentication_code == other.authentication_code
    }
}

impl Eq for Transaction {}

impl Display for Transaction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let id = self.id.simple().to_string();

        write!(
            formatter,
            "Transaction[ID: {} | {} | Amount: $ {} | Date: {} | Status: {}]",
            &id[..8],
            self.transaction_type.label(),
            self.amount,
            self.date_time.format("%d/%m/%Y %H:%M"),
            self.status.label()
        )
    }
}
