mod account;
mod checking;
mod errors;
mod savings;
mod transaction;
mod user;
pub mod validation;

pub use account::{Account, AccountKind};
pub use checking::CheckingAccount;
pub use errors::LedgerError;
pub use savings::SavingsAccount;
pub use transaction::{LedgerEntry, Transaction};
pub use user::{Cpf, Email, User};

/// Every kind of balance-affecting event an account log can hold.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TransactionType {
    Deposit,
    Withdraw,
    TransferSent,
    TransferReceived,
    BillPayment,
    PixPayment,
    Ted,
    Doc,
    Reversal,
    Interest,
    Fee
}

/// How a transaction type moves the balance of the account that logs it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Credit,
    Debit,
    Neutral
}

impl TransactionType {
    pub fn direction(self) -> Direction {
        match self {
            TransactionType::Deposit | TransactionType::TransferReceived | TransactionType::Interest => Direction::Credit,
            TransactionType::Withdraw
            | TransactionType::TransferSent
            | TransactionType::BillPayment
            | TransactionType::PixPayment
            | TransactionType::Ted
            | TransactionType::Doc
            | TransactionType::Fee => Direction::Debit,
            TransactionType::Reversal => Direction::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdraw => "Withdraw",
            TransactionType::TransferSent => "Transfer Sent",
            TransactionType::TransferReceived => "Transfer Received",
            TransactionType::BillPayment => "Bill Payment",
            TransactionType::PixPayment => "Pix Payment",
            TransactionType::Ted => "Ted",
            TransactionType::Doc => "Doc",
            TransactionType::Reversal => "Reversal",
            TransactionType::Interest => "Interest",
            TransactionType::Fee => "Fee"
        }
    }
}

/// `Pending` is the only state a transaction can leave; both others are terminal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Cancelled
}

impl TransactionStatus {
    pub fn label(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Confirmed => "Confirmed",
            TransactionStatus::Cancelled => "Cancelled"
        }
    }
}
