use chrono::NaiveDateTime;

use crate::context::LedgerContext;
use crate::models::errors::LedgerError;
use crate::models::validation::{validate_active, validate_amount, validate_sufficient_funds};
use crate::models::{CheckingAccount, LedgerEntry, SavingsAccount, Transaction, TransactionType};
use crate::types::{AccountCode, Money, TransactionId, UserId};

/// The product an account was opened as, carrying that product's policy.
#[derive(Debug, Clone)]
pub enum AccountKind {
    Checking(CheckingAccount),
    Savings(SavingsAccount)
}

impl AccountKind {
    /// Lowest balance a debit may leave behind.
    pub fn floor(&self) -> Money {
        match self {
            AccountKind::Checking(checking) => checking.floor(),
            AccountKind::Savings(savings) => savings.floor()
        }
    }

    pub fn monthly_fee(&self, balance: Money) -> Money {
        match self {
            AccountKind::Checking(checking) => checking.monthly_fee(balance),
            AccountKind::Savings(savings) => savings.monthly_fee()
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Checking(_) => "checking",
            AccountKind::Savings(_) => "savings"
        }
    }
}

/// A bank account and its ledger.
///
/// Every successful balance-affecting operation appends exactly one
/// [`Transaction`] to this account's log, and every operation validates fully
/// before it mutates anything: on error the balance and the log are untouched.
#[derive(Debug, Clone)]
pub struct Account {
    /// Eight digit number drawn when the account is opened.
    number: String,
    branch_code: String,
    /// `branch-number`, the key the bank looks the account up by.
    account_code: AccountCode,
    /// Current balance at scale 2. Never below the kind's floor.
    balance: Money,
    /// Id of the owning user.
    holder: UserId,
    /// Inactive accounts reject every balance-affecting operation.
    active: bool,
    /// Append-only log in recording order.
    transactions: Vec<Transaction>,
    created_at: NaiveDateTime,
    /// Checking or savings policy.
    kind: AccountKind
}

impl Account {
    /// Opens an active, empty account with a freshly drawn number.
    pub fn open(branch_code: &str, holder: UserId, kind: AccountKind, context: &LedgerContext) -> Self {
        let number = context.account_number();

        Self {
            account_code: AccountCode::new(branch_code, &number),
            number,
            branch_code: branch_code.to_string(),
            balance: Money::ZERO,
            holder,
            active: true,
            transactions: Vec::new(),
            created_at: context.now(),
            kind
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn branch_code(&self) -> &str {
        &self.branch_code
    }

    pub fn account_code(&self) -> &AccountCode {
        &self.account_code
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn holder(&self) -> UserId {
        self.holder
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    /// The ledger in the order entries were recorded.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn disable(&mut self) {
        self.active = false;
    }

    pub fn enable(&mut self) {
        self.active = true;
    }

    /// # Errors
    /// Returns `LedgerError` if:
    /// - The account is inactive.
    /// - The amount is not strictly positive.
    /// - The new balance would overflow.
    pub fn deposit(&mut self, amount: Money, description: Option<&str>, context: &LedgerContext) -> Result<Transaction, LedgerError> {
        validate_active(self)?;
        validate_amount(amount)?;

        let balance = self.credited(amount)?;
        let transaction = Transaction::record(LedgerEntry {
            transaction_type: TransactionType::Deposit,
            amount,
            previous_balance: self.balance,
            origin: None,
            destination: Some(self.account_code.clone()),
            description: description_or(description, "Deposit performed")
        }, context)?;

        Ok(self.commit(balance, transaction))
    }

    /// Debits the account down to, but never below, its product's floor.
    ///
    /// # Errors
    /// Returns `LedgerError` if:
    /// - The account is inactive.
    /// - The amount is not strictly positive.
    /// - The balance would drop below the floor.
    pub fn withdraw(&mut self, amount: Money, description: Option<&str>, context: &LedgerContext) -> Result<Transaction, LedgerError> {
        validate_active(self)?;
        validate_amount(amount)?;
        validate_sufficient_funds(&self.account_code, self.balance, amount, self.kind.floor())?;

        let balance = self.debited(amount)?;
        let transaction = Transaction::record(LedgerEntry {
            transaction_type: TransactionType::Withdraw,
            amount,
            previous_balance: self.balance,
            origin: Some(self.account_code.clone()),
            destination: None,
            description: description_or(description, "Withdraw performed")
        }, context)?;

        Ok(self.commit(balance, transaction))
    }

    /// Moves `amount` from this account to `destination`, logging a
    /// `TransferSent` entry here and a `TransferReceived` entry there.
    ///
    /// Both sides are validated and both entries are built before either
    /// balance changes, so a failed transfer leaves both accounts as they were.
    ///
    /// # Errors
    /// Returns `LedgerError` if:
    /// - This account is inactive.
    /// - The destination is missing or inactive.
    /// - The amount is not strictly positive.
    /// - This account's balance would drop below its floor.
    pub fn transfer(&mut self, amount: Money, destination: Option<&mut Account>, context: &LedgerContext) -> Result<(Transaction, Transaction), LedgerError> {
        validate_active(self)?;

        let destination = match destination {
            Some(destination) if destination.is_active() => destination,
            other => return Err(LedgerError::invalid_destination(other.map(|account| &account.account_code)))
        };

        validate_amount(amount)?;
        validate_sufficient_funds(&self.account_code, self.balance, amount, self.kind.floor())?;

        let source_balance = self.debited(amount)?;
        let destination_balance = destination.credited(amount)?;

        let sent = Transaction::record(LedgerEntry {
            transaction_type: TransactionType::TransferSent,
            amount,
            previous_balance: self.balance,
            origin: Some(self.account_code.clone()),
            destination: Some(destination.account_code.clone()),
            description: format!("Transfer sent to {}", destination.account_code)
        }, context)?;

        let received = Transaction::record(LedgerEntry {
            transaction_type: TransactionType::TransferReceived,
            amount,
            previous_balance: destination.balance,
            origin: Some(self.account_code.clone()),
            destination: Some(destination.account_code.clone()),
            description: format!("Transfer received from {}", self.account_code)
        }, context)?;

        let sent = self.commit(source_balance, sent);
        let received = destination.commit(destination_balance, received);

        Ok((sent, received))
    }

    /// Changes the overdraft limit of a checking account.
    ///
    /// # Errors
    /// Returns `LedgerError::Validation` if:
    /// - The account is not a checking account.
    /// - The limit is negative.
    /// - The current balance is already below the floor the new limit implies.
    pub fn set_overdraft_limit(&mut self, overdraft_limit: Money) -> Result<(), LedgerError> {
        let AccountKind::Checking(checking) = &mut self.kind else {
            return Err(LedgerError::validation("overdraft limit", "only checking accounts have an overdraft"))
        };

        if !overdraft_limit.is_negative() && self.balance < -overdraft_limit {
            return Err(LedgerError::validation(
                "overdraft limit",
                format!("[{overdraft_limit}] does not cover the current balance of [{}]", self.balance)
            ))
        }

        checking.set_overdraft_limit(overdraft_limit)
    }

    /// Fee the account would be charged this month. Does not charge it.
    pub fn calculate_monthly_fee(&self) -> Money {
        self.kind.monthly_fee(self.balance)
    }

    /// Projected yield at the current balance; `None` for checking accounts.
    pub fn estimated_yield(&self) -> Option<Money> {
        match &self.kind {
            AccountKind::Savings(savings) => savings.estimated_yield(self.balance),
            AccountKind::Checking(_) => None
        }
    }

    /// Pays the savings yield for the current cycle and records today as the
    /// last income date. A zero yield moves the date but logs nothing.
    ///
    /// # Errors
    /// Returns `LedgerError` if:
    /// - The account is inactive.
    /// - The account is not a savings account.
    /// - The yield is not due yet.
    pub fn apply_yield(&mut self, context: &LedgerContext) -> Result<Option<Transaction>, LedgerError> {
        validate_active(self)?;

        let today = context.today();
        let amount = match &self.kind {
            AccountKind::Savings(savings) if savings.can_apply_yield(today) => savings
                .estimated_yield(self.balance)
                .ok_or_else(|| LedgerError::overflow(&self.account_code))?,
            AccountKind::Savings(savings) => return Err(LedgerError::YieldNotDue {
                account_code: self.account_code.clone(),
                next_anniversary: savings.next_anniversary(today)
            }),
            AccountKind::Checking(_) => return Err(LedgerError::YieldUnsupported {
                account_code: self.account_code.clone()
            })
        };

        let transaction = if amount.is_positive() {
            let balance = self.credited(amount)?;
            let transaction = Transaction::record(LedgerEntry {
                transaction_type: TransactionType::Interest,
                amount,
                previous_balance: self.balance,
                origin: None,
                destination: Some(self.account_code.clone()),
                description: "Savings yield".to_string()
            }, context)?;

            Some(self.commit(balance, transaction))
        } else {
            None
        };

        if let AccountKind::Savings(savings) = &mut self.kind {
            savings.record_income(today);
        }

        Ok(transaction)
    }

    pub fn confirm_transaction(&mut self, transaction_id: TransactionId) -> Result<Transaction, LedgerError> {
        let transaction = self.transaction_mut(transaction_id)?;
        transaction.confirm()?;

        Ok(transaction.clone())
    }

    pub fn cancel_transaction(&mut self, transaction_id: TransactionId) -> Result<Transaction, LedgerError> {
        let transaction = self.transaction_mut(transaction_id)?;
        transaction.cancel()?;

        Ok(transaction.clone())
    }

    fn transaction_mut(&mut self, transaction_id: TransactionId) -> Result<&mut Transaction, LedgerError> {
        let account_code = &self.account_code;

        self.transactions
            .iter_mut()
            .find(|transaction| transaction.id() == transaction_id)
            .ok_or_else(|| LedgerError::TransactionNotFound {
                account_code: account_code.clone(),
                transaction_id
            })
    }

    fn credited(&self, amount: Money) -> Result<Money, LedgerError> {
        self.balance.checked_add(amount)
            .ok_or_else(|| LedgerError::overflow(&self.account_code))
    }

    fn debited(&self, amount: Money) -> Result<Money, LedgerError> {
        self.balance.checked_sub(amount)
            .ok_or_else(|| LedgerError::overflow(&self.account_code))
    }

    fn commit(&mut self, balance: Money, transaction: Transaction) -> Transaction {
        self.balance = balance;
        self.transactions.push(transaction.clone());
        transaction
    }
}

fn description_or(description: Option<&str>, default: &str) -> String {
    match description.map(str::trim) {
        Some(description) if !description.is_empty() => description.to_string(),
        _ => default.to_string()
    }
}
