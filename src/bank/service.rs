use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::bank::BankConfig;
use crate::context::LedgerContext;
use crate::models::{Account, AccountKind, CheckingAccount, Cpf, Email, LedgerError, SavingsAccount, Transaction, User};
use crate::storage::{AccountStorage, SharedAccount, TransactionStorage, UserStorage};
use crate::types::{AccountCode, Money, TransactionId, UserId};

/// What to open for a holder. Unset limits and rates fall back to [`BankConfig`].
#[derive(Debug, Clone, Copy)]
pub enum Product {
    Checking { overdraft_limit: Option<Money> },
    Savings { rate_return: Option<Decimal> }
}

/// Service boundary over the ledger core.
///
/// Looks accounts and users up in the in-memory registries, serializes access
/// per account and mirrors every recorded transaction into the audit registry.
/// The registry is written while the owning account's lock is held, so its
/// per-account order matches the account's own log. Account locks are never
/// taken from inside a registry call.
pub struct Bank {
    config: BankConfig,
    context: LedgerContext,
    users: UserStorage,
    accounts: AccountStorage,
    transactions: TransactionStorage
}

impl Bank {
    pub fn new(config: BankConfig, context: LedgerContext) -> Self {
        Self {
            config,
            context,
            users: UserStorage::new(),
            accounts: AccountStorage::new(),
            transactions: TransactionStorage::new()
        }
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    /// # Errors
    /// Returns `LedgerError` if the CPF, e-mail or name is malformed, or if the
    /// CPF or e-mail already belongs to another user.
    pub fn register_user(&self, name: &str, cpf: &str, email: &str) -> Result<User, LedgerError> {
        let cpf = Cpf::parse(cpf)?;
        let email = Email::parse(email)?;
        let user = User::new(self.context.user_id(), name, cpf, email, self.context.now())?;

        self.users.insert_new(user.clone())?;

        info!("User [{}] registered", user.id());

        Ok(user)
    }

    pub fn user(&self, user_id: UserId) -> Result<User, LedgerError> {
        self.users.find(user_id).ok_or(LedgerError::UserNotFound { user_id })
    }

    pub fn users(&self) -> Vec<User> {
        self.users.all()
    }

    /// # Errors
    /// Returns `LedgerError` if the user is unknown, the address is malformed or
    /// unchanged, or it already belongs to another user.
    pub fn update_email(&self, user_id: UserId, email: &str) -> Result<User, LedgerError> {
        let email = Email::parse(email)?;
        self.users.change_email(user_id, email)
    }

    /// Opens an account for an existing user and returns its code.
    ///
    /// # Errors
    /// Returns `LedgerError` if the user is unknown, the product parameters are
    /// out of bounds, or no unused account number was drawn within the
    /// configured number of attempts.
    pub fn open_account(&self, branch_code: &str, user_id: UserId, product: Product) -> Result<AccountCode, LedgerError> {
        if !self.users.exists(user_id) {
            return Err(LedgerError::UserNotFound { user_id })
        }

        let branch_code = branch_code.trim();

        if branch_code.is_empty() {
            return Err(LedgerError::validation("branch code", "must not be empty"))
        }

        let kind = match product {
            Product::Checking { overdraft_limit } => AccountKind::Checking(CheckingAccount::new(
                overdraft_limit.unwrap_or(self.config.default_overdraft_limit),
                self.config.monthly_fee,
                self.config.fee_waiver_threshold
            )?),
            Product::Savings { rate_return } => AccountKind::Savings(SavingsAccount::new(
                rate_return.unwrap_or(self.config.default_rate_return),
                self.context.today()
            )?)
        };

        for _ in 0..self.config.account_number_attempts {
            let account = Account::open(branch_code, user_id, kind.clone(), &self.context);
            let code = account.account_code().clone();

            if self.accounts.insert_new(account).is_none() {
                debug!("Account number collision on [{code}], drawing again");
                continue;
            }

            info!("Opened {} account [{code}] for user [{user_id}]", kind.label());

            return Ok(code)
        }

        Err(LedgerError::DuplicateIdentifier {
            field: "account number",
            value: format!("{} attempts in branch {branch_code}", self.config.account_number_attempts)
        })
    }

    /// A point-in-time copy of the account.
    pub fn account(&self, account_code: &AccountCode) -> Result<Account, LedgerError> {
        Ok(self.shared(account_code)?.lock().clone())
    }

    pub fn accounts_of(&self, user_id: UserId) -> Vec<Account> {
        self.accounts.find_by_holder(user_id).iter().map(|shared| shared.lock().clone()).collect()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.all().iter().map(|shared| shared.lock().clone()).collect()
    }

    pub fn balance(&self, account_code: &AccountCode) -> Result<Money, LedgerError> {
        Ok(self.shared(account_code)?.lock().balance())
    }

    pub fn deposit(&self, account_code: &AccountCode, amount: Money, description: Option<&str>) -> Result<Transaction, LedgerError> {
        let shared = self.shared(account_code)?;
        let mut account = shared.lock();
        let transaction = account.deposit(amount, description, &self.context)?;
        self.transactions.record(account_code, transaction.clone());
        drop(account);

        debug!("Deposit [{}] of [{amount}] into [{account_code}]", transaction.id());

        Ok(transaction)
    }

    pub fn withdraw(&self, account_code: &AccountCode, amount: Money, description: Option<&str>) -> Result<Transaction, LedgerError> {
        let shared = self.shared(account_code)?;
        let mut account = shared.lock();
        let transaction = account.withdraw(amount, description, &self.context)?;
        self.transactions.record(account_code, transaction.clone());
        drop(account);

        debug!("Withdraw [{}] of [{amount}] from [{account_code}]", transaction.id());

        Ok(transaction)
    }

    /// Transfers between two registered accounts.
    ///
    /// Both account locks are held for the whole operation and are always
    /// taken in ascending account-code order, so opposing transfers between
    /// the same pair cannot deadlock.
    ///
    /// # Errors
    /// Returns `LedgerError::InvalidDestination` when source and destination
    /// are the same account, `AccountNotFound` for an unknown code, and any
    /// error of [`Account::transfer`].
    pub fn transfer(&self, source_code: &AccountCode, destination_code: &AccountCode, amount: Money) -> Result<(Transaction, Transaction), LedgerError> {
        if source_code == destination_code {
            return Err(LedgerError::invalid_destination(Some(destination_code)))
        }

        let source = self.shared(source_code)?;
        let destination = self.shared(destination_code)?;

        let (mut source, mut destination) = if source_code < destination_code {
            let source = source.lock();
            (source, destination.lock())
        } else {
            let destination = destination.lock();
            (source.lock(), destination)
        };

        let (sent, received) = source.transfer(amount, Some(&mut *destination), &self.context)?;
        self.transactions.record(source_code, sent.clone());
        self.transactions.record(destination_code, received.clone());
        drop((source, destination));

        debug!("Transfer of [{amount}] from [{source_code}] to [{destination_code}]");

        Ok((sent, received))
    }

    pub fn set_overdraft_limit(&self, account_code: &AccountCode, overdraft_limit: Money) -> Result<(), LedgerError> {
        self.shared(account_code)?.lock().set_overdraft_limit(overdraft_limit)?;
        info!("Overdraft limit of [{account_code}] set to [{overdraft_limit}]");

        Ok(())
    }

    pub fn monthly_fee(&self, account_code: &AccountCode) -> Result<Money, LedgerError> {
        Ok(self.shared(account_code)?.lock().calculate_monthly_fee())
    }

    /// `None` for accounts that do not earn yield.
    pub fn estimated_yield(&self, account_code: &AccountCode) -> Result<Option<Money>, LedgerError> {
        Ok(self.shared(account_code)?.lock().estimated_yield())
    }

    pub fn apply_yield(&self, account_code: &AccountCode) -> Result<Option<Transaction>, LedgerError> {
        let shared = self.shared(account_code)?;
        let mut account = shared.lock();
        let transaction = account.apply_yield(&self.context)?;

        if let Some(transaction) = &transaction {
            self.transactions.record(account_code, transaction.clone());
            debug!("Yield of [{}] credited to [{account_code}]", transaction.amount());
        }

        Ok(transaction)
    }

    pub fn disable_account(&self, account_code: &AccountCode) -> Result<(), LedgerError> {
        self.shared(account_code)?.lock().disable();
        Ok(())
    }

    pub fn enable_account(&self, account_code: &AccountCode) -> Result<(), LedgerError> {
        self.shared(account_code)?.lock().enable();
        Ok(())
    }

    /// Disables an account whose balance is exactly zero.
    ///
    /// # Errors
    /// Returns `LedgerError::OutstandingBalance` for any positive or negative balance.
    pub fn deactivate_account(&self, account_code: &AccountCode) -> Result<(), LedgerError> {
        let shared = self.shared(account_code)?;
        let mut account = shared.lock();

        if !account.balance().is_zero() {
            return Err(LedgerError::OutstandingBalance {
                account_code: account_code.clone(),
                balance: account.balance()
            })
        }

        account.disable();
        info!("Account [{account_code}] deactivated");

        Ok(())
    }

    pub fn confirm_transaction(&self, account_code: &AccountCode, transaction_id: TransactionId) -> Result<Transaction, LedgerError> {
        let shared = self.shared(account_code)?;
        let mut account = shared.lock();
        let transaction = account.confirm_transaction(transaction_id)?;
        self.transactions.replace(transaction.clone());

        Ok(transaction)
    }

    pub fn cancel_transaction(&self, account_code: &AccountCode, transaction_id: TransactionId) -> Result<Transaction, LedgerError> {
        let shared = self.shared(account_code)?;
        let mut account = shared.lock();
        let transaction = account.cancel_transaction(transaction_id)?;
        self.transactions.replace(transaction.clone());

        Ok(transaction)
    }

    pub fn transaction(&self, transaction_id: TransactionId) -> Option<Transaction> {
        self.transactions.find(transaction_id)
    }

    pub fn transactions_of(&self, account_code: &AccountCode) -> Vec<Transaction> {
        self.transactions.for_account(account_code)
    }

    fn shared(&self, account_code: &AccountCode) -> Result<SharedAccount, LedgerError> {
        self.accounts.find(account_code).ok_or_else(|| LedgerError::account_not_found(account_code))
    }
}
