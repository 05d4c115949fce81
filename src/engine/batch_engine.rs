use crate::bank::{Bank, Product};
use crate::engine::{Operation, OperationType};
use crate::models::LedgerError;
use crate::types::{AccountCode, Money, UserId};
use csv::{ReaderBuilder, Trim};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, error, warn};

const DEFAULT_BRANCH: &str = "0001";

/// Why a single row could not be applied.
#[derive(Debug, Error)]
enum RowError {
    #[error("Row [{row}]:[{operation_type:?}] is missing the {column} column")]
    MissingColumn {
        row: usize,
        operation_type: OperationType,
        column: &'static str
    },
    #[error("Row [{row}]:[{operation_type:?}] refers to unknown alias [{alias}]")]
    UnknownAlias {
        row: usize,
        operation_type: OperationType,
        alias: String
    },
    #[error("Row [{row}]:[{operation_type:?}] reuses alias [{alias}]")]
    DuplicateAlias {
        row: usize,
        operation_type: OperationType,
        alias: String
    },
    #[error("Row [{row}]:[{operation_type:?}] was rejected: {source}")]
    Rejected {
        row: usize,
        operation_type: OperationType,
        #[source]
        source: LedgerError
    }
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Every account alias known to the engine, in alias order.
    pub accounts: BTreeMap<String, AccountCode>,
    pub applied: usize,
    pub rejected: usize
}

/// Applies CSV files of banking operations to a [`Bank`].
///
/// Aliases declared in one file stay known to later runs of the same engine.
pub struct BatchEngine {
    bank: Arc<Bank>,
    aliases: Mutex<Aliases>,
    backpressure: usize
}

impl BatchEngine {
    /// Creates a new engine instance over the provided bank.
    pub fn new(bank: Arc<Bank>) -> Self {
        Self {
            bank,
            aliases: Mutex::new(Aliases::default()),
            backpressure: 256
        }
    }

    pub fn with_backpressure(mut self, backpressure: usize) -> Self {
        self.backpressure = backpressure.max(1);
        self
    }

    /// Streams the file through the bank in row order. Malformed rows and
    /// rejected operations are logged and skipped.
    pub async fn run(&self, path: &str) -> anyhow::Result<BatchReport> {
        let (sender, receiver) = mpsc::channel::<Operation>(self.backpressure);
        let csv_handle = self.spawn_csv_reader(path.to_string(), sender);
        let report = self.process_operations(receiver).await;

        if let Err(error) = csv_handle.await {
            error!("CSV ingestion failed: {error}");
        }

        Ok(report)
    }

    fn spawn_csv_reader(&self, path: String, sender: mpsc::Sender<Operation>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(error) => {
                    error!("Error opening CSV at path: {path} | {error}");
                    return;
                }
            };

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            for result in reader.deserialize::<Operation>() {
                match result {
                    Ok(operation) => {
                        if sender.blocking_send(operation).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        error!("CSV deserialization error: {error}");
                    }
                }
            }
        })
    }

    async fn process_operations(&self, mut receiver: mpsc::Receiver<Operation>) -> BatchReport {
        let mut report = BatchReport::default();
        let mut row = 0;

        while let Some(operation) = receiver.recv().await {
            row += 1;

            let outcome = {
                let mut aliases = self.aliases.lock();
                self.apply(row, &operation, &mut aliases)
            };

            match outcome {
                Ok(()) => {
                    report.applied += 1;
                    debug!("Row [{row}]:[{:?}] for [{}] applied", operation.operation_type, operation.account);
                }
                Err(error) => {
                    report.rejected += 1;
                    warn!("{error}");
                }
            }
        }

        report.accounts = self.aliases.lock().accounts.clone().into_iter().collect();
        report
    }

    fn apply(&self, row: usize, operation: &Operation, aliases: &mut Aliases) -> Result<(), RowError> {
        let operation_type = operation.operation_type;
        let rejected = |source: LedgerError| RowError::Rejected { row, operation_type, source };
        let required = |value: &Option<String>, column: &'static str| {
            value.clone().ok_or(RowError::MissingColumn { row, operation_type, column })
        };
        let amount = || {
            operation.amount
                .map(Money::new)
                .ok_or(RowError::MissingColumn { row, operation_type, column: "amount" })
        };

        match operation_type {
            OperationType::User => {
                ensure_free(row, operation_type, &operation.account, &aliases.users)?;

                let name = required(&operation.name, "name")?;
                let cpf = required(&operation.cpf, "cpf")?;
                let email = required(&operation.email, "email")?;
                let user = self.bank.register_user(&name, &cpf, &email).map_err(rejected)?;

                aliases.users.insert(operation.account.clone(), user.id());
            }
            OperationType::Checking | OperationType::Savings => {
                ensure_free(row, operation_type, &operation.account, &aliases.accounts)?;

                let holder = required(&operation.target, "target")?;
                let holder = aliases.user(row, operation_type, &holder)?;
                let branch = operation.branch.as_deref().unwrap_or(DEFAULT_BRANCH);
                let product = match operation_type {
                    OperationType::Checking => Product::Checking { overdraft_limit: operation.amount.map(Money::new) },
                    _ => Product::Savings { rate_return: operation.amount }
                };
                let code = self.bank.open_account(branch, holder, product).map_err(rejected)?;

                aliases.accounts.insert(operation.account.clone(), code);
            }
            OperationType::Deposit => {
                let code = aliases.account(row, operation_type, &operation.account)?;
                self.bank.deposit(&code, amount()?, operation.description.as_deref()).map_err(rejected)?;
            }
            OperationType::Withdraw => {
                let code = aliases.account(row, operation_type, &operation.account)?;
                self.bank.withdraw(&code, amount()?, operation.description.as_deref()).map_err(rejected)?;
            }
            OperationType::Transfer => {
                let source = aliases.account(row, operation_type, &operation.account)?;
                let destination = required(&operation.target, "target")?;
                let destination = aliases.account(row, operation_type, &destination)?;
                self.bank.transfer(&source, &destination, amount()?).map_err(rejected)?;
            }
            OperationType::Disable => {
                let code = aliases.account(row, operation_type, &operation.account)?;
                self.bank.disable_account(&code).map_err(rejected)?;
            }
            OperationType::Enable => {
                let code = aliases.account(row, operation_type, &operation.account)?;
                self.bank.enable_account(&code).map_err(rejected)?;
            }
            OperationType::Deactivate => {
                let code = aliases.account(row, operation_type, &operation.account)?;
                self.bank.deactivate_account(&code).map_err(rejected)?;
            }
            OperationType::Yield => {
                let code = aliases.account(row, operation_type, &operation.account)?;
                self.bank.apply_yield(&code).map_err(rejected)?;
            }
        }

        Ok(())
    }
}

#[derive(Default)]
struct Aliases {
    users: HashMap<String, UserId>,
    accounts: HashMap<String, AccountCode>
}

impl Aliases {
    fn user(&self, row: usize, operation_type: OperationType, alias: &str) -> Result<UserId, RowError> {
        self.users.get(alias).copied()
            .ok_or_else(|| RowError::UnknownAlias { row, operation_type, alias: alias.to_string() })
    }

    fn account(&self, row: usize, operation_type: OperationType, alias: &str) -> Result<AccountCode, RowError> {
        self.accounts.get(alias).cloned()
            .ok_or_else(|| RowError::UnknownAlias { row, operation_type, alias: alias.to_string() })
    }
}

fn ensure_free<V>(row: usize, operation_type: OperationType, alias: &str, taken: &HashMap<String, V>) -> Result<(), RowError> {
    if taken.contains_key(alias) {
        return Err(RowError::DuplicateAlias { row, operation_type, alias: alias.to_string() })
    }

    Ok(())
}
