use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use bank_ledger::bank::{Bank, BankConfig};
use bank_ledger::context::LedgerContext;
use bank_ledger::engine::{BatchEngine, BatchReport};

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: Two positional arguments do not justify pulling in clap yet.
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: bank-ledger [input].csv [log_level:optional] > [output].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let path = &args[1];
    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let bank = Arc::new(Bank::new(BankConfig::default(), LedgerContext::system()));
    let engine = BatchEngine::new(bank.clone());

    let timer = Instant::now();
    let report = engine.run(path).await?;
    let duration = timer.elapsed();

    info!("Applied {} operations and rejected {} in: {duration:?}", report.applied, report.rejected);

    write_results_to_stdout(&bank, &report)?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{level}', defaulting to 'error'");
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the account report, so logs go to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_results_to_stdout(bank: &Bank, report: &BatchReport) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "alias,account,type,balance,active,transactions")?;

    for (alias, code) in &report.accounts {
        let account = bank.account(code)?;

        writeln!(
            output,
            "{},{},{},{},{},{}",
            alias,
            code,
            account.kind().label(),
            account.balance(),
            account.is_active(),
            account.transactions().len()
        )?;
    }

    output.flush()?;

    Ok(())
}
