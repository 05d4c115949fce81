mod config;
mod service;

pub use config::BankConfig;
pub use service::{Bank, Product};
