pub mod bank;
pub mod context;
pub mod engine;
pub mod models;
pub mod storage;
pub mod types;
