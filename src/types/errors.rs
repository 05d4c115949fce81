use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonetaryError {
    #[error("Monetary error: {0}")]
    InvalidFormat(String),
    #[error("Monetary error: [{value}] is not a decimal amount: {source}")]
    Parse {
        value: String,
        #[source]
        source: rust_decimal::Error
    }
}
