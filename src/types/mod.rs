mod account_code;
mod errors;
mod monetary;
#[cfg(test)]
mod tests;

pub use account_code::AccountCode;
pub use errors::MonetaryError;
pub use monetary::Money;

pub type TransactionId = uuid::Uuid;
pub type UserId = uuid::Uuid;
