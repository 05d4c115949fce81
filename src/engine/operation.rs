use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    User,
    Checking,
    Savings,
    Deposit,
    Withdraw,
    Transfer,
    Disable,
    Enable,
    Deactivate,
    Yield
}

/// A single row of a batch operations file.
///
/// `account` and `target` are aliases chosen by the file's author; the engine
/// maps them to registered users and account codes as rows are applied. Which
/// of the remaining columns matter depends on `operation_type`.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub account: String,
    pub target: Option<String>,
    /// Amount for money movements, overdraft limit for `checking`, rate for `savings`.
    #[serde(default, deserialize_with = "decimal_from_text")]
    pub amount: Option<Decimal>,
    pub branch: Option<String>,
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>
}

//NOTE: Read the raw field and parse it ourselves; letting csv infer the type
//      routes long numbers through f64 and loses digits.
fn decimal_from_text<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None)
    };

    let value = value.trim();

    if value.is_empty() {
        return Ok(None)
    }

    Decimal::from_str(value).map(Some).map_err(de::Error::custom)
}
