use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::models::errors::LedgerError;
use crate::types::UserId;

const CPF_LENGTH: usize = 11;

pub(super) static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@(?:[a-z0-9-]+\.)+[a-z]{2,}$").expect("Invalid email regex pattern")
});

/// Brazilian taxpayer number, stored as its 11 bare digits.
///
/// Punctuation is stripped on input; check digits are not verified, but a
/// number made of a single repeated digit is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        let digits: String = value.chars().filter(char::is_ascii_digit).collect();

        if digits.len() != CPF_LENGTH {
            return Err(LedgerError::validation("CPF", "must contain 11 digits"))
        }

        if digits.chars().all(|digit| digits.starts_with(digit)) {
            return Err(LedgerError::validation("CPF", "repeated digits are not allowed"))
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `XXX.XXX.XXX-XX`
    pub fn formatted(&self) -> String {
        format!("{}.{}.{}-{}", &self.0[0..3], &self.0[3..6], &self.0[6..9], &self.0[9..11])
    }
}

impl Display for Cpf {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Trimmed, lower-cased e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        let address = value.trim().to_lowercase();

        if address.is_empty() {
            return Err(LedgerError::validation("email", "must not be empty"))
        }

        if !EMAIL_PATTERN.is_match(&address) {
            return Err(LedgerError::validation("email", format!("[{address}] is not a valid address")))
        }

        Ok(Self(address))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }

    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl Display for Email {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// An account holder. Accounts refer to users by id and never mutate them.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    name: String,
    cpf: Cpf,
    email: Email,
    created_at: NaiveDateTime
}

impl User {
    pub fn new(id: UserId, name: &str, cpf: Cpf, email: Email, created_at: NaiveDateTime) -> Result<Self, LedgerError> {
        Ok(Self {
            id,
            name: validate_name(name)?,
            cpf,
            email,
            created_at
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cpf(&self) -> &Cpf {
        &self.cpf
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn rename(&mut self, name: &str) -> Result<(), LedgerError> {
        self.name = validate_name(name)?;

        Ok(())
    }

    pub fn change_email(&mut self, email: Email) -> Result<(), LedgerError> {
        if self.email == email {
            return Err(LedgerError::validation("email", "the new address is equal to the current one"))
        }

        self.email = email;

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, LedgerError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(LedgerError::validation("name", "must not be empty"))
    }

    Ok(name.to_string())
}
