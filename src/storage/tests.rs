use super::{AccountStorage, TransactionStorage, UserStorage};
use crate::context::{FixedClock, LedgerContext, SeededEntropy};
use crate::models::{Account, AccountKind, Cpf, Email, LedgerError, SavingsAccount, User};
use crate::types::{AccountCode, Money};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

fn context() -> Result<LedgerContext> {
    let now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .ok_or_else(|| anyhow!("invalid date"))?;

    Ok(LedgerContext::new(Arc::new(FixedClock::new(now)), Arc::new(SeededEntropy::new(3))))
}

fn savings_account(holder: Uuid, context: &LedgerContext) -> Result<Account> {
    let policy = SavingsAccount::new(dec!(0.005), context.today())?;
    Ok(Account::open("0001", holder, AccountKind::Savings(policy), context))
}

fn user(name: &str, cpf: &str, email: &str, context: &LedgerContext) -> Result<User> {
    Ok(User::new(context.user_id(), name, Cpf::parse(cpf)?, Email::parse(email)?, context.now())?)
}

#[test]
fn test_account_storage_basic_save_and_find_operations() -> Result<()> {
    let context = context()?;
    let storage = AccountStorage::new();
    let account = savings_account(Uuid::nil(), &context)?;
    let code = account.account_code().clone();

    assert!(storage.find(&code).is_none());

    storage.save(account);
    let shared = storage.find(&code).ok_or_else(|| anyhow!("Account not found in storage"))?;

    assert!(storage.contains(&code));
    assert_eq!(shared.lock().account_code(), &code);

    Ok(())
}

#[test]
fn test_account_storage_hands_out_the_same_shared_account() -> Result<()> {
    let context = context()?;
    let storage = AccountStorage::new();
    let code = storage.save(savings_account(Uuid::nil(), &context)?).lock().account_code().clone();

    let first = storage.find(&code).ok_or_else(|| anyhow!("first handle missing"))?;
    first.lock().deposit(Money::new(dec!(25)), None, &context)?;

    let second = storage.find(&code).ok_or_else(|| anyhow!("second handle missing"))?;

    assert_eq!(second.lock().balance(), Money::new(dec!(25)));

    Ok(())
}

#[test]
fn test_account_storage_insert_new_refuses_taken_codes() -> Result<()> {
    let context = context()?;
    let storage = AccountStorage::new();
    let account = savings_account(Uuid::nil(), &context)?;
    let code = account.account_code().clone();
    let mut twin = account.clone();

    twin.deposit(Money::new(dec!(10)), None, &context)?;

    assert!(storage.insert_new(account).is_some());
    assert!(storage.insert_new(twin).is_none());

    let stored = storage.find(&code).ok_or_else(|| anyhow!("account missing"))?;

    assert!(stored.lock().balance().is_zero());

    Ok(())
}

#[test]
fn test_account_storage_filters_by_holder_and_removes() -> Result<()> {
    let context = context()?;
    let storage = AccountStorage::new();
    let holder = context.user_id();

    storage.save(savings_account(holder, &context)?);
    storage.save(savings_account(holder, &context)?);
    let other = storage.save(savings_account(context.user_id(), &context)?);
    let other_code = other.lock().account_code().clone();

    assert_eq!(storage.find_by_holder(holder).len(), 2);
    assert_eq!(storage.all().len(), 3);

    assert!(storage.remove(&other_code).is_some());
    assert!(storage.remove(&other_code).is_none());
    assert_eq!(storage.all().len(), 2);

    Ok(())
}

#[test]
fn test_user_storage_finds_by_cpf_and_email() -> Result<()> {
    let context = context()?;
    let storage = UserStorage::new();
    let maria = user("Maria", "529.982.247-25", "maria@example.com", &context)?;
    let joao = user("Joao", "123.456.789-09", "joao@example.com", &context)?;
    let maria_id = maria.id();

    storage.insert_new(maria)?;
    storage.insert_new(joao)?;

    assert!(storage.exists(maria_id));
    assert_eq!(storage.find_by_cpf(&Cpf::parse("52998224725")?).map(|user| user.id()), Some(maria_id));
    assert_eq!(storage.find_by_email(&Email::parse("JOAO@example.com")?).map(|user| user.name().to_string()), Some("Joao".to_string()));
    assert!(storage.find_by_email(&Email::parse("nobody@example.com")?).is_none());
    assert_eq!(storage.all().len(), 2);

    storage.remove(maria_id);

    assert!(storage.find(maria_id).is_none());
    assert!(storage.find_by_cpf(&Cpf::parse("52998224725")?).is_none());

    Ok(())
}

#[test]
fn test_user_storage_claims_identifiers_once() -> Result<()> {
    let context = context()?;
    let storage = UserStorage::new();
    let maria = user("Maria", "529.982.247-25", "maria@example.com", &context)?;
    let maria_id = maria.id();

    storage.insert_new(maria)?;

    assert!(matches!(
        storage.insert_new(user("Twin", "529.982.247-25", "twin@example.com", &context)?),
        Err(LedgerError::DuplicateIdentifier { field: "CPF", .. })
    ));
    assert!(matches!(
        storage.insert_new(user("Copy", "123.456.789-09", "maria@example.com", &context)?),
        Err(LedgerError::DuplicateIdentifier { field: "email", .. })
    ));

    //NOTE: The rejected e-mail claim must not leave its CPF behind.
    storage.insert_new(user("Joao", "123.456.789-09", "joao@example.com", &context)?)?;

    let moved = storage.change_email(maria_id, Email::parse("maria.silva@example.com")?)?;

    assert_eq!(moved.email().as_str(), "maria.silva@example.com");
    assert!(storage.find_by_email(&Email::parse("maria@example.com")?).is_none());
    assert!(matches!(
        storage.change_email(maria_id, Email::parse("joao@example.com")?),
        Err(LedgerError::DuplicateIdentifier { .. })
    ));
    assert_eq!(storage.all().len(), 2);

    Ok(())
}

#[test]
fn test_transaction_storage_indexes_by_owner_in_order() -> Result<()> {
    let context = context()?;
    let storage = TransactionStorage::new();
    let mut account = savings_account(Uuid::nil(), &context)?;
    let code = account.account_code().clone();

    let first = account.deposit(Money::new(dec!(10)), None, &context)?;
    let second = account.withdraw(Money::new(dec!(4)), None, &context)?;

    storage.record(&code, first.clone());
    storage.record(&code, second.clone());
    storage.record(&code, first.clone());

    let ids: Vec<_> = storage.for_account(&code).iter().map(|transaction| transaction.id()).collect();

    assert_eq!(ids, vec![first.id(), second.id()]);
    assert_eq!(storage.len(), 2);
    assert!(storage.for_account(&AccountCode::from("9999-00000000")).is_empty());

    Ok(())
}

#[test]
fn test_transaction_storage_replace_overwrites_status() -> Result<()> {
    let context = context()?;
    let storage = TransactionStorage::new();
    let mut account = savings_account(Uuid::nil(), &context)?;
    let code = account.account_code().clone();
    let deposit = account.deposit(Money::new(dec!(10)), None, &context)?;

    storage.record(&code, deposit.clone());
    storage.replace(account.confirm_transaction(deposit.id())?);

    let stored = storage.find(deposit.id()).ok_or_else(|| anyhow!("transaction missing"))?;

    assert_eq!(stored.status(), crate::models::TransactionStatus::Confirmed);

    Ok(())
}
