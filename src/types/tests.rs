use super::{AccountCode, Money};
use anyhow::Result;
use rust_decimal_macros::dec;
use std::str::FromStr;

#[test]
fn test_money_successfully_parses_valid_strings() -> Result<()> {
    let test_cases = vec![
        ("1.0", "1.00"),
        ("1.25", "1.25"),
        ("0.01", "0.01"),
        ("-1.5", "-1.50"),
        ("  1.0  ", "1.00"),
        ("+1.0", "1.00"),
        ("100", "100.00"),
    ];

    for (input_string, expected_output) in test_cases {
        assert_eq!(Money::from_str(input_string)?.to_string(), expected_output);
    }

    Ok(())
}

#[test]
fn test_money_fails_to_parse_invalid_strings() {
    assert!(Money::from_str("abc").is_err());
    assert!(Money::from_str("1.2.3").is_err());
    assert!(Money::from_str("").is_err());
    assert!(Money::from_str("   ").is_err());
}

#[test]
fn test_money_rounds_half_to_even() -> Result<()> {
    assert_eq!(Money::from_str("10.005")?.to_string(), "10.00");
    assert_eq!(Money::from_str("10.015")?.to_string(), "10.02");
    assert_eq!(Money::from_str("10.0151")?.to_string(), "10.02");
    assert_eq!(Money::new(dec!(-2.675)).to_string(), "-2.68");
    assert_eq!(Money::from_str("0.004")?, Money::ZERO);

    Ok(())
}

#[test]
fn test_money_checked_arithmetic_reports_overflow() {
    let max = Money::new(rust_decimal::Decimal::MAX);

    assert!(max.checked_add(Money::new(dec!(1))).is_none());
    assert_eq!(
        Money::new(dec!(1.50)).checked_sub(Money::new(dec!(2.00))),
        Some(Money::new(dec!(-0.50)))
    );
}

#[test]
fn test_money_applies_rate_with_scale_two() {
    assert_eq!(Money::new(dec!(1000.00)).apply_rate(dec!(0.005)), Some(Money::new(dec!(5.00))));
    assert_eq!(Money::new(dec!(123.45)).apply_rate(dec!(0.005)).map(|m| m.to_string()), Some("0.62".to_string()));
    assert_eq!(Money::new(dec!(0.00)).apply_rate(dec!(0.1)), Some(Money::ZERO));
}

#[test]
fn test_money_sign_predicates() {
    assert!(Money::new(dec!(0.01)).is_positive());
    assert!(Money::new(dec!(-0.01)).is_negative());
    assert!(Money::ZERO.is_zero());
    assert!(!Money::ZERO.is_positive());
    assert_eq!(-Money::new(dec!(500)), Money::new(dec!(-500.00)));
}

#[test]
fn test_account_code_joins_branch_and_number() {
    let code = AccountCode::new("0001", "12345678");

    assert_eq!(code.as_str(), "0001-12345678");
    assert_eq!(code.to_string(), "0001-12345678");
    assert!(AccountCode::new("0001", "00000001") < AccountCode::new("0001", "00000002"));
}
