use super::helpers::{d, eval_in};
use crate::environment::parse_exchange_key;
use crate::{Environment, Expression, TallyError, Value};
use rust_decimal::Decimal;

#[test]
fn test_constants_seeded() {
    let env = Environment::new();
    assert_eq!(env.get("PI"), Some(&Value::Number(Decimal::PI)));
    assert_eq!(env.get("E"), Some(&Value::Number(Decimal::E)));
    assert!(!env.has("x"));
}

#[test]
fn test_set_get_has() {
    let mut env = Environment::new();
    env.set("servers", Value::number(12));
    assert!(env.has("servers"));
    assert_eq!(env.get("servers"), Some(&Value::number(12)));
    assert_eq!(env.get("missing"), None);
}

#[test]
fn test_clone_is_independent() {
    let mut env = Environment::new();
    env.set("x", Value::number(1));
    let mut copy = env.clone();
    copy.set("x", Value::number(2));
    copy.set_exchange_rate("USD", "EUR", d("0.9"));

    assert_eq!(env.get("x"), Some(&Value::number(1)));
    assert_eq!(env.get_exchange_rate("USD", "EUR"), None);
    assert_eq!(copy.get_exchange_rate("usd", "eur"), Some(d("0.9")));
}

#[test]
fn test_exchange_keys_normalized() {
    let mut env = Environment::new();
    env.set_exchange_rate(" usd", "eur ", d("0.92"));
    assert_eq!(env.get_exchange_rate("USD", "EUR"), Some(d("0.92")));
}

#[test]
fn test_exchange_inverse_lookup() {
    let mut env = Environment::new();
    env.set_exchange_rate("EUR", "USD", d("1.25"));
    assert_eq!(env.resolve_exchange_rate("USD", "EUR"), Some(d("0.8")));
    assert_eq!(env.resolve_exchange_rate("EUR", "EUR"), Some(Decimal::ONE));
    assert_eq!(env.resolve_exchange_rate("GBP", "EUR"), None);
}

#[test]
fn test_parse_exchange_key() {
    assert_eq!(parse_exchange_key("USD_EUR").unwrap(), ("USD", "EUR"));
    for bad in ["USDEUR", "USD_", "_EUR", "USD_EUR_GBP", ""] {
        assert!(
            matches!(parse_exchange_key(bad), Err(TallyError::MalformedExchangeKey { .. })),
            "{} should be rejected",
            bad
        );
    }
}

#[test]
fn test_frontmatter_global_binds_variable() {
    let mut env = Environment::new();
    let value = eval_in(
        Expression::frontmatter("global", "rps", Expression::number("1.2k")),
        &mut env,
    )
    .unwrap();
    assert_eq!(value, Value::number(1200));
    assert_eq!(env.get("rps"), Some(&Value::number(1200)));
}

#[test]
fn test_frontmatter_exchange_declares_rate() {
    let mut env = Environment::new();
    eval_in(
        Expression::frontmatter("exchange", "USD_EUR", Expression::number("0.92")),
        &mut env,
    )
    .unwrap();
    assert_eq!(env.get_exchange_rate("USD", "EUR"), Some(d("0.92")));
}

#[test]
fn test_frontmatter_errors() {
    let mut env = Environment::new();
    let malformed = eval_in(
        Expression::frontmatter("exchange", "USDEUR", Expression::number("0.92")),
        &mut env,
    );
    assert!(matches!(malformed, Err(TallyError::MalformedExchangeKey { .. })));

    let non_positive = eval_in(
        Expression::frontmatter("exchange", "USD_EUR", Expression::number("0")),
        &mut env,
    );
    assert!(matches!(non_positive, Err(TallyError::OutOfRange { .. })));

    let not_a_number = eval_in(
        Expression::frontmatter("exchange", "USD_EUR", Expression::boolean("true")),
        &mut env,
    );
    assert!(matches!(not_a_number, Err(TallyError::WrongArgumentType { .. })));

    let namespace = eval_in(
        Expression::frontmatter("locale", "lang", Expression::number("1")),
        &mut env,
    );
    assert!(matches!(namespace, Err(TallyError::UnknownKeyword { .. })));
}

#[test]
fn test_constants_use_full_decimal_precision() {
    let env = Environment::new();
    assert_eq!(
        env.get("PI").map(|v| v.magnitude().unwrap().to_string()),
        Some("3.1415926535897932384626433833".to_string())
    );
}
