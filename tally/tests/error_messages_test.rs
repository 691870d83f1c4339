use tally::{
    evaluate, ArithmeticOperation, ComparisonOperator, Environment, Expression, TallyError,
};

fn error_of(node: Expression) -> TallyError {
    let mut env = Environment::new();
    evaluate(&[node], &mut env).unwrap_err()
}

fn add(left: Expression, right: Expression) -> Expression {
    Expression::arithmetic(left, ArithmeticOperation::Add, right)
}

#[test]
fn incompatible_units_name_both_sides() {
    let err = error_of(add(
        Expression::quantity("5", "meters"),
        Expression::quantity("3", "kilograms"),
    ));
    assert_eq!(
        err.to_string(),
        "Incompatible units: cannot convert 'kilograms' to 'meters'"
    );
}

#[test]
fn arbitrary_units_never_mix() {
    let err = error_of(add(
        Expression::quantity("5", "apples"),
        Expression::quantity("3", "oranges"),
    ));
    assert!(matches!(err, TallyError::IncompatibleUnits { .. }));
}

#[test]
fn duration_plus_length_is_incompatible() {
    let err = error_of(add(
        Expression::quantity("5", "seconds"),
        Expression::quantity("3", "meters"),
    ));
    assert!(matches!(err, TallyError::IncompatibleUnits { .. }));
}

#[test]
fn currencies_without_rate() {
    let err = error_of(add(
        Expression::currency("5", "$"),
        Expression::currency("3", "€"),
    ));
    assert_eq!(
        err.to_string(),
        "Incompatible currencies: no exchange rate between EUR and USD"
    );
}

#[test]
fn division_by_zero_names_operator() {
    let err = error_of(Expression::arithmetic(
        Expression::number("10"),
        ArithmeticOperation::Modulo,
        Expression::number("0"),
    ));
    assert_eq!(err.to_string(), "Division by zero in '%'");
}

#[test]
fn unsupported_pair_lists_operands() {
    let err = error_of(Expression::arithmetic(
        Expression::boolean("true"),
        ArithmeticOperation::Add,
        Expression::number("1"),
    ));
    let message = err.to_string();
    assert!(message.starts_with("Unsupported operation: '+'"), "{}", message);
    assert!(message.contains("boolean"), "{}", message);
}

#[test]
fn ordering_booleans_is_unsupported() {
    let err = error_of(Expression::comparison(
        Expression::boolean("yes"),
        ComparisonOperator::GreaterThan,
        Expression::boolean("no"),
    ));
    assert!(matches!(err, TallyError::UnsupportedOperation { .. }));
}

#[test]
fn unknown_keywords_list_choices() {
    let err = error_of(Expression::call(
        "seek",
        vec![Expression::identifier("tape")],
    ));
    assert_eq!(
        err.to_string(),
        "Unknown storage type 'tape' (expected one of: ssd, sata_ssd, nvme, pcie_ssd, hdd)"
    );
}

#[test]
fn availability_out_of_range() {
    let err = error_of(Expression::call(
        "downtime",
        vec![Expression::number("-0.5"), Expression::identifier("day")],
    ));
    assert!(matches!(err, TallyError::OutOfRange { .. }));
}

#[test]
fn negative_compression_input() {
    let err = error_of(Expression::call(
        "compress",
        vec![Expression::quantity("-1", "GB"), Expression::identifier("gzip")],
    ));
    assert!(matches!(err, TallyError::NegativeValue { .. }));
}

#[test]
fn malformed_exchange_key() {
    let err = error_of(Expression::frontmatter(
        "exchange",
        "USD_EUR_GBP",
        Expression::number("1"),
    ));
    assert_eq!(
        err.to_string(),
        "Malformed exchange key 'USD_EUR_GBP': expected FROM_TO, e.g. USD_EUR"
    );
}

#[test]
fn wrong_argument_type_reports_position() {
    let err = error_of(Expression::call(
        "sqrt",
        vec![Expression::quantity("4", "m")],
    ));
    assert_eq!(
        err.to_string(),
        "Function 'sqrt' argument 1: expected a number, got quantity 4 m"
    );
}

#[test]
fn failed_conversion_never_falls_back() {
    let err = error_of(Expression::convert(Expression::quantity("3", "kg"), "meters"));
    assert_eq!(
        err.to_string(),
        "Incompatible units: cannot convert 'kg' to 'meters'"
    );
}
