use rust_decimal::Decimal;
use std::str::FromStr;
use tally::{
    evaluate, ArithmeticOperation, Environment, Evaluator, Expression, ResourceLimits, Value,
};

fn keyword(name: &str) -> Expression {
    Expression::identifier(name)
}

fn run(nodes: &[Expression]) -> Vec<Value> {
    let mut env = Environment::new();
    evaluate(nodes, &mut env).unwrap()
}

fn run_one(node: Expression) -> Value {
    run(&[node]).remove(0)
}

fn magnitude(value: &Value) -> Decimal {
    value.magnitude().unwrap()
}

#[test]
fn disks_for_ten_terabytes() {
    let value = run_one(Expression::call(
        "capacity_at",
        vec![
            Expression::quantity("10", "TB"),
            Expression::quantity("2", "TB"),
            keyword("disk"),
        ],
    ));
    assert_eq!(value.to_string(), "5 disk");
}

#[test]
fn servers_for_request_load() {
    let value = run_one(Expression::call(
        "capacity_at",
        vec![
            Expression::rate("10000", "req", "s"),
            Expression::rate("450", "req", "s"),
            keyword("server"),
        ],
    ));
    assert_eq!(value.to_string(), "23 server");
}

#[test]
fn monthly_downtime_budget() {
    let value = run_one(Expression::call(
        "downtime",
        vec![Expression::number("99.9%"), keyword("month")],
    ));
    assert_eq!(value.to_string(), "43.2 minute");
}

#[test]
fn meters_plus_feet() {
    let value = run_one(Expression::arithmetic(
        Expression::quantity("10", "meters"),
        ArithmeticOperation::Add,
        Expression::quantity("5", "feet"),
    ));
    let Value::Quantity(quantity) = &value else {
        panic!("expected quantity, got {}", value.describe());
    };
    assert_eq!(quantity.unit, "meters");
    let expected = Decimal::from_str("11.524").unwrap();
    assert!((quantity.value - expected).abs() < Decimal::from_str("0.001").unwrap());
}

#[test]
fn boiling_point_in_fahrenheit() {
    let value = run_one(Expression::convert(
        Expression::quantity("100", "celsius"),
        "fahrenheit",
    ));
    let expected = Decimal::from(212);
    assert!((magnitude(&value) - expected).abs() < Decimal::from_str("0.5").unwrap());
}

#[test]
fn document_with_globals_and_exchange_rates() {
    let nodes = vec![
        Expression::frontmatter("global", "peak_rps", Expression::number("12k")),
        Expression::frontmatter("exchange", "USD_EUR", Expression::number("0.9")),
        Expression::assign(
            "servers",
            Expression::call(
                "capacity_at",
                vec![
                    Expression::rate("12000", "req", "s"),
                    Expression::rate("500", "req", "s"),
                    keyword("server"),
                    Expression::number("25%"),
                ],
            ),
        ),
        Expression::assign(
            "monthly",
            Expression::arithmetic(
                Expression::currency("40", "$"),
                ArithmeticOperation::Multiply,
                Expression::number("30"),
            ),
        ),
        Expression::convert(Expression::identifier("monthly"), "EUR"),
        Expression::arithmetic(
            Expression::identifier("peak_rps"),
            ArithmeticOperation::Divide,
            Expression::number("1000"),
        ),
    ];
    let rendered: Vec<String> = run(&nodes).iter().map(|v| v.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["12000", "0.9", "30 server", "$1200.00", "€1080.00", "12"]
    );
}

#[test]
fn transfer_and_storage_estimates_combine() {
    let nodes = vec![
        Expression::assign(
            "copy",
            Expression::call(
                "transfer_time",
                vec![
                    Expression::quantity("1", "GB"),
                    keyword("regional"),
                    keyword("10g"),
                ],
            ),
        ),
        Expression::assign(
            "load",
            Expression::call("read", vec![Expression::quantity("1", "GB"), keyword("ssd")]),
        ),
        Expression::arithmetic(
            Expression::identifier("copy"),
            ArithmeticOperation::Add,
            Expression::identifier("load"),
        ),
    ];
    let values = run(&nodes);
    let Value::Duration(total) = &values[2] else {
        panic!("expected duration, got {}", values[2].describe());
    };
    assert!(total.seconds().unwrap() > Decimal::ONE);
}

#[test]
fn ingest_rate_accumulates_over_a_day() {
    let value = run_one(Expression::arithmetic(
        Expression::rate("5", "MB", "s"),
        ArithmeticOperation::Multiply,
        Expression::duration("1", "day"),
    ));
    assert_eq!(value.to_string(), "432000 MB");
}

#[test]
fn napkin_rounds_final_answer() {
    let value = run_one(Expression::napkin(
        Expression::arithmetic(
            Expression::number("86400"),
            ArithmeticOperation::Multiply,
            Expression::number("365"),
        ),
        None,
    ));
    assert_eq!(value.to_string(), "32000000");
}

#[test]
fn evaluator_with_custom_limits_shares_environment() {
    let evaluator = Evaluator::with_limits(ResourceLimits {
        napkin_significant_figures: 3,
        ..ResourceLimits::default()
    });
    let mut env = Environment::new();
    evaluator
        .evaluate(&[Expression::assign("x", Expression::number("123456"))], &mut env)
        .unwrap();
    let values = evaluator
        .evaluate(&[Expression::napkin(Expression::identifier("x"), None)], &mut env)
        .unwrap();
    assert_eq!(values[0], Value::number(123000));
}
