use super::helpers::d;
use crate::{
    ArithmeticOperation, Environment, Evaluator, Expression, ResourceLimits, TallyError, Value,
};

fn nested_sum(depth: usize) -> Expression {
    (0..depth).fold(Expression::number("1"), |acc, _| {
        Expression::arithmetic(acc, ArithmeticOperation::Add, Expression::number("1"))
    })
}

#[test]
fn test_default_limits() {
    let limits = ResourceLimits::default();
    assert_eq!(limits.max_expression_depth, 100);
    assert_eq!(limits.max_batch_size, 10_000);
    assert_eq!(limits.napkin_significant_figures, 2);
}

#[test]
fn test_limits_deserialize_with_defaults() {
    let limits: ResourceLimits = serde_json::from_str(r#"{"max_expression_depth": 8}"#).unwrap();
    assert_eq!(limits.max_expression_depth, 8);
    assert_eq!(limits.max_batch_size, 10_000);
}

#[test]
fn test_depth_limit() {
    let evaluator = Evaluator::with_limits(ResourceLimits {
        max_expression_depth: 10,
        ..ResourceLimits::default()
    });
    let mut env = Environment::new();

    let shallow = evaluator.evaluate_one(&nested_sum(5), &mut env).unwrap();
    assert_eq!(shallow, Value::number(6));

    let err = evaluator.evaluate_one(&nested_sum(20), &mut env).unwrap_err();
    assert!(matches!(
        err,
        TallyError::ResourceLimitExceeded { ref limit_name, .. } if limit_name == "max_expression_depth"
    ));
}

#[test]
fn test_batch_size_limit() {
    let evaluator = Evaluator::with_limits(ResourceLimits {
        max_batch_size: 2,
        ..ResourceLimits::default()
    });
    let mut env = Environment::new();
    let nodes = vec![
        Expression::assign("x", Expression::number("1")),
        Expression::number("2"),
        Expression::number("3"),
    ];
    let err = evaluator.evaluate(&nodes, &mut env).unwrap_err();
    assert!(matches!(err, TallyError::ResourceLimitExceeded { .. }));
    assert!(!env.has("x"));
}

#[test]
fn test_configured_napkin_precision() {
    let evaluator = Evaluator::with_limits(ResourceLimits {
        napkin_significant_figures: 3,
        ..ResourceLimits::default()
    });
    let mut env = Environment::new();
    let value = evaluator
        .evaluate_one(&Expression::napkin(Expression::number("123456"), None), &mut env)
        .unwrap();
    assert_eq!(value, Value::Number(d("123000")));
}
