use crate::{Environment, Evaluator, Expression, TallyResult, Value};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Evaluate a single node in a fresh environment
pub fn eval(node: Expression) -> TallyResult<Value> {
    let mut env = Environment::new();
    eval_in(node, &mut env)
}

pub fn eval_in(node: Expression, env: &mut Environment) -> TallyResult<Value> {
    Evaluator::new().evaluate_one(&node, env)
}

/// Evaluate and render
pub fn show(node: Expression) -> String {
    eval(node).unwrap().to_string()
}

pub fn kw(word: &str) -> Expression {
    Expression::identifier(word)
}
