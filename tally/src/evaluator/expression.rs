//! Expression evaluation
//!
//! Recursively evaluates a tree to a single Value. Assignments and
//! frontmatter declarations write to the environment as a side effect.

use super::context::EvaluationContext;
use super::{conversion, literals, operations};
use crate::{functions, napkin, Expression, ExpressionKind, TallyError, TallyResult, Value};

/// Evaluate one node, tracking nesting depth
pub fn evaluate_expression(
    expr: &Expression,
    context: &mut EvaluationContext,
) -> TallyResult<Value> {
    context.enter()?;
    let result = evaluate_kind(expr, context);
    context.leave();
    result
}

fn evaluate_kind(expr: &Expression, context: &mut EvaluationContext) -> TallyResult<Value> {
    match &expr.kind {
        ExpressionKind::NumberLiteral(text) => literals::parse_number(text).map(Value::Number),
        ExpressionKind::CurrencyLiteral { amount, currency } => {
            literals::parse_currency(amount, currency).map(Value::Currency)
        }
        ExpressionKind::BooleanLiteral(text) => literals::parse_boolean(text)
            .map(Value::Boolean)
            .ok_or_else(|| TallyError::invalid_literal("boolean", text.as_str())),
        ExpressionKind::DateLiteral(text) => literals::parse_date(text).map(Value::Date),
        ExpressionKind::TimeLiteral(text) => literals::parse_time(text).map(Value::Time),
        ExpressionKind::DurationLiteral { amount, unit } => {
            literals::parse_duration(amount, unit).map(Value::Duration)
        }
        ExpressionKind::QuantityLiteral { amount, unit } => literals::parse_quantity(amount, unit),
        ExpressionKind::RateLiteral {
            amount,
            unit,
            per_unit,
        } => literals::parse_rate(amount, unit, per_unit).map(Value::Rate),

        ExpressionKind::Identifier(name) => resolve_identifier(name, context),

        ExpressionKind::Assignment { name, value } => {
            let value = evaluate_expression(value, context)?;
            context.env.set(name.as_str(), value.clone());
            Ok(value)
        }

        ExpressionKind::Arithmetic(left, op, right) => {
            let left = evaluate_expression(left, context)?;
            let right = evaluate_expression(right, context)?;
            operations::arithmetic_operation(&left, *op, &right, context.env, context.registry)
        }

        ExpressionKind::Unary(op, operand) => {
            let operand = evaluate_expression(operand, context)?;
            operations::unary_operation(*op, &operand)
        }

        ExpressionKind::Comparison(left, op, right) => {
            let left = evaluate_expression(left, context)?;
            let right = evaluate_expression(right, context)?;
            operations::comparison_operation(&left, *op, &right).map(Value::Boolean)
        }

        ExpressionKind::UnitConversion(value, target) => {
            let value = evaluate_expression(value, context)?;
            conversion::convert_value(&value, target, context.env, context.registry)
        }

        ExpressionKind::PercentageOf { percentage, base } => {
            let percentage = evaluate_expression(percentage, context)?;
            let base = evaluate_expression(base, context)?;
            percentage_of(&percentage, &base)
        }

        ExpressionKind::NapkinConversion {
            value,
            significant_figures,
        } => {
            let value = evaluate_expression(value, context)?;
            let figures = significant_figures.unwrap_or(context.limits.napkin_significant_figures);
            napkin::round_value(&value, figures)
        }

        ExpressionKind::FunctionCall { name, args } => {
            functions::call_function(name, args, context)
        }

        ExpressionKind::Frontmatter {
            namespace,
            key,
            value,
        } => {
            let value = evaluate_expression(value, context)?;
            context.env.apply_declaration(namespace, key, value.clone())?;
            Ok(value)
        }
    }
}

/// Bound variables shadow the boolean keywords
fn resolve_identifier(name: &str, context: &EvaluationContext) -> TallyResult<Value> {
    if let Some(value) = context.env.get(name) {
        return Ok(value.clone());
    }
    literals::parse_boolean(name)
        .map(Value::Boolean)
        .ok_or_else(|| TallyError::UndefinedIdentifier {
            name: name.to_string(),
        })
}

/// `p of X`: the fraction `p` applied to X, keeping X's type
fn percentage_of(percentage: &Value, base: &Value) -> TallyResult<Value> {
    let fraction = match percentage {
        Value::Number(n) => *n,
        other => {
            return Err(TallyError::unsupported(
                "of",
                format!("{} and {}", other.describe(), base.describe()),
            ))
        }
    };
    let magnitude = base.magnitude().ok_or_else(|| {
        TallyError::unsupported("of", format!("{} and {}", percentage.describe(), base.describe()))
    })?;
    let scaled = magnitude
        .checked_mul(fraction)
        .ok_or_else(|| TallyError::overflow("percentage"))?;
    base.with_magnitude(scaled)
        .ok_or_else(|| TallyError::Internal(format!("{} has no magnitude", base.type_name())))
}
