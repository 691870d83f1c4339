//! Error taxonomy for the evaluation core
//!
//! Every error aborts the batch it occurs in. Messages carry the operator,
//! operand types or keyword involved so they can be shown without a trace.

use thiserror::Error;

/// Errors produced while evaluating expressions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TallyError {
    /// Identifier is neither a bound variable nor a boolean keyword
    #[error("Undefined identifier: '{name}'")]
    UndefinedIdentifier { name: String },

    /// Function call to a name the library does not know
    #[error("Unknown function: '{name}'")]
    UnknownFunction { name: String },

    #[error("Function '{function}' expects {expected} argument(s), got {found}")]
    WrongArgumentCount {
        function: String,
        expected: String,
        found: usize,
    },

    #[error("Function '{function}' argument {position}: expected {expected}, got {found}")]
    WrongArgumentType {
        function: String,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Division by zero in '{operator}'")]
    DivisionByZero { operator: String },

    /// A non-negative input was required (sqrt, sizes, buffers)
    #[error("{context} requires a non-negative value, got {value}")]
    NegativeValue { context: String, value: String },

    #[error("{context}: {value} is outside the allowed range {range}")]
    OutOfRange {
        context: String,
        value: String,
        range: String,
    },

    /// Units belong to different categories, or at least one is arbitrary
    #[error("Incompatible units: cannot convert '{from}' to '{to}'")]
    IncompatibleUnits { from: String, to: String },

    /// Two currency codes with no exchange rate between them
    #[error("Incompatible currencies: no exchange rate between {from} and {to}")]
    IncompatibleCurrencies { from: String, to: String },

    #[error("Unknown {kind} '{keyword}' (expected one of: {expected})")]
    UnknownKeyword {
        kind: String,
        keyword: String,
        expected: String,
    },

    /// Operator has no rule for the given operand types
    #[error("Unsupported operation: '{operator}' is not defined for {operands}")]
    UnsupportedOperation { operator: String, operands: String },

    #[error("Malformed exchange key '{key}': expected FROM_TO, e.g. USD_EUR")]
    MalformedExchangeKey { key: String },

    /// A literal payload handed over by the parser cannot be read
    #[error("Invalid {kind} literal: '{text}'")]
    InvalidLiteral { kind: String, text: String },

    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    #[error("Resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})")]
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
    },

    /// An evaluator invariant was broken; never caused by user input
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TallyError {
    pub(crate) fn unsupported(operator: impl Into<String>, operands: impl Into<String>) -> Self {
        TallyError::UnsupportedOperation {
            operator: operator.into(),
            operands: operands.into(),
        }
    }

    pub(crate) fn incompatible_units(from: impl Into<String>, to: impl Into<String>) -> Self {
        TallyError::IncompatibleUnits {
            from: from.into(),
            to: to.into(),
        }
    }

    pub(crate) fn invalid_literal(kind: impl Into<String>, text: impl Into<String>) -> Self {
        TallyError::InvalidLiteral {
            kind: kind.into(),
            text: text.into(),
        }
    }

    pub(crate) fn negative(context: impl Into<String>, value: impl ToString) -> Self {
        TallyError::NegativeValue {
            context: context.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn overflow(operation: impl Into<String>) -> Self {
        TallyError::Overflow {
            operation: operation.into(),
        }
    }
}
