//! Expression tree consumed from the parser
//!
//! Literal nodes carry their source text; the evaluator reads the payload.
//! The builder functions at the bottom are how front-ends and tests
//! assemble trees without going through a parser.

use std::fmt;

/// Span representing a location in source text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

/// A node of the expression tree with its optional source location
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Option<Span>,
}

/// The closed set of node kinds the evaluator understands
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// `name = value`
    Assignment {
        name: String,
        value: Box<Expression>,
    },
    Arithmetic(Box<Expression>, ArithmeticOperation, Box<Expression>),
    Unary(UnaryOperator, Box<Expression>),
    Comparison(Box<Expression>, ComparisonOperator, Box<Expression>),
    Identifier(String),
    /// `42`, `1.2k`, `20%`, `1,000`
    NumberLiteral(String),
    /// Amount plus symbol or code: (`12.50`, `$`) or (`100`, `EUR`)
    CurrencyLiteral {
        amount: String,
        currency: String,
    },
    BooleanLiteral(String),
    DateLiteral(String),
    TimeLiteral(String),
    DurationLiteral {
        amount: String,
        unit: String,
    },
    QuantityLiteral {
        amount: String,
        unit: String,
    },
    /// `100 MB/s` → amount `100`, unit `MB`, per_unit `s`
    RateLiteral {
        amount: String,
        unit: String,
        per_unit: String,
    },
    /// `X in Y`
    UnitConversion(Box<Expression>, String),
    /// `20% of X`
    PercentageOf {
        percentage: Box<Expression>,
        base: Box<Expression>,
    },
    /// `X in napkin`, optionally with an explicit number of significant figures
    NapkinConversion {
        value: Box<Expression>,
        significant_figures: Option<u32>,
    },
    FunctionCall {
        name: String,
        args: Vec<Expression>,
    },
    /// A frontmatter declaration such as `exchange.USD_EUR: 0.92`
    Frontmatter {
        namespace: String,
        key: String,
        value: Box<Expression>,
    },
}

/// Arithmetic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl ArithmeticOperation {
    /// Returns a human-readable name for the operation
    pub fn name(&self) -> &'static str {
        match self {
            ArithmeticOperation::Add => "addition",
            ArithmeticOperation::Subtract => "subtraction",
            ArithmeticOperation::Multiply => "multiplication",
            ArithmeticOperation::Divide => "division",
            ArithmeticOperation::Modulo => "modulo",
            ArithmeticOperation::Power => "exponentiation",
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    Plus,
}

impl fmt::Display for ArithmeticOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticOperation::Add => write!(f, "+"),
            ArithmeticOperation::Subtract => write!(f, "-"),
            ArithmeticOperation::Multiply => write!(f, "*"),
            ArithmeticOperation::Divide => write!(f, "/"),
            ArithmeticOperation::Modulo => write!(f, "%"),
            ArithmeticOperation::Power => write!(f, "^"),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::GreaterThan => write!(f, ">"),
            ComparisonOperator::LessThan => write!(f, "<"),
            ComparisonOperator::GreaterThanOrEqual => write!(f, ">="),
            ComparisonOperator::LessThanOrEqual => write!(f, "<="),
            ComparisonOperator::Equal => write!(f, "=="),
            ComparisonOperator::NotEqual => write!(f, "!="),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
            UnaryOperator::Plus => write!(f, "+"),
        }
    }
}

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        Self { kind, span: None }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self::new(ExpressionKind::NumberLiteral(text.into()))
    }

    pub fn boolean(text: impl Into<String>) -> Self {
        Self::new(ExpressionKind::BooleanLiteral(text.into()))
    }

    pub fn currency(amount: impl Into<String>, currency: impl Into<String>) -> Self {
        Self::new(ExpressionKind::CurrencyLiteral {
            amount: amount.into(),
            currency: currency.into(),
        })
    }

    pub fn date(text: impl Into<String>) -> Self {
        Self::new(ExpressionKind::DateLiteral(text.into()))
    }

    pub fn time(text: impl Into<String>) -> Self {
        Self::new(ExpressionKind::TimeLiteral(text.into()))
    }

    pub fn duration(amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(ExpressionKind::DurationLiteral {
            amount: amount.into(),
            unit: unit.into(),
        })
    }

    pub fn quantity(amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(ExpressionKind::QuantityLiteral {
            amount: amount.into(),
            unit: unit.into(),
        })
    }

    pub fn rate(
        amount: impl Into<String>,
        unit: impl Into<String>,
        per_unit: impl Into<String>,
    ) -> Self {
        Self::new(ExpressionKind::RateLiteral {
            amount: amount.into(),
            unit: unit.into(),
            per_unit: per_unit.into(),
        })
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(ExpressionKind::Identifier(name.into()))
    }

    pub fn assign(name: impl Into<String>, value: Expression) -> Self {
        Self::new(ExpressionKind::Assignment {
            name: name.into(),
            value: Box::new(value),
        })
    }

    pub fn arithmetic(left: Expression, op: ArithmeticOperation, right: Expression) -> Self {
        Self::new(ExpressionKind::Arithmetic(
            Box::new(left),
            op,
            Box::new(right),
        ))
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Self::new(ExpressionKind::Unary(op, Box::new(operand)))
    }

    pub fn comparison(left: Expression, op: ComparisonOperator, right: Expression) -> Self {
        Self::new(ExpressionKind::Comparison(
            Box::new(left),
            op,
            Box::new(right),
        ))
    }

    pub fn convert(value: Expression, target: impl Into<String>) -> Self {
        Self::new(ExpressionKind::UnitConversion(Box::new(value), target.into()))
    }

    pub fn percentage_of(percentage: Expression, base: Expression) -> Self {
        Self::new(ExpressionKind::PercentageOf {
            percentage: Box::new(percentage),
            base: Box::new(base),
        })
    }

    pub fn napkin(value: Expression, significant_figures: Option<u32>) -> Self {
        Self::new(ExpressionKind::NapkinConversion {
            value: Box::new(value),
            significant_figures,
        })
    }

    pub fn call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::FunctionCall {
            name: name.into(),
            args,
        })
    }

    pub fn frontmatter(
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: Expression,
    ) -> Self {
        Self::new(ExpressionKind::Frontmatter {
            namespace: namespace.into(),
            key: key.into(),
            value: Box::new(value),
        })
    }

    /// The bare word of an identifier node, used for keyword arguments
    pub fn as_keyword(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Assignment { name, value } => write!(f, "{} = {}", name, value),
            ExpressionKind::Arithmetic(left, op, right) => {
                write!(f, "{} {} {}", left, op, right)
            }
            ExpressionKind::Unary(op, operand) => write!(f, "{}{}", op, operand),
            ExpressionKind::Comparison(left, op, right) => {
                write!(f, "{} {} {}", left, op, right)
            }
            ExpressionKind::Identifier(name) => write!(f, "{}", name),
            ExpressionKind::NumberLiteral(text)
            | ExpressionKind::BooleanLiteral(text)
            | ExpressionKind::DateLiteral(text)
            | ExpressionKind::TimeLiteral(text) => write!(f, "{}", text),
            ExpressionKind::CurrencyLiteral { amount, currency } => {
                write!(f, "{} {}", amount, currency)
            }
            ExpressionKind::DurationLiteral { amount, unit }
            | ExpressionKind::QuantityLiteral { amount, unit } => write!(f, "{} {}", amount, unit),
            ExpressionKind::RateLiteral {
                amount,
                unit,
                per_unit,
            } => write!(f, "{} {}/{}", amount, unit, per_unit),
            ExpressionKind::UnitConversion(value, target) => write!(f, "{} in {}", value, target),
            ExpressionKind::PercentageOf { percentage, base } => {
                write!(f, "{} of {}", percentage, base)
            }
            ExpressionKind::NapkinConversion { value, .. } => write!(f, "{} in napkin", value),
            ExpressionKind::FunctionCall { name, args } => {
                let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", name, rendered.join(", "))
            }
            ExpressionKind::Frontmatter {
                namespace,
                key,
                value,
            } => write!(f, "{}.{}: {}", namespace, key, value),
        }
    }
}
