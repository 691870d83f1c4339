//! # Tally Engine
//!
//! **Unit-aware napkin math**
//!
//! Tally evaluates parsed calculator expressions into typed, dimensionally
//! consistent values: numbers, currency amounts, physical quantities, rates,
//! durations, dates, times and booleans.
//!
//! ## Quick Start
//!
//! ```rust
//! use tally::{evaluate, Environment, Expression, TallyResult};
//!
//! fn main() -> TallyResult<()> {
//!     let mut env = Environment::new();
//!
//!     // 10 TB at 2 TB per disk
//!     let nodes = vec![Expression::call(
//!         "capacity_at",
//!         vec![
//!             Expression::quantity("10", "TB"),
//!             Expression::quantity("2", "TB"),
//!             Expression::identifier("disk"),
//!         ],
//!     )];
//!
//!     let values = evaluate(&nodes, &mut env)?;
//!     assert_eq!(values[0].to_string(), "5 disk");
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Values
//! Every expression evaluates to exactly one [`Value`]. Operations never
//! mutate a value; they build a new one.
//!
//! ### Units
//! Known units (meters, GB, celsius, ...) convert within their category
//! through the shared [`UnitRegistry`]. Any other unit is arbitrary and only
//! combines with itself. Mixed-unit arithmetic reports its result in the
//! left operand's unit.
//!
//! ### Environment
//! An [`Environment`] holds one session's variables and exchange rates.
//! Assignments and frontmatter declarations write to it.
//!
//! ### Precision
//! All arithmetic runs on 96-bit [`rust_decimal::Decimal`], which holds 28
//! significant digits. The seeded `PI` and `E` constants carry that full
//! precision and no more. Rendering rounds to 10 decimal places.

pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod napkin;
pub mod resource_limits;
pub mod semantic;
pub mod serializers;
pub mod units;

pub use ast::{
    ArithmeticOperation, ComparisonOperator, Expression, ExpressionKind, Span, UnaryOperator,
};
pub use environment::Environment;
pub use error::TallyError;
pub use evaluator::{evaluate, Evaluator};
pub use resource_limits::ResourceLimits;
pub use semantic::{Currency, Duration, DurationUnit, Quantity, Rate, TimeValue, Value};
pub use units::{Category, UnitRegistry};

/// Result type for Tally operations
pub type TallyResult<T> = Result<T, TallyError>;

#[cfg(test)]
mod tests;
