//! Per-session state: variable bindings and exchange rates
//!
//! One Environment belongs to one evaluation session. Clone it to evaluate
//! speculatively (e.g. an editor re-running a document line by line).

use crate::semantic::Value;
use crate::{TallyError, TallyResult};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// Frontmatter namespace binding global variables
pub const GLOBAL_NAMESPACE: &str = "global";
/// Frontmatter namespace declaring exchange rates keyed `FROM_TO`
pub const EXCHANGE_NAMESPACE: &str = "exchange";

#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    variables: HashMap<String, Value>,
    /// `FROM_TO` → units of TO per one FROM
    exchange_rates: HashMap<String, Decimal>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an environment seeded with the `PI` and `E` constants.
    ///
    /// Both are rust_decimal's own constants, exact to 28 significant digits.
    pub fn new() -> Self {
        let mut variables = HashMap::new();
        variables.insert("PI".to_string(), Value::Number(Decimal::PI));
        variables.insert("E".to_string(), Value::Number(Decimal::E));
        Self {
            variables,
            exchange_rates: HashMap::new(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.variables.iter()
    }

    /// Record how many units of `to` one unit of `from` buys
    pub fn set_exchange_rate(&mut self, from: &str, to: &str, rate: Decimal) {
        let key = exchange_key(from, to);
        debug!(%key, %rate, "exchange rate set");
        self.exchange_rates.insert(key, rate);
    }

    /// The rate exactly as declared for `FROM_TO`
    pub fn get_exchange_rate(&self, from: &str, to: &str) -> Option<Decimal> {
        self.exchange_rates.get(&exchange_key(from, to)).copied()
    }

    /// Rate from `from` to `to`, falling back to the inverse of a `TO_FROM` declaration
    pub fn resolve_exchange_rate(&self, from: &str, to: &str) -> Option<Decimal> {
        if from.eq_ignore_ascii_case(to) {
            return Some(Decimal::ONE);
        }
        if let Some(rate) = self.get_exchange_rate(from, to) {
            return Some(rate);
        }
        self.get_exchange_rate(to, from)
            .filter(|inverse| !inverse.is_zero())
            .map(|inverse| Decimal::ONE / inverse)
    }

    /// Apply a frontmatter declaration from the `global` or `exchange` namespace
    pub fn apply_declaration(
        &mut self,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> TallyResult<()> {
        match namespace.trim().to_lowercase().as_str() {
            GLOBAL_NAMESPACE => {
                debug!(name = key, value = %value, "global declared");
                self.set(key.trim(), value);
                Ok(())
            }
            EXCHANGE_NAMESPACE => {
                let (from, to) = parse_exchange_key(key)?;
                let rate = match value {
                    Value::Number(rate) => rate,
                    other => {
                        return Err(TallyError::WrongArgumentType {
                            function: format!("exchange.{}", key),
                            position: 1,
                            expected: "a number".to_string(),
                            found: other.describe(),
                        })
                    }
                };
                if rate <= Decimal::ZERO {
                    return Err(TallyError::OutOfRange {
                        context: format!("exchange rate {}", key),
                        value: rate.to_string(),
                        range: "(0, ∞)".to_string(),
                    });
                }
                self.set_exchange_rate(from, to, rate);
                Ok(())
            }
            other => Err(TallyError::UnknownKeyword {
                kind: "frontmatter namespace".to_string(),
                keyword: other.to_string(),
                expected: format!("{}, {}", GLOBAL_NAMESPACE, EXCHANGE_NAMESPACE),
            }),
        }
    }
}

fn exchange_key(from: &str, to: &str) -> String {
    format!("{}_{}", from.trim().to_uppercase(), to.trim().to_uppercase())
}

/// Split `FROM_TO` into its two codes
pub fn parse_exchange_key(key: &str) -> TallyResult<(&str, &str)> {
    let parts: Vec<&str> = key.trim().split('_').collect();
    match parts.as_slice() {
        [from, to] if !from.is_empty() && !to.is_empty() => Ok((from, to)),
        _ => Err(TallyError::MalformedExchangeKey {
            key: key.to_string(),
        }),
    }
}
