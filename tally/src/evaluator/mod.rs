//! Evaluation engine
//!
//! Evaluates a batch of expression trees against one Environment:
//! 1. Check the batch against the configured limits
//! 2. Walk each tree in order, sharing the Environment between nodes
//! 3. Collect one Value per node, aborting the batch on the first error

pub mod context;
pub mod conversion;
pub mod datetime;
pub mod expression;
pub mod literals;
pub mod operations;

use crate::{
    Environment, Expression, ResourceLimits, TallyError, TallyResult, UnitRegistry, Value,
};
use context::EvaluationContext;
use tracing::{debug, trace};

/// Evaluates expression trees
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    limits: ResourceLimits,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with custom limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Evaluate a batch of nodes in order.
    ///
    /// Every node yields exactly one Value. The first error aborts the whole
    /// batch; callers wanting per-line isolation evaluate one node at a time.
    pub fn evaluate(
        &self,
        nodes: &[Expression],
        env: &mut Environment,
    ) -> TallyResult<Vec<Value>> {
        if nodes.len() > self.limits.max_batch_size {
            return Err(TallyError::ResourceLimitExceeded {
                limit_name: "max_batch_size".to_string(),
                limit_value: self.limits.max_batch_size.to_string(),
                actual_value: nodes.len().to_string(),
            });
        }

        debug!(nodes = nodes.len(), "evaluating batch");
        let mut context = EvaluationContext::new(env, UnitRegistry::global(), &self.limits);
        let mut results = Vec::with_capacity(nodes.len());

        for (index, node) in nodes.iter().enumerate() {
            let value = expression::evaluate_expression(node, &mut context).map_err(|error| {
                debug!(index, %error, "batch aborted");
                error
            })?;
            trace!(index, %value, "node evaluated");
            results.push(value);
        }

        Ok(results)
    }

    /// Evaluate a single node
    pub fn evaluate_one(&self, node: &Expression, env: &mut Environment) -> TallyResult<Value> {
        let mut context = EvaluationContext::new(env, UnitRegistry::global(), &self.limits);
        expression::evaluate_expression(node, &mut context)
    }
}

/// Evaluate a batch with default limits
pub fn evaluate(nodes: &[Expression], env: &mut Environment) -> TallyResult<Vec<Value>> {
    Evaluator::new().evaluate(nodes, env)
}
