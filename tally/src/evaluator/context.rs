//! Evaluation context
//!
//! Everything a single tree-walk needs: the session environment, the shared
//! unit registry, configured limits and the current nesting depth.

use crate::{Environment, ResourceLimits, TallyError, TallyResult, UnitRegistry};

pub struct EvaluationContext<'a> {
    /// Session state; mutated by assignments and frontmatter declarations
    pub env: &'a mut Environment,

    /// Read-only unit table shared across sessions
    pub registry: &'a UnitRegistry,

    pub limits: &'a ResourceLimits,

    depth: usize,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        env: &'a mut Environment,
        registry: &'a UnitRegistry,
        limits: &'a ResourceLimits,
    ) -> Self {
        Self {
            env,
            registry,
            limits,
            depth: 0,
        }
    }

    /// Descend one level, failing once the configured depth is exceeded
    pub(crate) fn enter(&mut self) -> TallyResult<()> {
        self.depth += 1;
        if self.depth > self.limits.max_expression_depth {
            let actual = self.depth;
            self.depth -= 1;
            return Err(TallyError::ResourceLimitExceeded {
                limit_name: "max_expression_depth".to_string(),
                limit_value: self.limits.max_expression_depth.to_string(),
                actual_value: actual.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
