use serde::{Deserialize, Serialize};

/// Evaluator configuration and limits
///
/// Limits are generous enough for any hand-written document while keeping a
/// runaway tree from exhausting the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Maximum expression nesting depth
    /// Real usage: ~5 levels, Limit: 100 (20x)
    pub max_expression_depth: usize,

    /// Maximum number of nodes in one batch
    pub max_batch_size: usize,

    /// Significant figures used by napkin conversions that don't state their own
    pub napkin_significant_figures: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_expression_depth: 100,
            max_batch_size: 10_000,
            napkin_significant_figures: crate::napkin::DEFAULT_SIGNIFICANT_FIGURES,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }
}
