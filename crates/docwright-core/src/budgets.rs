use serde::{Deserialize, Serialize};

/// Process-wide numeric thresholds governing clustering splits, sub-agent
/// recursion, model response size, and recursion depth (spec.md §3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenBudgets {
    /// Clustering split trigger: a component set above this many tokens is
    /// handed to the Hierarchical Clusterer's LLM partition step.
    pub max_tokens_per_module: usize,
    /// Sub-agent recursion trigger: a complex module's combined component
    /// tokens above this threshold is documented by a recursively spawned
    /// agent rather than inline.
    pub max_tokens_per_leaf_module: usize,
    /// Hard cap on a single model response.
    pub max_output_tokens: usize,
    /// Hard cap on sub-agent nesting depth.
    pub max_recursion_depth: u32,
}

impl Default for TokenBudgets {
    fn default() -> Self {
        Self {
            max_tokens_per_module: 12_000,
            max_tokens_per_leaf_module: 16_000,
            max_output_tokens: 8_192,
            max_recursion_depth: 4,
        }
    }
}
