use crate::context::SharedContext;
use docwright_llm::ToolDefinition;
use serde_json::Value;

/// Outcome of a single tool invocation. `Error` is reported back to the
/// model as the tool's result content, not surfaced as a run failure — only
/// an `ErrAgent` raised by the runtime itself aborts the module (spec.md
/// §4.4).
#[derive(Debug, Clone)]
pub enum ToolResult {
    Text(String),
    Error(String),
}

impl ToolResult {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn to_content_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Error(e) => format!("Error: {e}"),
        }
    }
}

/// A capability offered to an agent invocation. Implement this to add a
/// tool; the runtime picks the tool set per agent variant (spec.md §4.4
/// "Agent selection").
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    async fn execute(&self, args: Value, ctx: &SharedContext) -> ToolResult;

    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.input_schema(),
        }
    }
}
