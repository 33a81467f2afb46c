use crate::classify::{combined_token_count, find_by_path, is_complex_module};
use crate::context::SharedContext;
use crate::runtime::AgentRuntime;
use crate::tool::{Tool, ToolResult};
use serde_json::{json, Value};
use std::sync::Weak;

const INLINE_MESSAGE: &str = "Document this child module inline in the current artifact; \
it does not warrant a separate sub-agent invocation.";

/// Lets a complex-module agent delegate an oversized child to a freshly
/// spawned Agent Runtime invocation, or be told to document it inline
/// (spec.md §4.4 "Tool: generate_sub_module_documentation").
pub struct GenerateSubModuleDocumentationTool {
    runtime: Weak<AgentRuntime>,
}

impl GenerateSubModuleDocumentationTool {
    pub fn new(runtime: Weak<AgentRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait::async_trait]
impl Tool for GenerateSubModuleDocumentationTool {
    fn name(&self) -> &str {
        "generate_sub_module_documentation"
    }

    fn description(&self) -> &str {
        "Document a named child module, recursing into a sub-agent if it is large and complex \
         enough to warrant one, or returning inline-documentation guidance otherwise."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "child_module": { "type": "string", "description": "Name of the child module to document" }
            },
            "required": ["child_module"]
        })
    }

    async fn execute(&self, args: Value, ctx: &SharedContext) -> ToolResult {
        let Some(child_name) = args.get("child_module").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required parameter: child_module");
        };

        let child_path = format!("{}/{}", ctx.navigation_path, child_name);
        let Some(child) = find_by_path(&ctx.module_tree, &child_path) else {
            return ToolResult::error(format!("unknown child module: {child_name}"));
        };

        let complex = is_complex_module(child, &ctx.registry);
        let tokens = combined_token_count(child, &ctx.registry);
        let should_recurse =
            ctx.depth < ctx.max_depth && complex && tokens > ctx.budgets.max_tokens_per_leaf_module;

        if !should_recurse {
            return ToolResult::text(INLINE_MESSAGE);
        }

        let Some(runtime) = self.runtime.upgrade() else {
            return ToolResult::error("agent runtime is no longer available");
        };
        let child_ctx = ctx.for_child(child_path, ctx.depth + 1);
        match runtime.document_module(child, child_ctx).await {
            Ok(path) => ToolResult::text(format!("documented sub-module at {}", path.display())),
            Err(e) => ToolResult::error(format!("failed to document sub-module `{child_name}`: {e}")),
        }
    }
}
