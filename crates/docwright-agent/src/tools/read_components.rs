use crate::context::SharedContext;
use crate::tool::{Tool, ToolResult};
use serde_json::{json, Value};

/// Concatenates the `source_code` of each requested component id, headed by
/// its path and line range. Unknown ids produce a per-id error marker
/// rather than failing the whole call (spec.md §4.4 "Tool:
/// read_code_components").
pub struct ReadCodeComponentsTool;

#[async_trait::async_trait]
impl Tool for ReadCodeComponentsTool {
    fn name(&self) -> &str {
        "read_code_components"
    }

    fn description(&self) -> &str {
        "Read the source code of one or more components by id, as assigned in the module tree."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Component ids to read"
                }
            },
            "required": ["ids"]
        })
    }

    async fn execute(&self, args: Value, ctx: &SharedContext) -> ToolResult {
        let Some(ids) = args.get("ids").and_then(|v| v.as_array()) else {
            return ToolResult::error("Missing required parameter: ids");
        };

        let mut out = String::new();
        for id_value in ids {
            let Some(id) = id_value.as_str() else {
                out.push_str("Error: id entries must be strings\n\n");
                continue;
            };
            match ctx.registry.get(id) {
                Some(component) => {
                    out.push_str(&format!(
                        "### {id} ({}:{}-{})\n",
                        component.relative_path, component.start_line, component.end_line
                    ));
                    out.push_str(component.source_code.as_deref().unwrap_or("<no source captured>"));
                    out.push_str("\n\n");
                }
                None => {
                    out.push_str(&format!("Error: unknown component id {id:?}\n\n"));
                }
            }
        }
        ToolResult::text(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwright_core::{Component, ComponentKind, ComponentRegistry, EditHistory, Language, ModuleNode, TokenBudgets};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn ctx(registry: ComponentRegistry) -> SharedContext {
        SharedContext {
            doc_dir: PathBuf::from("/docs"),
            repo_root: PathBuf::from("/repo"),
            edit_history: Arc::new(EditHistory::new()),
            registry: Arc::new(registry),
            navigation_path: "root".into(),
            module_tree: Arc::new(ModuleNode::leaf("root", "root", vec![])),
            depth: 0,
            max_depth: 4,
            budgets: TokenBudgets::default(),
            doc_type: docwright_core::DocType::default(),
            custom_instructions: None,
        }
    }

    #[tokio::test]
    async fn reads_known_component_source() {
        let mut registry = ComponentRegistry::new();
        registry.insert(
            "a.Foo".into(),
            Component::new("a.Foo", "Foo", ComponentKind::Class, "a.py", "a.py", 1, 3, Language::Python)
                .with_source("class Foo: pass"),
        );
        let tool = ReadCodeComponentsTool;
        let result = tool.execute(serde_json::json!({ "ids": ["a.Foo"] }), &ctx(registry)).await;
        assert!(result.to_content_string().contains("class Foo: pass"));
    }

    #[tokio::test]
    async fn unknown_id_produces_marker_not_failure() {
        let tool = ReadCodeComponentsTool;
        let result = tool
            .execute(serde_json::json!({ "ids": ["missing.Id"] }), &ctx(ComponentRegistry::new()))
            .await;
        assert!(!result.is_error());
        assert!(result.to_content_string().contains("unknown component id"));
    }
}
