use crate::classify::is_complex_module;
use crate::context::SharedContext;
use crate::shape_repair::repair_tool_arguments;
use crate::tool::Tool;
use crate::tools::{GenerateSubModuleDocumentationTool, ReadCodeComponentsTool, StrReplaceEditorTool};
use docwright_core::{DocwrightError, ModuleNode, Result};
use docwright_llm::{FallbackChain, GenerationConfig, Message, ToolDefinition};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Hard cap on tool-call round trips within a single module invocation,
/// guarding against a model that never stops calling tools.
const MAX_AGENT_ITERATIONS: usize = 24;

/// Drives one tool-equipped model agent to completion for a single module
/// node, producing exactly one Markdown artifact (spec.md §4.4).
///
/// Held behind an `Arc` so `generate_sub_module_documentation` can recurse
/// back into a fresh invocation of the same runtime via a `Weak` handle,
/// without creating a reference cycle.
pub struct AgentRuntime {
    model: FallbackChain,
}

impl AgentRuntime {
    pub fn new(model: FallbackChain) -> Arc<Self> {
        Arc::new(Self { model })
    }

    pub async fn document_module(self: &Arc<Self>, node: &ModuleNode, ctx: SharedContext) -> Result<PathBuf> {
        let artifact_path = ctx.doc_dir.join(format!("{}.md", node.path));
        if artifact_path.exists() {
            tracing::info!(module = %node.name, path = %artifact_path.display(), "artifact already exists, skipping");
            return Ok(artifact_path);
        }

        let complex = is_complex_module(node, &ctx.registry);
        let tools = self.build_tools(complex);
        let tool_defs: Vec<ToolDefinition> = tools.iter().map(|t| t.to_definition()).collect();

        let mut messages = vec![
            Message::system(self.system_prompt(&ctx, complex)),
            Message::user(self.task_prompt(node, &ctx, &artifact_path)),
        ];

        let config = GenerationConfig {
            temperature: None,
            max_tokens: Some(ctx.budgets.max_output_tokens as u32),
        };

        for iteration in 0..MAX_AGENT_ITERATIONS {
            let response = self
                .model
                .generate_chat_with_tools(&messages, &tool_defs, &config)
                .await
                .map_err(|e| DocwrightError::Agent(format!("model call failed for module `{}`: {e}", node.name)))?;

            if !response.has_tool_calls() {
                messages.push(Message::assistant(response.content));
                break;
            }

            messages.push(Message::assistant(response.content.clone()));
            for call in &response.tool_calls {
                let mut arguments: Value = serde_json::from_str(&call.arguments).unwrap_or(Value::Null);
                repair_tool_arguments(&mut arguments, &call.name);

                let result = match tools.iter().find(|t| t.name() == call.name) {
                    Some(tool) => tool.execute(arguments, &ctx).await,
                    None => crate::tool::ToolResult::error(format!("unknown tool: {}", call.name)),
                };
                messages.push(Message::tool_result(call.id.clone(), result.to_content_string()));
            }

            if iteration + 1 == MAX_AGENT_ITERATIONS {
                tracing::warn!(module = %node.name, "agent reached the iteration cap without finishing");
            }
        }

        if !artifact_path.exists() {
            return Err(DocwrightError::Agent(format!(
                "agent finished without producing an artifact for module `{}`",
                node.name
            )));
        }
        Ok(artifact_path)
    }

    fn build_tools(self: &Arc<Self>, complex: bool) -> Vec<Arc<dyn Tool>> {
        let mut tools: Vec<Arc<dyn Tool>> = vec![Arc::new(ReadCodeComponentsTool), Arc::new(StrReplaceEditorTool)];
        if complex {
            tools.push(Arc::new(GenerateSubModuleDocumentationTool::new(Arc::downgrade(self))));
        }
        tools
    }

    fn system_prompt(&self, ctx: &SharedContext, complex: bool) -> String {
        let variant = if complex { "complex-module" } else { "leaf-module" };
        let mut prompt = format!(
            "You are the {variant} documentation agent in an automated codebase documentation pipeline. \
             You write exactly one Markdown artifact for the module you are given, using the tools \
             available to you to read source code and create or edit the file. {}\n\n\
             Documentation output directory: {}\n\
             Repository root: {}\n\
             Current module path: {}\n\
             Recursion depth: {} (max {})\n",
            ctx.doc_type.prompt_fragment(),
            ctx.doc_dir.display(),
            ctx.repo_root.display(),
            ctx.navigation_path,
            ctx.depth,
            ctx.max_depth,
        );
        if let Some(custom) = &ctx.custom_instructions {
            prompt.push_str(&format!("\nAdditional instructions: {custom}\n"));
        }
        prompt
    }

    fn task_prompt(&self, node: &ModuleNode, ctx: &SharedContext, artifact_path: &PathBuf) -> String {
        let component_lines: Vec<String> = node
            .components
            .iter()
            .filter_map(|id| ctx.registry.get(id))
            .map(|c| format!("- {} ({}) in {}", c.name, c.id, c.relative_path))
            .collect();
        let child_lines: Vec<String> = node.children.keys().cloned().collect();

        format!(
            "Write the documentation artifact for module `{}` to `{}`.\n\n\
             Components directly in this module:\n{}\n\n\
             Child modules: {}\n\n\
             Use `read_code_components` to inspect source before writing. Use `str_replace_editor` \
             with command `create` to write the artifact. When the artifact is complete, respond \
             with a short confirmation and make no further tool calls.",
            node.name,
            artifact_path.display(),
            if component_lines.is_empty() { "(none)".to_string() } else { component_lines.join("\n") },
            if child_lines.is_empty() { "(none)".to_string() } else { child_lines.join(", ") },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docwright_core::{ComponentRegistry, EditHistory, TokenBudgets};
    use docwright_llm::{ChatResponse, ModelProvider, ToolCall};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct ScriptedProvider {
        step: AtomicUsize,
        artifact_path: PathBuf,
    }

    #[async_trait]
    impl ModelProvider for ScriptedProvider {
        async fn generate_chat(&self, _messages: &[Message], _config: &GenerationConfig) -> Result<ChatResponse> {
            unreachable!("runtime always calls generate_chat_with_tools")
        }

        async fn generate_chat_with_tools(
            &self,
            _messages: &[Message],
            _tools: &[ToolDefinition],
            _config: &GenerationConfig,
        ) -> Result<ChatResponse> {
            let step = self.step.fetch_add(1, Ordering::SeqCst);
            if step == 0 {
                Ok(ChatResponse {
                    content: String::new(),
                    tool_calls: vec![ToolCall {
                        id: "call-1".into(),
                        name: "str_replace_editor".into(),
                        arguments: serde_json::json!({
                            "command": "create",
                            "path": self.artifact_path.to_str().unwrap(),
                            "file_text": "# Module\n"
                        })
                        .to_string(),
                    }],
                    total_tokens: Some(10),
                })
            } else {
                Ok(ChatResponse {
                    content: "done".into(),
                    tool_calls: vec![],
                    total_tokens: Some(5),
                })
            }
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }
        fn model_name(&self) -> &str {
            "scripted"
        }
        fn context_window(&self) -> usize {
            8192
        }
    }

    fn base_ctx(doc_dir: PathBuf, repo_root: PathBuf, tree: Arc<ModuleNode>) -> SharedContext {
        SharedContext {
            doc_dir,
            repo_root,
            edit_history: Arc::new(EditHistory::new()),
            registry: Arc::new(ComponentRegistry::new()),
            navigation_path: "root".into(),
            module_tree: tree,
            depth: 0,
            max_depth: 4,
            budgets: TokenBudgets::default(),
            doc_type: docwright_core::DocType::default(),
            custom_instructions: None,
        }
    }

    #[tokio::test]
    async fn writes_artifact_and_stops_when_model_finishes() {
        let doc_dir = tempdir().unwrap();
        let repo_root = tempdir().unwrap();
        let node = ModuleNode::leaf("m", "root/m", vec![]);
        let artifact_path = doc_dir.path().join("root/m.md");
        let ctx = base_ctx(doc_dir.path().to_path_buf(), repo_root.path().to_path_buf(), Arc::new(node.clone()));

        let provider = Arc::new(ScriptedProvider { step: AtomicUsize::new(0), artifact_path: artifact_path.clone() });
        let runtime = AgentRuntime::new(FallbackChain::new(vec![provider]));

        let result = runtime.document_module(&node, ctx).await.unwrap();
        assert_eq!(result, artifact_path);
        assert!(tokio::fs::metadata(&artifact_path).await.is_ok());
    }

    #[tokio::test]
    async fn skips_invocation_when_artifact_already_exists() {
        let doc_dir = tempdir().unwrap();
        let repo_root = tempdir().unwrap();
        let node = ModuleNode::leaf("m", "root/m", vec![]);
        tokio::fs::create_dir_all(doc_dir.path().join("root")).await.unwrap();
        let artifact_path = doc_dir.path().join("root/m.md");
        tokio::fs::write(&artifact_path, "already here").await.unwrap();
        let ctx = base_ctx(doc_dir.path().to_path_buf(), repo_root.path().to_path_buf(), Arc::new(node.clone()));

        struct PanicProvider;
        #[async_trait]
        impl ModelProvider for PanicProvider {
            async fn generate_chat(&self, _: &[Message], _: &GenerationConfig) -> Result<ChatResponse> {
                panic!("should not be called")
            }
            fn provider_name(&self) -> &str {
                "panic"
            }
            fn model_name(&self) -> &str {
                "panic"
            }
            fn context_window(&self) -> usize {
                8192
            }
        }
        let runtime = AgentRuntime::new(FallbackChain::new(vec![Arc::new(PanicProvider)]));

        let result = runtime.document_module(&node, ctx).await.unwrap();
        assert_eq!(result, artifact_path);
    }
}
