use crate::metadata::RunMetadata;
use crate::synthesis::{
    module_overview_system_prompt, module_overview_user_prompt, repository_overview_system_prompt,
    repository_overview_user_prompt,
};
use docwright_agent::{AgentRuntime, SharedContext};
use docwright_core::{ComponentRegistry, DocType, DocwrightError, EditHistory, ModuleNode, Result, TokenBudgets};
use docwright_llm::{FallbackChain, GenerationConfig, Message};
use futures::future::{try_join_all, BoxFuture};
use std::path::PathBuf;
use std::sync::Arc;

/// Drives the whole module tree to a complete documentation directory:
/// leaf modules via the Agent Runtime, non-leaf modules via direct
/// overview-synthesis model calls, and the root via a repository-overview
/// call, writing a metadata artifact on success (spec.md §4.5).
pub struct Orchestrator {
    agent_runtime: Arc<AgentRuntime>,
    synthesis_model: FallbackChain,
    registry: Arc<ComponentRegistry>,
    doc_dir: PathBuf,
    repo_root: PathBuf,
    budgets: TokenBudgets,
    doc_type: DocType,
    custom_instructions: Option<String>,
    primary_model_name: String,
    commit: Option<String>,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agent_runtime: Arc<AgentRuntime>,
        synthesis_model: FallbackChain,
        registry: Arc<ComponentRegistry>,
        doc_dir: PathBuf,
        repo_root: PathBuf,
        budgets: TokenBudgets,
        doc_type: DocType,
        custom_instructions: Option<String>,
        primary_model_name: String,
        commit: Option<String>,
    ) -> Self {
        Self {
            agent_runtime,
            synthesis_model,
            registry,
            doc_dir,
            repo_root,
            budgets,
            doc_type,
            custom_instructions,
            primary_model_name,
            commit,
        }
    }

    pub async fn run(&self, module_tree: &ModuleNode) -> Result<RunMetadata> {
        let root_ctx = SharedContext {
            doc_dir: self.doc_dir.clone(),
            repo_root: self.repo_root.clone(),
            edit_history: Arc::new(EditHistory::new()),
            registry: self.registry.clone(),
            navigation_path: module_tree.path.clone(),
            module_tree: Arc::new(module_tree.clone()),
            depth: 0,
            max_depth: self.budgets.max_recursion_depth,
            budgets: self.budgets,
            doc_type: self.doc_type,
            custom_instructions: self.custom_instructions.clone(),
        };

        self.document_node(module_tree, root_ctx).await?;

        let metadata = RunMetadata::new(
            self.primary_model_name.clone(),
            chrono::Utc::now().to_rfc3339(),
            self.commit.clone(),
            &self.registry,
            module_tree,
        );
        metadata.write(&self.doc_dir.join("metadata.json")).await?;
        Ok(metadata)
    }

    fn document_node<'a>(&'a self, node: &'a ModuleNode, ctx: SharedContext) -> BoxFuture<'a, Result<PathBuf>> {
        Box::pin(async move {
            if node.is_leaf() {
                return self.agent_runtime.document_module(node, ctx).await;
            }

            let child_futures = node.children.iter().map(|(name, child)| {
                let child_path = format!("{}/{name}", ctx.navigation_path);
                let child_ctx = ctx.for_child(child_path, ctx.depth + 1);
                self.document_node(child, child_ctx)
            });
            let child_artifacts = try_join_all(child_futures).await?;

            let artifact_path = self.doc_dir.join(format!("{}.md", node.path));
            if artifact_path.exists() {
                tracing::info!(module = %node.name, "overview artifact already exists, skipping synthesis");
                return Ok(artifact_path);
            }

            let mut children_content = String::new();
            for child_path in &child_artifacts {
                let content = tokio::fs::read_to_string(child_path).await?;
                children_content.push_str(&content);
                children_content.push_str("\n\n");
            }

            let (system, user) = if ctx.depth == 0 {
                (repository_overview_system_prompt(&ctx), repository_overview_user_prompt(&children_content))
            } else {
                (module_overview_system_prompt(&ctx), module_overview_user_prompt(node, &children_content))
            };

            let response = self
                .synthesis_model
                .generate_chat(
                    &[Message::system(system), Message::user(user)],
                    &GenerationConfig { temperature: None, max_tokens: Some(self.budgets.max_output_tokens as u32) },
                )
                .await
                .map_err(|e| DocwrightError::Agent(format!("overview synthesis failed for module `{}`: {e}", node.name)))?;

            if let Some(parent) = artifact_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&artifact_path, &response.content).await?;
            Ok(artifact_path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docwright_core::{ComponentKind, Language};
    use docwright_llm::{ChatResponse, ModelProvider};
    use tempfile::tempdir;

    struct StaticProvider(&'static str);

    #[async_trait]
    impl ModelProvider for StaticProvider {
        async fn generate_chat(&self, _messages: &[Message], _config: &GenerationConfig) -> Result<ChatResponse> {
            Ok(ChatResponse { content: self.0.to_string(), tool_calls: vec![], total_tokens: Some(5) })
        }
        fn provider_name(&self) -> &str {
            "static"
        }
        fn model_name(&self) -> &str {
            "static"
        }
        fn context_window(&self) -> usize {
            8192
        }
    }

    #[tokio::test]
    async fn synthesizes_parent_from_child_artifacts() {
        let doc_dir = tempdir().unwrap();
        let repo_root = tempdir().unwrap();

        let mut registry = ComponentRegistry::new();
        registry.insert(
            "a.Foo".into(),
            docwright_core::Component::new("a.Foo", "Foo", ComponentKind::Class, "a.py", "a.py", 1, 1, Language::Python),
        );

        let mut root = ModuleNode::leaf("root", "root", vec![]);
        root.children.insert("leaf".into(), ModuleNode::leaf("leaf", "root/leaf", vec!["a.Foo".into()]));

        let leaf_provider = Arc::new(StaticProvider("done"));
        let synthesis_provider = Arc::new(StaticProvider("# Repository Overview\n"));

        let agent_runtime = AgentRuntime::new(FallbackChain::new(vec![leaf_provider]));
        let orchestrator = Orchestrator::new(
            agent_runtime,
            FallbackChain::new(vec![synthesis_provider]),
            Arc::new(registry),
            doc_dir.path().to_path_buf(),
            repo_root.path().to_path_buf(),
            TokenBudgets::default(),
            DocType::default(),
            None,
            "static".into(),
            None,
        );

        // Pre-create the leaf artifact since the scripted leaf agent (a
        // static text response with no tool calls) never writes a file.
        tokio::fs::create_dir_all(doc_dir.path().join("root")).await.unwrap();
        tokio::fs::write(doc_dir.path().join("root/leaf.md"), "# Leaf\n").await.unwrap();

        let metadata = orchestrator.run(&root).await.unwrap();
        assert_eq!(metadata.total_components, 1);

        let root_artifact = tokio::fs::read_to_string(doc_dir.path().join("root.md")).await.unwrap();
        assert_eq!(root_artifact, "# Repository Overview\n");
    }
}
