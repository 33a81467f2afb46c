use crate::prompt::{assemble_prompt_body, CLUSTER_PROMPT_PREAMBLE};
use crate::response::parse_partition;
use docwright_core::{ComponentId, ComponentRegistry, ModuleNode, TokenBudgets};
use docwright_llm::{count_tokens, FallbackChain, GenerationConfig, Message};
use futures::future::BoxFuture;
use std::collections::HashSet;

/// Partitions a leaf-id set into a `ModuleNode` tree, splitting only when
/// the prompt for a node exceeds `TokenBudgets::max_tokens_per_module`
/// (spec.md §4.3). Stateless across invocations beyond the read-only
/// registry it borrows.
pub struct Clusterer<'a> {
    registry: &'a ComponentRegistry,
    budgets: &'a TokenBudgets,
    model: &'a FallbackChain,
}

impl<'a> Clusterer<'a> {
    pub fn new(registry: &'a ComponentRegistry, budgets: &'a TokenBudgets, model: &'a FallbackChain) -> Self {
        Self { registry, budgets, model }
    }

    pub async fn cluster(&self, leaf_ids: Vec<ComponentId>) -> ModuleNode {
        self.cluster_at("root".to_string(), "root".to_string(), leaf_ids, 0).await
    }

    fn cluster_at(
        &self,
        name: String,
        path: String,
        leaf_ids: Vec<ComponentId>,
        depth: u32,
    ) -> BoxFuture<'_, ModuleNode> {
        Box::pin(async move {
            if leaf_ids.is_empty() {
                return ModuleNode::leaf(name, path, leaf_ids);
            }

            let prompt_body = assemble_prompt_body(&leaf_ids, self.registry);
            let tokens = count_tokens(&prompt_body);

            if tokens <= self.budgets.max_tokens_per_module || depth >= self.budgets.max_recursion_depth {
                return ModuleNode::leaf(name, path, leaf_ids);
            }

            let messages = vec![Message::system(CLUSTER_PROMPT_PREAMBLE), Message::user(prompt_body)];
            let response = match self.model.generate_chat(&messages, &GenerationConfig::default()).await {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(module = %name, error = %e, "clustering model call failed, emitting single leaf module");
                    return ModuleNode::leaf(name, path, leaf_ids);
                }
            };

            let Some(partition) = parse_partition(&response.content) else {
                tracing::warn!(module = %name, "clustering response malformed or empty, emitting single leaf module");
                return ModuleNode::leaf(name, path, leaf_ids);
            };

            let leaf_set: HashSet<&ComponentId> = leaf_ids.iter().collect();
            let mut assigned: HashSet<ComponentId> = HashSet::new();
            let mut validated: Vec<(String, Vec<ComponentId>)> = Vec::new();

            let mut entries: Vec<(String, Vec<String>)> = partition.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            for (module_name, members) in entries {
                let mut kept = Vec::new();
                for id in members {
                    if !self.registry.contains_key(&id) {
                        tracing::warn!(id = %id, "clustering response named unknown component, dropping");
                        continue;
                    }
                    if !leaf_set.contains(&id) {
                        continue;
                    }
                    if assigned.contains(&id) {
                        tracing::warn!(id = %id, module = %module_name, "component already placed by an earlier module, keeping first placement");
                        continue;
                    }
                    assigned.insert(id.clone());
                    kept.push(id);
                }
                if !kept.is_empty() {
                    validated.push((module_name, kept));
                }
            }

            let missing: Vec<ComponentId> = leaf_ids.iter().filter(|id| !assigned.contains(*id)).cloned().collect();
            if !missing.is_empty() {
                tracing::warn!(module = %name, count = missing.len(), "components missing from clustering response, assigning to Miscellaneous");
                validated.push(("Miscellaneous".to_string(), missing));
            }

            if validated.is_empty() {
                return ModuleNode::leaf(name, path, leaf_ids);
            }

            let mut node = ModuleNode::leaf(name, path.clone(), Vec::new());
            for (child_name, child_members) in validated {
                let child_path = format!("{path}/{child_name}");
                let child = self.cluster_at(child_name.clone(), child_path, child_members, depth + 1).await;
                node.children.insert(child_name, child);
            }
            node
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwright_core::{Component, ComponentKind, Language};
    use docwright_llm::{ChatResponse, ModelProvider};
    use std::sync::Arc;

    fn component(id: &str) -> Component {
        Component::new(id, id, ComponentKind::Class, "f.py", "f.py", 1, 1, Language::Python)
    }

    struct StaticProvider(&'static str);

    #[async_trait::async_trait]
    impl ModelProvider for StaticProvider {
        async fn generate_chat(
            &self,
            _messages: &[Message],
            _config: &GenerationConfig,
        ) -> docwright_core::Result<ChatResponse> {
            Ok(ChatResponse {
                content: self.0.to_string(),
                tool_calls: vec![],
                total_tokens: Some(1),
            })
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
    async fn small_input_stays_a_single_leaf_module_without_calling_the_model() {
        let mut registry = ComponentRegistry::new();
        registry.insert("a.Foo".into(), component("a.Foo"));
        let budgets = TokenBudgets::default();
        let model = FallbackChain::new(vec![]);
        let clusterer = Clusterer::new(&registry, &budgets, &model);

        let root = clusterer.cluster(vec!["a.Foo".to_string()]).await;
        assert!(root.is_leaf());
        assert_eq!(root.components, vec!["a.Foo".to_string()]);
    }

    #[tokio::test]
    async fn missing_components_land_in_miscellaneous() {
        let mut registry = ComponentRegistry::new();
        registry.insert("a.Foo".into(), component("a.Foo"));
        registry.insert("a.Bar".into(), component("a.Bar"));
        let mut budgets = TokenBudgets::default();
        budgets.max_tokens_per_module = 0;

        let model = FallbackChain::new(vec![Arc::new(StaticProvider(
            "<modules><module name=\"core\">\na.Foo\n</module></modules>",
        ))]);
        let clusterer = Clusterer::new(&registry, &budgets, &model);

        let root = clusterer.cluster(vec!["a.Foo".to_string(), "a.Bar".to_string()]).await;
        assert!(!root.is_leaf());
        assert!(root.children.contains_key("core"));
        assert!(root.children.contains_key("Miscellaneous"));
    }

    #[tokio::test]
    async fn malformed_response_falls_back_to_single_leaf() {
        let mut registry = ComponentRegistry::new();
        registry.insert("a.Foo".into(), component("a.Foo"));
        let mut budgets = TokenBudgets::default();
        budgets.max_tokens_per_module = 0;

        let model = FallbackChain::new(vec![Arc::new(StaticProvider("not a valid response"))]);
        let clusterer = Clusterer::new(&registry, &budgets, &model);

        let root = clusterer.cluster(vec!["a.Foo".to_string()]).await;
        assert!(root.is_leaf());
    }
}
