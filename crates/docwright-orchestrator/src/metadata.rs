use docwright_core::{ComponentRegistry, ModuleNode, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Gross run statistics written once a run completes successfully
/// (spec.md §4.5 "Metadata emission").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub primary_model: String,
    pub generated_at: String,
    pub commit: Option<String>,
    pub total_components: usize,
    pub max_depth: u32,
    pub files_analyzed: usize,
}

impl RunMetadata {
    pub fn new(
        primary_model: impl Into<String>,
        generated_at: impl Into<String>,
        commit: Option<String>,
        registry: &ComponentRegistry,
        module_tree: &ModuleNode,
    ) -> Self {
        let files_analyzed: HashSet<&str> = registry.values().map(|c| c.relative_path.as_str()).collect();
        Self {
            primary_model: primary_model.into(),
            generated_at: generated_at.into(),
            commit,
            total_components: registry.len(),
            max_depth: tree_depth(module_tree),
            files_analyzed: files_analyzed.len(),
        }
    }

    pub async fn write(&self, path: &Path) -> Result<()> {
        let body = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, body).await?;
        Ok(())
    }
}

fn tree_depth(node: &ModuleNode) -> u32 {
    node.children.values().map(tree_depth).max().map_or(0, |d| d + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwright_core::{Component, ComponentKind, Language};
    use tempfile::tempdir;

    #[test]
    fn computes_depth_and_file_count() {
        let mut registry = ComponentRegistry::new();
        registry.insert(
            "a.Foo".into(),
            Component::new("a.Foo", "Foo", ComponentKind::Class, "a.py", "a.py", 1, 1, Language::Python),
        );
        let mut root = ModuleNode::leaf("root", "root", vec![]);
        let mut mid = ModuleNode::leaf("mid", "root/mid", vec![]);
        mid.children.insert("leaf".into(), ModuleNode::leaf("leaf", "root/mid/leaf", vec!["a.Foo".into()]));
        root.children.insert("mid".into(), mid);

        let metadata = RunMetadata::new("gpt-test", "2026-01-01T00:00:00Z", None, &registry, &root);
        assert_eq!(metadata.max_depth, 2);
        assert_eq!(metadata.files_analyzed, 1);
        assert_eq!(metadata.total_components, 1);
    }

    #[tokio::test]
    async fn writes_json_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        let registry = ComponentRegistry::new();
        let root = ModuleNode::leaf("root", "root", vec![]);
        let metadata = RunMetadata::new("gpt-test", "2026-01-01T00:00:00Z", Some("abc123".into()), &registry, &root);
        metadata.write(&path).await.unwrap();
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(contents.contains("gpt-test"));
        assert!(contents.contains("abc123"));
    }
}
