use docwright_core::{ComponentRegistry, DocType, EditHistory, ModuleNode, TokenBudgets};
use std::path::PathBuf;
use std::sync::Arc;

/// Injected into every tool call (spec.md §4.4 "Shared dependency context").
///
/// Cloning is cheap: everything shared across tool invocations within one
/// run is behind an `Arc`.
#[derive(Clone)]
pub struct SharedContext {
    pub doc_dir: PathBuf,
    pub repo_root: PathBuf,
    pub edit_history: Arc<EditHistory>,
    pub registry: Arc<ComponentRegistry>,
    pub navigation_path: String,
    pub module_tree: Arc<ModuleNode>,
    pub depth: u32,
    pub max_depth: u32,
    pub budgets: TokenBudgets,
    pub doc_type: DocType,
    pub custom_instructions: Option<String>,
}

impl SharedContext {
    pub fn for_child(&self, navigation_path: String, depth: u32) -> Self {
        Self {
            navigation_path,
            depth,
            ..self.clone()
        }
    }
}
