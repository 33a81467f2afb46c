use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Per-file stack of prior contents enabling single-step undo inside the
/// `str_replace_editor` tool. Scoped to one orchestrator run; a fresh
/// instance is created per run and never persisted.
#[derive(Default)]
pub struct EditHistory {
    stacks: Mutex<HashMap<PathBuf, Vec<String>>>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `previous_content` as the state to restore to if `path` is
    /// undone next.
    pub fn push(&self, path: &Path, previous_content: String) {
        self.stacks
            .lock()
            .entry(path.to_path_buf())
            .or_default()
            .push(previous_content);
    }

    /// Pop and return the most recent prior content for `path`, if any.
    pub fn pop(&self, path: &Path) -> Option<String> {
        let mut stacks = self.stacks.lock();
        let stack = stacks.get_mut(path)?;
        let prior = stack.pop();
        if stack.is_empty() {
            stacks.remove(path);
        }
        prior
    }

    pub fn has_history(&self, path: &Path) -> bool {
        self.stacks
            .lock()
            .get(path)
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }

    pub fn clear(&self) {
        self.stacks.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_restores_prior_content() {
        let history = EditHistory::new();
        let path = PathBuf::from("/docs/a.md");
        history.push(&path, "v1".to_string());
        history.push(&path, "v2".to_string());

        assert_eq!(history.pop(&path), Some("v2".to_string()));
        assert_eq!(history.pop(&path), Some("v1".to_string()));
        assert_eq!(history.pop(&path), None);
    }
}
