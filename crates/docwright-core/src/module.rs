use crate::component::ComponentId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node in the hierarchical partition tree produced by the Hierarchical
/// Clusterer.
///
/// `children` is an order-preserving map so that sibling disambiguation and
/// Markdown file layout are deterministic across runs given the same model
/// output. A node is a *leaf module* iff `children` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleNode {
    pub name: String,
    pub components: Vec<ComponentId>,
    #[serde(default)]
    pub children: IndexMap<String, ModuleNode>,
    /// Slash-joined path from the root, used to derive this node's output
    /// artifact path (e.g. `"root/auth/session"`).
    pub path: String,
}

impl ModuleNode {
    pub fn leaf(name: impl Into<String>, path: impl Into<String>, components: Vec<ComponentId>) -> Self {
        Self {
            name: name.into(),
            components,
            children: IndexMap::new(),
            path: path.into(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// All component ids assigned anywhere in this subtree (this node's own
    /// components plus every descendant's).
    pub fn all_component_ids(&self) -> Vec<ComponentId> {
        let mut ids = self.components.clone();
        for child in self.children.values() {
            ids.extend(child.all_component_ids());
        }
        ids
    }

    /// Depth-first, post-order (leaf-first) traversal: invokes `visit` on
    /// every child before invoking it on `self`, matching the
    /// Documentation Orchestrator's dynamic-programming traversal order.
    pub fn visit_post_order<'a>(&'a self, visit: &mut dyn FnMut(&'a ModuleNode)) {
        for child in self.children.values() {
            child.visit_post_order(visit);
        }
        visit(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_order_visits_children_before_parent() {
        let mut root = ModuleNode::leaf("root", "root", vec![]);
        let child_a = ModuleNode::leaf("a", "root/a", vec!["x".into()]);
        let child_b = ModuleNode::leaf("b", "root/b", vec!["y".into()]);
        root.children.insert("a".into(), child_a);
        root.children.insert("b".into(), child_b);

        let mut order = Vec::new();
        root.visit_post_order(&mut |node| order.push(node.name.clone()));

        assert_eq!(order, vec!["a", "b", "root"]);
    }

    #[test]
    fn all_component_ids_includes_descendants() {
        let mut root = ModuleNode::leaf("root", "root", vec!["r".into()]);
        root.children
            .insert("a".into(), ModuleNode::leaf("a", "root/a", vec!["x".into()]));
        let mut ids = root.all_component_ids();
        ids.sort();
        assert_eq!(ids, vec!["r".to_string(), "x".to_string()]);
    }
}
