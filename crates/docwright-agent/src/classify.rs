use docwright_core::{ComponentRegistry, ModuleNode};
use std::collections::HashSet;

/// A module is "complex" when its components span more than one source
/// file; otherwise it is a "leaf module" documented by the smaller agent
/// variant (spec.md §4.4 "Agent selection").
pub fn is_complex_module(node: &ModuleNode, registry: &ComponentRegistry) -> bool {
    let files: HashSet<&str> = node
        .all_component_ids()
        .iter()
        .filter_map(|id| registry.get(id))
        .map(|c| c.relative_path.as_str())
        .collect();
    files.len() > 1
}

/// Sum of token counts across every component's captured source, used to
/// decide whether `generate_sub_module_documentation` should recurse
/// (spec.md §4.4 "Tool: generate_sub_module_documentation").
pub fn combined_token_count(node: &ModuleNode, registry: &ComponentRegistry) -> usize {
    node.all_component_ids()
        .iter()
        .filter_map(|id| registry.get(id))
        .filter_map(|c| c.source_code.as_deref())
        .map(docwright_llm::count_tokens)
        .sum()
}

/// Finds the node at `target_path` (the `ModuleNode::path` convention,
/// slash-joined from the root) anywhere in the tree rooted at `node`.
pub fn find_by_path<'a>(node: &'a ModuleNode, target_path: &str) -> Option<&'a ModuleNode> {
    if node.path == target_path {
        return Some(node);
    }
    node.children.values().find_map(|child| find_by_path(child, target_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwright_core::{Component, ComponentKind, Language};

    fn component(id: &str, path: &str) -> Component {
        Component::new(id, id, ComponentKind::Class, path, path, 1, 1, Language::Python)
    }

    #[test]
    fn single_file_module_is_not_complex() {
        let mut registry = ComponentRegistry::new();
        registry.insert("a.Foo".into(), component("a.Foo", "a.py"));
        registry.insert("a.Bar".into(), component("a.Bar", "a.py"));
        let node = ModuleNode::leaf("m", "root/m", vec!["a.Foo".into(), "a.Bar".into()]);
        assert!(!is_complex_module(&node, &registry));
    }

    #[test]
    fn multi_file_module_is_complex() {
        let mut registry = ComponentRegistry::new();
        registry.insert("a.Foo".into(), component("a.Foo", "a.py"));
        registry.insert("b.Bar".into(), component("b.Bar", "b.py"));
        let node = ModuleNode::leaf("m", "root/m", vec!["a.Foo".into(), "b.Bar".into()]);
        assert!(is_complex_module(&node, &registry));
    }

    #[test]
    fn finds_nested_node_by_path() {
        let mut root = ModuleNode::leaf("root", "root", vec![]);
        root.children.insert("a".into(), ModuleNode::leaf("a", "root/a", vec![]));
        assert!(find_by_path(&root, "root/a").is_some());
        assert!(find_by_path(&root, "root/missing").is_none());
    }
}
