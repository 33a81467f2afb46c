use docwright_core::{CallEdge, ComponentId, ComponentKind, ComponentRegistry, DependencyGraph, Language};
use std::collections::HashSet;

const ERROR_LIKE_KEYWORDS: &[&str] = &["error", "exception", "failed", "invalid"];
const PRUNE_THRESHOLD: usize = 400;

/// Implements spec.md §4.2 "Leaf identification" end to end: raw leaf
/// computation plus every filtering rule, in the order the spec lists them.
pub fn identify_leaves(
    graph: &DependencyGraph,
    registry: &ComponentRegistry,
    edges: &[CallEdge],
) -> Vec<ComponentId> {
    let raw = raw_leaves(graph, registry);
    let has_go = registry.values().any(|c| c.language == Language::Go);
    let has_class_like = registry.values().any(|c| {
        matches!(
            c.kind,
            ComponentKind::Class | ComponentKind::Struct | ComponentKind::Interface | ComponentKind::Record
        )
    });

    let mut permitted: HashSet<&'static str> = ["class", "interface", "struct"].into_iter().collect();
    if has_go {
        permitted.insert("function");
        permitted.insert("method");
    }
    if !has_class_like {
        permitted.insert("function");
    }

    let mut filtered: Vec<ComponentId> = raw
        .into_iter()
        .filter(|id| {
            registry
                .get(id)
                .map(|c| permitted.contains(kind_tag(&c.kind)))
                .unwrap_or(false)
        })
        .map(|id| normalize_constructor(&id, registry))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    filtered.retain(|id| {
        registry
            .get(id)
            .map(|c| !is_error_like(&c.name))
            .unwrap_or(true)
    });

    if filtered.len() > PRUNE_THRESHOLD && !has_go {
        let referenced: HashSet<&str> = edges.iter().map(|e| e.callee.as_str()).collect();
        filtered.retain(|id| referenced.contains(id.as_str()));
    }

    filtered.sort();
    filtered
}

fn raw_leaves(graph: &DependencyGraph, registry: &ComponentRegistry) -> Vec<ComponentId> {
    let mut depended_upon: HashSet<&ComponentId> = HashSet::new();
    for targets in graph.values() {
        for target in targets {
            depended_upon.insert(target);
        }
    }
    registry
        .keys()
        .filter(|id| !depended_upon.contains(id))
        .cloned()
        .collect()
}

fn kind_tag(kind: &ComponentKind) -> &'static str {
    match kind {
        ComponentKind::Class => "class",
        ComponentKind::Interface => "interface",
        ComponentKind::Struct => "struct",
        ComponentKind::Function => "function",
        ComponentKind::Method => "method",
        _ => "other",
    }
}

fn is_error_like(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ERROR_LIKE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Redirects a constructor-kind leaf (`__init__`, or a method sharing its
/// enclosing class's name) to its enclosing class id, so the class itself
/// is credited as the leaf rather than its constructor (spec.md §4.2
/// "merge constructor entries... into their enclosing class").
fn normalize_constructor(id: &ComponentId, registry: &ComponentRegistry) -> ComponentId {
    let Some(component) = registry.get(id) else {
        return id.clone();
    };
    if component.kind != ComponentKind::Method {
        return id.clone();
    }
    let is_constructor = component.name == "__init__"
        || component
            .enclosing_class
            .as_ref()
            .and_then(|c| registry.get(c))
            .map(|owner| owner.name == component.name)
            .unwrap_or(false);

    if is_constructor {
        component.enclosing_class.clone().unwrap_or_else(|| id.clone())
    } else {
        id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwright_core::Component;

    fn make(id: &str, name: &str, kind: ComponentKind, language: Language) -> Component {
        Component::new(id, name, kind, "f", "f", 1, 1, language)
    }

    #[test]
    fn class_and_struct_are_default_leaf_kinds() {
        let mut registry = ComponentRegistry::new();
        registry.insert("m.Foo".into(), make("m.Foo", "Foo", ComponentKind::Class, Language::Python));
        let graph = DependencyGraph::from([("m.Foo".to_string(), HashSet::new())]);
        let leaves = identify_leaves(&graph, &registry, &[]);
        assert_eq!(leaves, vec!["m.Foo".to_string()]);
    }

    #[test]
    fn go_repository_admits_functions_and_methods() {
        let mut registry = ComponentRegistry::new();
        registry.insert("pkg.Do".into(), make("pkg.Do", "Do", ComponentKind::Function, Language::Go));
        let graph = DependencyGraph::from([("pkg.Do".to_string(), HashSet::new())]);
        let leaves = identify_leaves(&graph, &registry, &[]);
        assert_eq!(leaves, vec!["pkg.Do".to_string()]);
    }

    #[test]
    fn drops_error_like_names() {
        let mut registry = ComponentRegistry::new();
        registry.insert(
            "m.InvalidInput".into(),
            make("m.InvalidInput", "InvalidInput", ComponentKind::Class, Language::Python),
        );
        let graph = DependencyGraph::from([("m.InvalidInput".to_string(), HashSet::new())]);
        let leaves = identify_leaves(&graph, &registry, &[]);
        assert!(leaves.is_empty());
    }

    #[test]
    fn constructor_merges_into_enclosing_class() {
        let mut registry = ComponentRegistry::new();
        let class = make("m.Foo", "Foo", ComponentKind::Class, Language::Python);
        let mut ctor = make("m.Foo.__init__", "__init__", ComponentKind::Method, Language::Python);
        ctor.enclosing_class = Some("m.Foo".to_string());
        registry.insert("m.Foo".into(), class);
        registry.insert("m.Foo.__init__".into(), ctor);

        let mut graph = DependencyGraph::new();
        graph.insert("m.Foo".to_string(), HashSet::new());
        graph.insert("m.Foo.__init__".to_string(), HashSet::new());

        let leaves = identify_leaves(&graph, &registry, &[]);
        assert_eq!(leaves, vec!["m.Foo".to_string()]);
    }
}
