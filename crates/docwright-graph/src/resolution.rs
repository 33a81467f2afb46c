use docwright_core::{CallEdge, ComponentId, ComponentRegistry};
use std::collections::{HashMap, HashSet};

/// Resolves every unresolved [`CallEdge`] against the component registry
/// and deduplicates by `(caller, callee, kind)` (spec.md §4.2).
///
/// Edge resolution: (1) direct id match, (2) match by unqualified name.
/// Anything still unresolved is kept (for diagnostics) but never
/// contributes to `depends_on`.
pub fn resolve_edges(edges: Vec<CallEdge>, registry: &ComponentRegistry) -> Vec<CallEdge> {
    let unqualified_index = build_unqualified_index(registry);

    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for mut edge in edges {
        if !registry.contains_key(&edge.callee) {
            if let Some(candidates) = unqualified_index.get(unqualified_name(&edge.callee)) {
                if candidates.len() == 1 {
                    edge.callee = candidates[0].clone();
                    edge.resolved = true;
                } else {
                    edge.resolved = false;
                }
            } else {
                edge.resolved = false;
            }
        } else {
            edge.resolved = true;
        }

        let key = edge.dedup_key();
        if seen.insert(key) {
            resolved.push(edge);
        }
    }

    resolved
}

fn unqualified_name(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}

fn build_unqualified_index(registry: &ComponentRegistry) -> HashMap<&str, Vec<ComponentId>> {
    let mut index: HashMap<&str, Vec<ComponentId>> = HashMap::new();
    for id in registry.keys() {
        index.entry(unqualified_name(id)).or_default().push(id.clone());
    }
    index
}
