use crate::tarjan::strongly_connected_components;
use docwright_core::{ComponentId, DependencyGraph};

/// Removes one edge from every strongly-connected component of size > 1,
/// producing a DAG fit for topological operations (spec.md §4.2).
///
/// Heuristic (documented per spec.md's requirement that the choice be
/// explicit): within each cycle, the edge removed is the one that closes
/// the loop back to the first node discovered in that component — i.e.
/// `members.last() -> members[0]` if that edge exists in the graph,
/// otherwise the first within-component edge found whose target occurs
/// earlier in `members` than its source. This is simple and stable but
/// not guaranteed minimum-edge-removal; a smarter heuristic is future work.
pub fn resolve_cycles(mut graph: DependencyGraph) -> (DependencyGraph, usize) {
    let sccs = strongly_connected_components(&graph);
    let mut cycles_broken = 0;

    for members in sccs.into_iter().filter(|c| c.len() > 1) {
        if let Some((from, to)) = pick_edge_to_remove(&graph, &members) {
            if let Some(targets) = graph.get_mut(&from) {
                targets.remove(&to);
            }
            cycles_broken += 1;
            tracing::warn!(cycle = ?members, removed_edge = %format!("{from} -> {to}"), "broke dependency cycle");
        }
    }

    (graph, cycles_broken)
}

fn pick_edge_to_remove(graph: &DependencyGraph, members: &[ComponentId]) -> Option<(ComponentId, ComponentId)> {
    let last = members.last()?;
    let first = members.first()?;
    if graph.get(last).map(|t| t.contains(first)).unwrap_or(false) {
        return Some((last.clone(), first.clone()));
    }

    for (source_idx, source) in members.iter().enumerate() {
        let Some(targets) = graph.get(source) else { continue };
        for (target_idx, target) in members.iter().enumerate() {
            if target_idx < source_idx && targets.contains(target) {
                return Some((source.clone(), target.clone()));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topo::topological_sort;
    use std::collections::HashSet;

    #[test]
    fn breaks_a_three_node_cycle_into_a_valid_dag() {
        let mut graph = DependencyGraph::new();
        graph.insert("A".into(), HashSet::from(["B".to_string()]));
        graph.insert("B".into(), HashSet::from(["C".to_string()]));
        graph.insert("C".into(), HashSet::from(["A".to_string()]));

        let (resolved, broken) = resolve_cycles(graph);
        assert_eq!(broken, 1);

        let sccs = strongly_connected_components(&resolved);
        assert!(sccs.iter().all(|c| c.len() == 1));

        let order = topological_sort(&resolved);
        assert_eq!(order.len(), 3);
    }
}
