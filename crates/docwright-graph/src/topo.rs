use docwright_core::{ComponentId, DependencyGraph};
use std::collections::{HashMap, VecDeque};

/// Kahn's algorithm over a cycle-resolved graph (spec.md §4.2). If the sort
/// yields fewer nodes than the graph (an undetected cycle slipped through),
/// falls back to the graph's arbitrary key order and logs a warning rather
/// than aborting.
pub fn topological_sort(graph: &DependencyGraph) -> Vec<ComponentId> {
    let mut in_degree: HashMap<ComponentId, usize> = graph.keys().map(|k| (k.clone(), 0)).collect();
    for targets in graph.values() {
        for target in targets {
            *in_degree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    // Deterministic regardless of HashMap iteration order.
    let mut initial: Vec<ComponentId> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(id, _)| id.clone())
        .collect();
    initial.sort();
    let mut queue: VecDeque<ComponentId> = initial.into();

    let mut order = Vec::new();
    while let Some(node) = queue.pop_front() {
        order.push(node.clone());
        if let Some(targets) = graph.get(&node) {
            let mut newly_ready: Vec<ComponentId> = Vec::new();
            for target in targets {
                let deg = in_degree.get_mut(target).unwrap();
                *deg -= 1;
                if *deg == 0 {
                    newly_ready.push(target.clone());
                }
            }
            newly_ready.sort();
            for n in newly_ready {
                queue.push_back(n);
            }
        }
    }

    if order.len() < graph.len() {
        tracing::warn!(
            sorted = order.len(),
            total = graph.len(),
            "topological sort left nodes unordered, falling back to arbitrary order"
        );
        let mut remaining: Vec<ComponentId> = graph.keys().filter(|k| !order.contains(k)).cloned().collect();
        remaining.sort();
        order.extend(remaining);
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sorts_a_linear_chain() {
        let mut graph = DependencyGraph::new();
        graph.insert("A".into(), HashSet::from(["B".to_string()]));
        graph.insert("B".into(), HashSet::from(["C".to_string()]));
        graph.insert("C".into(), HashSet::new());

        let order = topological_sort(&graph);
        assert_eq!(order, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    }

    #[test]
    fn falls_back_on_residual_cycle_without_panicking() {
        let mut graph = DependencyGraph::new();
        graph.insert("A".into(), HashSet::from(["B".to_string()]));
        graph.insert("B".into(), HashSet::from(["A".to_string()]));

        let order = topological_sort(&graph);
        assert_eq!(order.len(), 2);
    }
}
