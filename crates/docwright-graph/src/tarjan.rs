use docwright_core::{ComponentId, DependencyGraph};
use std::collections::HashMap;

/// Tarjan's strongly-connected-components algorithm, O(V+E) (spec.md §4.2).
/// Returns every SCC, including singletons; callers report any SCC of size
/// greater than one as a cycle.
pub fn strongly_connected_components(graph: &DependencyGraph) -> Vec<Vec<ComponentId>> {
    let mut state = TarjanState::default();
    for node in graph.keys() {
        if !state.index.contains_key(node) {
            state.strong_connect(node, graph);
        }
    }
    state.components
}

#[derive(Default)]
struct TarjanState {
    index: HashMap<ComponentId, usize>,
    low_link: HashMap<ComponentId, usize>,
    on_stack: HashMap<ComponentId, bool>,
    stack: Vec<ComponentId>,
    next_index: usize,
    components: Vec<Vec<ComponentId>>,
}

impl TarjanState {
    /// Iterative to avoid stack overflow on deep call graphs; mirrors the
    /// recursive textbook algorithm via an explicit work stack of
    /// `(node, child_iterator_position)` frames.
    fn strong_connect(&mut self, start: &ComponentId, graph: &DependencyGraph) {
        let mut work: Vec<(ComponentId, usize)> = vec![(start.clone(), 0)];
        self.visit(start, graph);

        while let Some((node, mut child_idx)) = work.pop() {
            let neighbors: Vec<ComponentId> = graph
                .get(&node)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();

            let mut advanced = false;
            while child_idx < neighbors.len() {
                let child = &neighbors[child_idx];
                child_idx += 1;

                if !self.index.contains_key(child) {
                    self.visit(child, graph);
                    work.push((node.clone(), child_idx));
                    work.push((child.clone(), 0));
                    advanced = true;
                    break;
                } else if *self.on_stack.get(child).unwrap_or(&false) {
                    let child_index = self.index[child];
                    let entry = self.low_link.get_mut(&node).unwrap();
                    *entry = (*entry).min(child_index);
                }
            }

            if advanced {
                continue;
            }

            if child_idx >= neighbors.len() {
                if let Some(parent) = work.last().map(|(p, _)| p.clone()) {
                    let child_low = self.low_link[&node];
                    let parent_low = self.low_link.get_mut(&parent).unwrap();
                    *parent_low = (*parent_low).min(child_low);
                }

                if self.low_link[&node] == self.index[&node] {
                    let mut component = Vec::new();
                    loop {
                        let member = self.stack.pop().unwrap();
                        self.on_stack.insert(member.clone(), false);
                        let done = member == node;
                        component.push(member);
                        if done {
                            break;
                        }
                    }
                    self.components.push(component);
                }
            }
        }
    }

    fn visit(&mut self, node: &ComponentId, _graph: &DependencyGraph) {
        self.index.insert(node.clone(), self.next_index);
        self.low_link.insert(node.clone(), self.next_index);
        self.next_index += 1;
        self.stack.push(node.clone());
        self.on_stack.insert(node.clone(), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn edge_graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (from, to) in edges {
            graph.entry(from.to_string()).or_insert_with(HashSet::new).insert(to.to_string());
            graph.entry(to.to_string()).or_insert_with(HashSet::new);
        }
        graph
    }

    #[test]
    fn detects_a_three_node_cycle() {
        let graph = edge_graph(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let sccs = strongly_connected_components(&graph);
        let cyclic: Vec<&Vec<ComponentId>> = sccs.iter().filter(|c| c.len() > 1).collect();
        assert_eq!(cyclic.len(), 1);
        let mut members = cyclic[0].clone();
        members.sort();
        assert_eq!(members, vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    }

    #[test]
    fn acyclic_graph_has_only_singleton_components() {
        let graph = edge_graph(&[("A", "B"), ("B", "C")]);
        let sccs = strongly_connected_components(&graph);
        assert!(sccs.iter().all(|c| c.len() == 1));
    }
}
