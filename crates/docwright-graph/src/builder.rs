use crate::cycles::resolve_cycles;
use crate::leaves::identify_leaves;
use crate::resolution::resolve_edges;
use crate::topo::topological_sort;
use docwright_core::{CallEdge, Component, ComponentId, ComponentRegistry, DependencyGraph};
use std::collections::HashSet;

/// Everything the Graph Builder produces from one repository's aggregated
/// extraction output (spec.md §4.2). `graph` and `leaf_ids` are the
/// contract's return value; the rest is retained for persistence and
/// diagnostics.
pub struct GraphBuildResult {
    pub graph: DependencyGraph,
    pub leaf_ids: Vec<ComponentId>,
    pub registry: ComponentRegistry,
    pub resolved_edges: Vec<CallEdge>,
    pub cycles_broken: usize,
    pub topological_order: Vec<ComponentId>,
}

/// Builds the dependency graph from the Component Extractor's aggregated
/// output: resolves edges, amends each component's `depends_on`, assembles
/// the adjacency map, breaks cycles, and filters the leaf set.
pub fn build_graph(components: Vec<Component>, edges: Vec<CallEdge>) -> GraphBuildResult {
    let mut registry: ComponentRegistry = components.into_iter().map(|c| (c.id.clone(), c)).collect();
    let resolved_edges = resolve_edges(edges, &registry);

    for edge in &resolved_edges {
        if edge.resolved {
            if let Some(caller) = registry.get_mut(&edge.caller) {
                caller.depends_on.insert(edge.callee.clone());
            }
        }
    }

    let mut graph = DependencyGraph::new();
    for id in registry.keys() {
        graph.insert(id.clone(), HashSet::new());
    }
    for (id, component) in &registry {
        for dep in &component.depends_on {
            if registry.contains_key(dep) {
                graph.get_mut(id).unwrap().insert(dep.clone());
            }
        }
    }

    let (graph, cycles_broken) = resolve_cycles(graph);
    let leaf_ids = identify_leaves(&graph, &registry, &resolved_edges);
    let topological_order = topological_sort(&graph);

    GraphBuildResult {
        graph,
        leaf_ids,
        registry,
        resolved_edges,
        cycles_broken,
        topological_order,
    }
}
