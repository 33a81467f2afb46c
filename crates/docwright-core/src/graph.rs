use crate::component::{Component, ComponentId};
use std::collections::{HashMap, HashSet};

/// Mapping `component_id -> set<component_id>`, natural direction: `A -> B`
/// means A depends on B. Derived from `Component.depends_on` restricted to
/// known ids (spec.md §3).
pub type DependencyGraph = HashMap<ComponentId, HashSet<ComponentId>>;

/// The read-only, post-build component registry shared by every downstream
/// stage (Hierarchical Clusterer, Agent Runtime, Documentation Orchestrator).
pub type ComponentRegistry = HashMap<ComponentId, Component>;
