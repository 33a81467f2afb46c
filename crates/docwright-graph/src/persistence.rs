use docwright_core::{ComponentId, ComponentRegistry, DependencyGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// The single JSON artifact the Graph Builder persists (spec.md §4.2
/// "Output persistence", §6).
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphArtifact {
    pub graph: HashMap<ComponentId, Vec<ComponentId>>,
    pub registry: ComponentRegistry,
    pub leaf_ids: Vec<ComponentId>,
}

impl GraphArtifact {
    pub fn new(graph: &DependencyGraph, registry: ComponentRegistry, leaf_ids: Vec<ComponentId>) -> Self {
        let graph = graph
            .iter()
            .map(|(id, targets)| {
                let mut sorted: Vec<ComponentId> = targets.iter().cloned().collect();
                sorted.sort();
                (id.clone(), sorted)
            })
            .collect();
        Self {
            graph,
            registry,
            leaf_ids,
        }
    }

    pub fn write(&self, path: &Path) -> docwright_core::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn read(path: &Path) -> docwright_core::Result<Self> {
        let file = std::fs::File::open(path)?;
        let artifact = serde_json::from_reader(file)?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let graph = DependencyGraph::from([("a".to_string(), Default::default())]);
        let artifact = GraphArtifact::new(&graph, ComponentRegistry::new(), vec!["a".to_string()]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        artifact.write(&path).unwrap();

        let loaded = GraphArtifact::read(&path).unwrap();
        assert_eq!(loaded.leaf_ids, vec!["a".to_string()]);
    }
}
