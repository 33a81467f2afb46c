pub mod builder;
pub mod cycles;
pub mod leaves;
pub mod persistence;
pub mod resolution;
pub mod tarjan;
pub mod topo;

pub use builder::{build_graph, GraphBuildResult};
pub use persistence::GraphArtifact;
