mod engine;
mod node_kind_table;

pub use engine::GenericExtractor;
pub use node_kind_table::{table_for, NodeKindTable};
