use crate::component::ComponentId;
use serde::{Deserialize, Serialize};

/// The kind of relationship a [`CallEdge`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Calls,
    UsesComponent,
    References,
    Extends,
    Implements,
    Imports,
}

/// A typed relationship between two components, as produced by Pass 2 of
/// the Component Extractor (relationship extraction).
///
/// `callee` may not exist in the component registry; such edges are kept
/// with `resolved = false` rather than dropped, so the Graph Builder can
/// attempt a second resolution pass (unqualified-name match) before giving
/// up on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: ComponentId,
    pub callee: ComponentId,
    pub line: Option<u32>,
    pub kind: EdgeKind,
    #[serde(default = "default_resolved")]
    pub resolved: bool,
}

fn default_resolved() -> bool {
    true
}

impl CallEdge {
    pub fn new(caller: impl Into<ComponentId>, callee: impl Into<ComponentId>, kind: EdgeKind) -> Self {
        Self {
            caller: caller.into(),
            callee: callee.into(),
            line: None,
            kind,
            resolved: true,
        }
    }

    pub fn unresolved(caller: impl Into<ComponentId>, callee: impl Into<ComponentId>, kind: EdgeKind) -> Self {
        Self {
            caller: caller.into(),
            callee: callee.into(),
            line: None,
            kind,
            resolved: false,
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// The `(caller, callee, kind)` triple used for deduplication (spec.md
    /// §3 invariant: "no duplicate (caller, callee, kind) triple survives
    /// the graph build").
    pub fn dedup_key(&self) -> (ComponentId, ComponentId, EdgeKind) {
        (self.caller.clone(), self.callee.clone(), self.kind)
    }
}
