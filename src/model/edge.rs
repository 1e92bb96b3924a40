//! Relation edges between nodes of the same paper

use super::id::{EdgeId, NodeId};
use super::sentence::EvidenceSpan;
use serde::{Deserialize, Serialize};

/// Relation vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Uses,
    ImprovesOn,
    EvaluatedOn,
    Reports,
}

impl Relation {
    /// The fixed vocabulary, in generator draw order
    pub const ALL: [Relation; 4] = [
        Relation::Uses,
        Relation::ImprovesOn,
        Relation::EvaluatedOn,
        Relation::Reports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Uses => "uses",
            Relation::ImprovesOn => "improves_on",
            Relation::EvaluatedOn => "evaluated_on",
            Relation::Reports => "reports",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relation between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub edge_id: EdgeId,
    /// Source node
    pub src: NodeId,
    /// Destination node
    pub dst: NodeId,
    pub relation: Relation,
    /// Confidence in [0, 1)
    pub confidence: f32,
    #[serde(default)]
    pub evidence: Option<EvidenceSpan>,
}
