//! Entity nodes extracted from a paper

use super::id::NodeId;
use super::sentence::EvidenceSpan;
use serde::{Deserialize, Serialize};

/// Entity type vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Model,
    Dataset,
    Metric,
    Task,
}

impl NodeType {
    /// The fixed vocabulary, in generator draw order
    pub const ALL: [NodeType; 4] = [
        NodeType::Model,
        NodeType::Dataset,
        NodeType::Metric,
        NodeType::Task,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Model => "Model",
            NodeType::Dataset => "Dataset",
            NodeType::Metric => "Metric",
            NodeType::Task => "Task",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity in a paper's knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    /// Display label (title-cased first word of the source sentence)
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub summary: String,
    /// Relevance score in [0, 1)
    pub score: f32,
    /// Supporting evidence, in order
    #[serde(default)]
    pub evidence: Vec<EvidenceSpan>,
}
