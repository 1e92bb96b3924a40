//! Core data structures

mod edge;
mod id;
mod node;
mod paper;
mod sentence;


pub use edge::{Edge, Relation};
pub use id::{EdgeId, NodeId, PaperId, SentenceId};
pub use node::{Node, NodeType};
pub use paper::{Artifacts, Paper, PaperStatus, SummaryBullet};
pub use sentence::{EvidenceSpan, Section, Sentence, EMBEDDING_DIM};
