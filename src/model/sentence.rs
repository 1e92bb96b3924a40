//! Sentences and evidence spans

use super::id::{PaperId, SentenceId};
use serde::{Deserialize, Serialize};

/// Length of every sentence embedding vector
pub const EMBEDDING_DIM: usize = 4;

/// Section of a paper a sentence was attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Abstract,
    Introduction,
    Method,
    Experiments,
}

impl Section {
    /// The fixed vocabulary, in generator draw order
    pub const ALL: [Section; 4] = [
        Section::Abstract,
        Section::Introduction,
        Section::Method,
        Section::Experiments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Abstract => "abstract",
            Section::Introduction => "introduction",
            Section::Method => "method",
            Section::Experiments => "experiments",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A segment of paper text with its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub sentence_id: SentenceId,
    /// Paper this sentence belongs to
    pub paper_id: PaperId,
    pub section: Section,
    pub text: String,
    /// Fixed-length vector, `EMBEDDING_DIM` elements
    pub embedding: Vec<f32>,
}

impl Sentence {
    /// Mean of the embedding vector (0.0 for an empty vector)
    pub fn embedding_mean(&self) -> f32 {
        if self.embedding.is_empty() {
            return 0.0;
        }
        self.embedding.iter().sum::<f32>() / self.embedding.len() as f32
    }

    /// Project this sentence into an evidence span
    pub fn evidence(&self) -> EvidenceSpan {
        EvidenceSpan {
            sentence_id: self.sentence_id,
            text: self.text.clone(),
            section: self.section,
        }
    }
}

/// Read-only reference to a sentence, denormalized for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSpan {
    pub sentence_id: SentenceId,
    pub text: String,
    pub section: Section,
}
