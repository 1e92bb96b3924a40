//! Paper records and their lifecycle status

use super::edge::Edge;
use super::id::PaperId;
use super::node::Node;
use super::sentence::Sentence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a paper
///
/// Papers move QUEUED → PROCESSING → READY or ERROR. READY and ERROR are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperStatus {
    Queued,
    Processing,
    Ready,
    Error,
}

impl PaperStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperStatus::Queued => "queued",
            PaperStatus::Processing => "processing",
            PaperStatus::Ready => "ready",
            PaperStatus::Error => "error",
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaperStatus::Ready | PaperStatus::Error)
    }
}

impl std::fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a paper summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBullet {
    /// Title-cased section label
    pub section: String,
    pub text: String,
    pub weight: f32,
}

/// Everything the extraction pipeline derives from a paper's text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Artifacts {
    pub sentences: Vec<Sentence>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub summary: Vec<SummaryBullet>,
}

/// An ingested document and its derived knowledge graph
///
/// Artifacts are non-empty only when `status` is `Ready`; `error_message`
/// is set only when `status` is `Error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub paper_id: PaperId,
    pub title: String,
    /// Origin of the document ("upload" or a URL)
    pub source: String,
    pub status: PaperStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub summary: Vec<SummaryBullet>,
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

impl Paper {
    /// Create a queued paper with a fresh id
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            paper_id: PaperId::new(),
            title: title.into(),
            source: source.into(),
            status: PaperStatus::Queued,
            created_at: now,
            updated_at: now,
            error_message: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            summary: Vec::new(),
            sentences: Vec::new(),
        }
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether any derived artifact is present
    pub fn has_artifacts(&self) -> bool {
        !(self.nodes.is_empty()
            && self.edges.is_empty()
            && self.summary.is_empty()
            && self.sentences.is_empty())
    }

    /// Replace all derived artifacts at once
    pub(crate) fn install(&mut self, artifacts: Artifacts) {
        self.sentences = artifacts.sentences;
        self.nodes = artifacts.nodes;
        self.edges = artifacts.edges;
        self.summary = artifacts.summary;
    }

    pub(crate) fn clear_artifacts(&mut self) {
        self.install(Artifacts::default());
    }
}
