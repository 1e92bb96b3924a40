//! Extraction pipeline
//!
//! Turns raw paper text into the four derived artifact collections:
//!
//! 1. `segment`: text → sentences (sections + embeddings)
//! 2. `extract_nodes`: sentences → entity nodes
//! 3. `extract_edges`: nodes → relation edges
//! 4. `summarize`: sentences → summary bullets
//!
//! Each stage consumes only the previous stage's output; only segmentation
//! reads the raw text. Stages are deterministic for a given paper id, text
//! and feature provider.

mod extract;
pub mod features;
mod segment;
mod summarize;
pub mod text;

pub use extract::{extract_edges, extract_nodes, MAX_NODES, NODE_SUMMARY_CHARS};
pub use features::{
    EdgeFeatures, FeatureError, FeatureProvider, NodeFeatures, SeededFeatures, SentenceFeatures,
};
pub use segment::{segment, CHUNK_WIDTH};
pub use summarize::{summarize, BULLET_TEXT_CHARS, BULLET_WEIGHT, MAX_BULLETS};

use crate::model::{Artifacts, Edge, Node, PaperId, Sentence};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised by a pipeline stage
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Features(#[from] FeatureError),

    #[error("{stage}: feature provider returned {got} records, expected {expected}")]
    FeatureCount {
        stage: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("segment: embedding has {got} dimensions, expected {expected}")]
    EmbeddingDimension { expected: usize, got: usize },
}

/// Result type for pipeline stages
pub type PipelineResult<T> = Result<T, PipelineError>;

pub(crate) fn check_count(stage: &'static str, expected: usize, got: usize) -> PipelineResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(PipelineError::FeatureCount { stage, expected, got })
    }
}

/// The four pipeline stages bound to a feature provider
#[derive(Clone)]
pub struct Pipeline {
    features: Arc<dyn FeatureProvider>,
}

impl Pipeline {
    pub fn new(features: Arc<dyn FeatureProvider>) -> Self {
        Self { features }
    }

    /// Name of the underlying feature provider
    pub fn provider_name(&self) -> &str {
        self.features.name()
    }

    pub fn segment(&self, paper_id: &PaperId, text: &str) -> PipelineResult<Vec<Sentence>> {
        segment(self.features.as_ref(), paper_id, text)
    }

    pub fn extract_nodes(&self, sentences: &[Sentence]) -> PipelineResult<Vec<Node>> {
        extract_nodes(self.features.as_ref(), sentences)
    }

    pub fn extract_edges(&self, nodes: &[Node]) -> PipelineResult<Vec<Edge>> {
        extract_edges(self.features.as_ref(), nodes)
    }

    /// Run all four stages in order
    pub fn run(&self, paper_id: &PaperId, text: &str) -> PipelineResult<Artifacts> {
        let sentences = self.segment(paper_id, text)?;
        let nodes = self.extract_nodes(&sentences)?;
        let edges = self.extract_edges(&nodes)?;
        let summary = summarize(&sentences);

        debug!(
            paper_id = %paper_id,
            sentences = sentences.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            bullets = summary.len(),
            "pipeline finished"
        );

        Ok(Artifacts {
            sentences,
            nodes,
            edges,
            summary,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Arc::new(SeededFeatures::new()))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("features", &self.features.name())
            .finish()
    }
}
