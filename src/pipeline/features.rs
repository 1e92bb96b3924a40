//! Feature providers: the inference backend behind the pipeline
//!
//! A `FeatureProvider` supplies everything the pipeline cannot compute from
//! text structure alone: section labels, embeddings, entity types, relevance
//! scores, relation labels and confidences. The pipeline owns control flow
//! and ids; the provider owns inference. `SeededFeatures` simulates inference
//! with seeded generators so results are reproducible per paper. A real
//! NLP/embedding backend implements the same trait.

use crate::model::{Node, NodeType, PaperId, Relation, Section, Sentence, EMBEDDING_DIM};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Errors raised by a feature provider
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Model loading or inference failed
    #[error("feature model error: {0}")]
    Model(String),
}

/// Section and embedding for one text chunk
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceFeatures {
    pub section: Section,
    pub embedding: Vec<f32>,
}

/// Type and relevance for one entity
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFeatures {
    pub node_type: NodeType,
    pub score: f32,
}

/// Relation and confidence for one node pair
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFeatures {
    pub relation: Relation,
    pub confidence: f32,
}

/// Inference backend for the extraction pipeline.
///
/// Each method is called once per paper per stage and must return exactly
/// one record per requested item, in order.
pub trait FeatureProvider: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Features for each chunk produced by segmentation
    fn sentence_features(
        &self,
        paper_id: &PaperId,
        chunks: &[String],
    ) -> Result<Vec<SentenceFeatures>, FeatureError>;

    /// Embedding for the single fallback sentence of a paper whose text
    /// produced no chunks
    fn fallback_embedding(&self, paper_id: &PaperId) -> Result<Vec<f32>, FeatureError>;

    /// Features for the first `count` of `sentences`
    fn node_features(
        &self,
        sentences: &[Sentence],
        count: usize,
    ) -> Result<Vec<NodeFeatures>, FeatureError>;

    /// Features for `count` consecutive node pairs of `nodes`
    fn edge_features(
        &self,
        nodes: &[Node],
        count: usize,
    ) -> Result<Vec<EdgeFeatures>, FeatureError>;
}

/// Deterministic simulation of an inference backend.
///
/// Seeds:
/// - sentences: the low 32 bits of the paper id
/// - nodes: the sum of the low 16 bits of every sentence id
/// - edges: the sum of the low 16 bits of every node id
///
/// Draw order is part of the contract: per chunk one section then
/// `EMBEDDING_DIM` embedding values, per node one type then one score, per
/// pair one relation then one confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededFeatures;

impl SeededFeatures {
    pub fn new() -> Self {
        Self
    }
}

fn pick<T: Copy>(rng: &mut StdRng, vocabulary: &[T]) -> T {
    vocabulary[rng.gen_range(0..vocabulary.len())]
}

fn draw_embedding(rng: &mut StdRng) -> Vec<f32> {
    (0..EMBEDDING_DIM).map(|_| rng.gen::<f32>()).collect()
}

impl FeatureProvider for SeededFeatures {
    fn name(&self) -> &str {
        "seeded"
    }

    fn sentence_features(
        &self,
        paper_id: &PaperId,
        chunks: &[String],
    ) -> Result<Vec<SentenceFeatures>, FeatureError> {
        let mut rng = StdRng::seed_from_u64(paper_id.seed());
        Ok(chunks
            .iter()
            .map(|_| {
                let section = pick(&mut rng, &Section::ALL);
                let embedding = draw_embedding(&mut rng);
                SentenceFeatures { section, embedding }
            })
            .collect())
    }

    fn fallback_embedding(&self, paper_id: &PaperId) -> Result<Vec<f32>, FeatureError> {
        let mut rng = StdRng::seed_from_u64(paper_id.seed());
        Ok(draw_embedding(&mut rng))
    }

    fn node_features(
        &self,
        sentences: &[Sentence],
        count: usize,
    ) -> Result<Vec<NodeFeatures>, FeatureError> {
        let seed: u64 = sentences.iter().map(|s| s.sentence_id.low16()).sum();
        let mut rng = StdRng::seed_from_u64(seed);
        Ok((0..count.min(sentences.len()))
            .map(|_| {
                let node_type = pick(&mut rng, &NodeType::ALL);
                let score = rng.gen::<f32>();
                NodeFeatures { node_type, score }
            })
            .collect())
    }

    fn edge_features(
        &self,
        nodes: &[Node],
        count: usize,
    ) -> Result<Vec<EdgeFeatures>, FeatureError> {
        let seed: u64 = nodes.iter().map(|n| n.node_id.low16()).sum();
        let mut rng = StdRng::seed_from_u64(seed);
        Ok((0..count.min(nodes.len() / 2))
            .map(|_| {
                let relation = pick(&mut rng, &Relation::ALL);
                let confidence = rng.gen::<f32>();
                EdgeFeatures { relation, confidence }
            })
            .collect())
    }
}
