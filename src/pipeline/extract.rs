//! Entity and relation extraction

use super::features::FeatureProvider;
use super::text::{title_case, truncate_chars};
use super::{check_count, PipelineResult};
use crate::model::{Edge, EdgeId, Node, NodeId, Sentence};

/// At most this many leading sentences become nodes
pub const MAX_NODES: usize = 8;

/// Node summaries keep this many chars of their sentence
pub const NODE_SUMMARY_CHARS: usize = 140;

const DEFAULT_LABEL: &str = "Entity";

/// One node per leading sentence, in sentence order.
///
/// Never returns more nodes than sentences, nor more than `MAX_NODES`.
pub fn extract_nodes(
    features: &dyn FeatureProvider,
    sentences: &[Sentence],
) -> PipelineResult<Vec<Node>> {
    let count = sentences.len().min(MAX_NODES);
    let feats = features.node_features(sentences, count)?;
    check_count("extract_nodes", count, feats.len())?;

    Ok(sentences
        .iter()
        .zip(feats)
        .map(|(sentence, f)| Node {
            node_id: NodeId::derive(&sentence.sentence_id),
            label: label_for(&sentence.text),
            node_type: f.node_type,
            summary: truncate_chars(&sentence.text, NODE_SUMMARY_CHARS).to_string(),
            score: f.score,
            evidence: vec![sentence.evidence()],
        })
        .collect())
}

/// One edge per consecutive node pair (0-1, 2-3, …).
///
/// A trailing unpaired node is skipped, so `n` nodes yield `n / 2` edges.
pub fn extract_edges(features: &dyn FeatureProvider, nodes: &[Node]) -> PipelineResult<Vec<Edge>> {
    let count = nodes.len() / 2;
    let feats = features.edge_features(nodes, count)?;
    check_count("extract_edges", count, feats.len())?;

    Ok(nodes
        .chunks_exact(2)
        .zip(feats)
        .map(|(pair, f)| Edge {
            edge_id: EdgeId::derive(&pair[0].node_id),
            src: pair[0].node_id,
            dst: pair[1].node_id,
            relation: f.relation,
            confidence: f.confidence,
            evidence: pair[0].evidence.first().cloned(),
        })
        .collect())
}

/// Title-cased first word; blank text gets `DEFAULT_LABEL`
fn label_for(text: &str) -> String {
    match text.split_whitespace().next() {
        Some(word) => title_case(word),
        None => DEFAULT_LABEL.to_string(),
    }
}
