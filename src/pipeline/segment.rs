//! Segmentation: raw text → sentences

use super::features::FeatureProvider;
use super::text::wrap_words;
use super::{check_count, PipelineError, PipelineResult};
use crate::model::{PaperId, Section, Sentence, SentenceId, EMBEDDING_DIM};

/// Maximum chunk length in chars
pub const CHUNK_WIDTH: usize = 120;

/// Split `text` into sentences of at most `CHUNK_WIDTH` chars.
///
/// Text with no words yields exactly one fallback sentence holding the raw
/// input, attributed to the abstract.
pub fn segment(
    features: &dyn FeatureProvider,
    paper_id: &PaperId,
    text: &str,
) -> PipelineResult<Vec<Sentence>> {
    let chunks = wrap_words(text, CHUNK_WIDTH);

    if chunks.is_empty() {
        let embedding = features.fallback_embedding(paper_id)?;
        check_dimension(&embedding)?;
        return Ok(vec![Sentence {
            sentence_id: SentenceId::derive(paper_id, 0),
            paper_id: *paper_id,
            section: Section::Abstract,
            text: text.to_string(),
            embedding,
        }]);
    }

    let feats = features.sentence_features(paper_id, &chunks)?;
    check_count("segment", chunks.len(), feats.len())?;

    chunks
        .into_iter()
        .zip(feats)
        .enumerate()
        .map(|(index, (chunk, f))| {
            check_dimension(&f.embedding)?;
            Ok(Sentence {
                sentence_id: SentenceId::derive(paper_id, index),
                paper_id: *paper_id,
                section: f.section,
                text: chunk,
                embedding: f.embedding,
            })
        })
        .collect()
}

fn check_dimension(embedding: &[f32]) -> PipelineResult<()> {
    if embedding.len() == EMBEDDING_DIM {
        Ok(())
    } else {
        Err(PipelineError::EmbeddingDimension {
            expected: EMBEDDING_DIM,
            got: embedding.len(),
        })
    }
}
