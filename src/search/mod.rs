//! Hybrid sentence search
//!
//! Score = |query tokens ∩ sentence tokens| + tanh(mean embedding).
//! Tokens are lower-cased whitespace-separated words. The embedding term
//! stands in for a vector-similarity signal; a real ranker must keep the
//! same contract: ranked descending, stable on ties, capped at
//! `SEARCH_LIMIT`, only positive scores.

use crate::model::Sentence;
use std::collections::HashSet;

/// Maximum number of hits returned
pub const SEARCH_LIMIT: usize = 10;

/// A sentence and its score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub sentence: Sentence,
    pub score: f32,
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// Hybrid score of one sentence against pre-tokenized query terms
pub fn score(query_tokens: &HashSet<String>, sentence: &Sentence) -> f32 {
    let overlap = tokenize(&sentence.text).intersection(query_tokens).count();
    overlap as f32 + sentence.embedding_mean().tanh()
}

/// Rank `sentences` against `query`.
///
/// An empty query returns no hits without inspecting any sentence.
pub fn hybrid_search<I>(query: &str, sentences: I) -> Vec<SearchHit>
where
    I: IntoIterator<Item = Sentence>,
{
    if query.is_empty() {
        return Vec::new();
    }

    let query_tokens = tokenize(query);
    let mut hits: Vec<SearchHit> = sentences
        .into_iter()
        .filter_map(|sentence| {
            let score = score(&query_tokens, &sentence);
            (score > 0.0).then_some(SearchHit { sentence, score })
        })
        .collect();

    // sort_by is stable: equal scores keep encounter order
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(SEARCH_LIMIT);
    hits
}
