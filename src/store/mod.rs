//! PaperStore: the authoritative record of every paper
//!
//! Each operation is atomic on its own: mutations run under the entry's
//! write guard, so a concurrent reader sees a paper either entirely before
//! or entirely after a transition. Callers never hold a guard across
//! pipeline execution; only individual store calls are atomic.

use crate::model::{Artifacts, Paper, PaperId, PaperStatus, Sentence};
use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("paper not found: {0}")]
    NotFound(PaperId),

    #[error("paper {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: PaperId,
        from: PaperStatus,
        to: PaperStatus,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// In-process paper repository
#[derive(Debug, Default)]
pub struct PaperStore {
    papers: DashMap<PaperId, Paper>,
}

impl PaperStore {
    pub fn new() -> Self {
        Self {
            papers: DashMap::new(),
        }
    }

    /// Create a queued paper and return a copy of it
    pub fn create_paper(&self, title: impl Into<String>, source: impl Into<String>) -> Paper {
        let paper = Paper::new(title, source);
        self.papers.insert(paper.paper_id, paper.clone());
        info!(paper_id = %paper.paper_id, title = %paper.title, "paper created");
        paper
    }

    /// Snapshot of a paper
    pub fn get_paper(&self, id: &PaperId) -> Option<Paper> {
        self.papers.get(id).map(|r| r.value().clone())
    }

    /// Move a queued paper to PROCESSING
    ///
    /// Re-marking a paper that is already processing only bumps its timestamp.
    pub fn set_processing(&self, id: &PaperId) -> StoreResult<()> {
        self.transition(id, PaperStatus::Processing, |paper| {
            paper.status = PaperStatus::Processing;
        })?;
        debug!(paper_id = %id, "paper processing");
        Ok(())
    }

    /// Record a failure and move the paper to ERROR
    pub fn set_error(&self, id: &PaperId, message: impl Into<String>) -> StoreResult<()> {
        let message = message.into();
        self.transition(id, PaperStatus::Error, |paper| {
            paper.clear_artifacts();
            paper.error_message = Some(message.clone());
            paper.status = PaperStatus::Error;
        })?;
        warn!(paper_id = %id, error = %message, "paper failed");
        Ok(())
    }

    /// Install all derived artifacts and move the paper to READY in one step
    pub fn upsert_result(&self, id: &PaperId, artifacts: Artifacts) -> StoreResult<Paper> {
        let counts = (
            artifacts.sentences.len(),
            artifacts.nodes.len(),
            artifacts.edges.len(),
        );
        let paper = self.transition(id, PaperStatus::Ready, |paper| {
            paper.install(artifacts);
            paper.error_message = None;
            paper.status = PaperStatus::Ready;
        })?;
        info!(
            paper_id = %id,
            sentences = counts.0,
            nodes = counts.1,
            edges = counts.2,
            "paper ready"
        );
        Ok(paper)
    }

    /// Snapshot of every paper, in no particular order
    pub fn list_papers(&self) -> Vec<Paper> {
        self.papers.iter().map(|r| r.value().clone()).collect()
    }

    /// Snapshot of every stored sentence across all papers
    pub fn sentences(&self) -> Vec<Sentence> {
        self.papers
            .iter()
            .flat_map(|r| r.value().sentences.clone())
            .collect()
    }

    /// Number of papers
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Apply `apply` under the paper's write guard if `to` is reachable from
    /// the current status, returning the updated paper.
    fn transition<F>(&self, id: &PaperId, to: PaperStatus, apply: F) -> StoreResult<Paper>
    where
        F: FnOnce(&mut Paper),
    {
        let mut entry = self.papers.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        let from = entry.status;
        if !can_transition(from, to) {
            warn!(paper_id = %id, %from, %to, "rejected status transition");
            return Err(StoreError::InvalidTransition { id: *id, from, to });
        }
        let paper = entry.value_mut();
        apply(paper);
        paper.touch();
        Ok(paper.clone())
    }
}

/// Status transitions the store accepts
fn can_transition(from: PaperStatus, to: PaperStatus) -> bool {
    use PaperStatus::*;
    matches!(
        (from, to),
        (Queued, Processing)
            | (Processing, Processing)
            | (Queued, Error)
            | (Processing, Error)
            | (Processing, Ready)
    )
}
