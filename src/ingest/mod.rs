//! Ingestion orchestrator: the paper lifecycle state machine
//!
//! QUEUED → PROCESSING → READY | ERROR
//!
//! `Ingestor::process` runs the state machine synchronously: mark the paper
//! processing, run the pipeline outside any store guard, then commit either
//! the full artifact set or the failure message. Pipeline failures never
//! escape; they become a stored ERROR status.
//!
//! `Ingestor::spawn` schedules `process` as an independent Tokio task. The
//! CPU-bound pipeline runs on the blocking pool; if it panics, the task
//! boundary catches the `JoinError` and records it with `set_error`.

use crate::model::{PaperId, PaperStatus};
use crate::pipeline::Pipeline;
use crate::store::{PaperStore, StoreResult};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Drives papers through the pipeline into the store
#[derive(Debug, Clone)]
pub struct Ingestor {
    store: Arc<PaperStore>,
    pipeline: Arc<Pipeline>,
}

impl Ingestor {
    pub fn new(store: Arc<PaperStore>, pipeline: Arc<Pipeline>) -> Self {
        Self { store, pipeline }
    }

    pub fn store(&self) -> &Arc<PaperStore> {
        &self.store
    }

    /// Run one ingestion attempt to completion.
    ///
    /// Returns the terminal status. Errs only when the store rejects a
    /// transition (unknown paper or a paper that already settled).
    pub fn process(&self, paper_id: &PaperId, text: &str) -> StoreResult<PaperStatus> {
        self.store.set_processing(paper_id)?;
        debug!(
            paper_id = %paper_id,
            provider = self.pipeline.provider_name(),
            chars = text.chars().count(),
            "running pipeline"
        );

        match self.pipeline.run(paper_id, text) {
            Ok(artifacts) => {
                self.store.upsert_result(paper_id, artifacts)?;
                Ok(PaperStatus::Ready)
            }
            Err(e) => {
                self.store.set_error(paper_id, e.to_string())?;
                Ok(PaperStatus::Error)
            }
        }
    }

    /// Schedule `process` on `runtime` without waiting for it.
    ///
    /// The returned handle resolves once the paper has settled; callers
    /// normally drop it and poll status.
    pub fn spawn(&self, runtime: &Handle, paper_id: PaperId, text: String) -> JoinHandle<()> {
        let supervisor = self.clone();
        let blocking = runtime.clone();
        runtime.spawn(async move {
            let worker = supervisor.clone();
            let outcome = blocking
                .spawn_blocking(move || worker.process(&paper_id, &text))
                .await;

            match outcome {
                Ok(Ok(status)) => debug!(paper_id = %paper_id, %status, "ingestion settled"),
                Ok(Err(e)) => {
                    error!(paper_id = %paper_id, error = %e, "ingestion rejected by store")
                }
                Err(join_err) => {
                    error!(paper_id = %paper_id, error = %join_err, "ingestion task failed");
                    let message = format!("ingestion task failed: {}", join_err);
                    if let Err(e) = supervisor.store.set_error(&paper_id, message) {
                        error!(paper_id = %paper_id, error = %e, "could not record failure");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, Sentence};
    use crate::pipeline::{
        EdgeFeatures, FeatureError, FeatureProvider, NodeFeatures, SeededFeatures,
        SentenceFeatures,
    };
    use crate::store::StoreError;

    /// Fails node extraction, or panics when `panic` is set.
    struct FailingFeatures {
        panic: bool,
    }

    impl FeatureProvider for FailingFeatures {
        fn name(&self) -> &str {
            "failing"
        }

        fn sentence_features(
            &self,
            paper_id: &PaperId,
            chunks: &[String],
        ) -> Result<Vec<SentenceFeatures>, FeatureError> {
            SeededFeatures::new().sentence_features(paper_id, chunks)
        }

        fn fallback_embedding(&self, paper_id: &PaperId) -> Result<Vec<f32>, FeatureError> {
            SeededFeatures::new().fallback_embedding(paper_id)
        }

        fn node_features(
            &self,
            _sentences: &[Sentence],
            _count: usize,
        ) -> Result<Vec<NodeFeatures>, FeatureError> {
            if self.panic {
                panic!("model crashed");
            }
            Err(FeatureError::Model("entity model unavailable".to_string()))
        }

        fn edge_features(
            &self,
            _nodes: &[Node],
            _count: usize,
        ) -> Result<Vec<EdgeFeatures>, FeatureError> {
            Ok(Vec::new())
        }
    }

    fn ingestor(pipeline: Pipeline) -> Ingestor {
        Ingestor::new(Arc::new(PaperStore::new()), Arc::new(pipeline))
    }

    #[test]
    fn process_reaches_ready() {
        let ingestor = ingestor(Pipeline::default());
        let id = ingestor.store().create_paper("Paper", "upload").paper_id;

        let status = ingestor.process(&id, "Graph attention networks.").unwrap();
        assert_eq!(status, PaperStatus::Ready);

        let paper = ingestor.store().get_paper(&id).unwrap();
        assert_eq!(paper.status, PaperStatus::Ready);
        assert_eq!(paper.sentences.len(), 1);
        assert_eq!(paper.nodes[0].label, "Graph");
    }

    #[test]
    fn pipeline_failure_is_recorded_not_propagated() {
        let ingestor = ingestor(Pipeline::new(Arc::new(FailingFeatures { panic: false })));
        let id = ingestor.store().create_paper("Paper", "upload").paper_id;

        let status = ingestor.process(&id, "Some text.").unwrap();
        assert_eq!(status, PaperStatus::Error);

        let paper = ingestor.store().get_paper(&id).unwrap();
        assert_eq!(paper.status, PaperStatus::Error);
        assert_eq!(
            paper.error_message.as_deref(),
            Some("feature model error: entity model unavailable")
        );
        assert!(!paper.has_artifacts());
    }

    #[test]
    fn unknown_paper_is_a_store_error() {
        let ingestor = ingestor(Pipeline::default());
        let err = ingestor.process(&PaperId::new(), "text").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn settled_paper_is_not_reprocessed() {
        let ingestor = ingestor(Pipeline::default());
        let id = ingestor.store().create_paper("Paper", "upload").paper_id;
        ingestor.process(&id, "first").unwrap();

        assert!(ingestor.process(&id, "second").is_err());
        let paper = ingestor.store().get_paper(&id).unwrap();
        assert_eq!(paper.sentences[0].text, "first");
    }

    #[tokio::test]
    async fn spawned_ingestion_settles() {
        let ingestor = ingestor(Pipeline::default());
        let id = ingestor.store().create_paper("Paper", "upload").paper_id;

        ingestor.spawn(&Handle::current(), id, "Spawned text.".to_string()).await.unwrap();
        assert_eq!(
            ingestor.store().get_paper(&id).unwrap().status,
            PaperStatus::Ready
        );
    }

    #[tokio::test]
    async fn panicking_pipeline_is_caught_at_task_boundary() {
        let ingestor = ingestor(Pipeline::new(Arc::new(FailingFeatures { panic: true })));
        let id = ingestor.store().create_paper("Paper", "upload").paper_id;

        ingestor.spawn(&Handle::current(), id, "Boom.".to_string()).await.unwrap();

        let paper = ingestor.store().get_paper(&id).unwrap();
        assert_eq!(paper.status, PaperStatus::Error);
        assert!(paper
            .error_message
            .unwrap()
            .starts_with("ingestion task failed"));
    }
}
