//! Transport-independent API layer.
//!
//! `KnowflowApi` is the single entry point for consumer-facing operations.
//! Transports (HTTP, CLI, direct embedding) call its methods; they never
//! reach into `PaperStore`, `Ingestor` or `Pipeline` directly.
//!
//! Ingestion calls return a paper id immediately; processing happens on a
//! background task and is observed by polling `status`.

use crate::ingest::Ingestor;
use crate::model::{Edge, Node, Paper, PaperId, PaperStatus, Section, SentenceId, SummaryBullet};
use crate::pipeline::Pipeline;
use crate::search::hybrid_search;
use crate::store::{PaperStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use url::Url;
use tracing::{debug, info};

/// Text ingested for an upload that decodes to nothing
pub const EMPTY_UPLOAD_TEXT: &str = "Placeholder content for empty PDF";
/// Title of an upload without a filename
pub const UNTITLED_UPLOAD: &str = "Untitled PDF";
/// Source recorded for uploads
pub const UPLOAD_SOURCE: &str = "upload";
/// Title given to papers ingested by reference
pub const REFERENCE_TITLE: &str = "arXiv draft";
/// Text export of a paper without summary bullets
pub const NO_SUMMARY: &str = "No summary available";

/// Errors surfaced to API callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("paper not found: {0}")]
    NotFound(PaperId),

    /// The operation needs a READY paper
    #[error("paper is {status}")]
    Conflict { id: PaperId, status: PaperStatus },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("paper {id} did not settle within {waited:?}")]
    Timeout { id: PaperId, waited: Duration },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Ingestion was requested outside a Tokio runtime
    #[error("no async runtime available to run ingestion")]
    NoRuntime,
}

impl ApiError {
    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::Conflict { .. } => 409,
            ApiError::InvalidInput(_) => 422,
            ApiError::Timeout { .. } => 504,
            ApiError::Store(StoreError::NotFound(_)) => 404,
            ApiError::Store(StoreError::InvalidTransition { .. }) => 409,
            ApiError::Serialization(_) | ApiError::NoRuntime => 500,
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Lifecycle view of a paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusView {
    pub paper_id: PaperId,
    pub title: String,
    pub status: PaperStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

impl From<&Paper> for StatusView {
    fn from(paper: &Paper) -> Self {
        Self {
            paper_id: paper.paper_id,
            title: paper.title.clone(),
            status: paper.status,
            created_at: paper.created_at,
            updated_at: paper.updated_at,
            error_message: paper.error_message.clone(),
        }
    }
}

/// Knowledge graph of a READY paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub paper_id: PaperId,
    pub title: String,
    pub summary: Vec<SummaryBullet>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl From<Paper> for GraphView {
    fn from(paper: Paper) -> Self {
        Self {
            paper_id: paper.paper_id,
            title: paper.title,
            summary: paper.summary,
            nodes: paper.nodes,
            edges: paper.edges,
        }
    }
}

/// One ranked sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultView {
    pub paper_id: PaperId,
    pub sentence_id: SentenceId,
    pub section: Section,
    pub text: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultView>,
}

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// The graph payload as JSON
    Json,
    /// Summary bullet texts, one per line
    Txt,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "txt" => Ok(ExportFormat::Txt),
            other => Err(ApiError::InvalidInput(format!(
                "unsupported export format '{}' (expected json or txt)",
                other
            ))),
        }
    }
}

/// An exported paper
#[derive(Debug, Clone, PartialEq)]
pub enum Export {
    Json(serde_json::Value),
    Text(String),
}

impl Export {
    pub fn content_type(&self) -> &'static str {
        match self {
            Export::Json(_) => "application/json",
            Export::Text(_) => "text/plain; charset=utf-8",
        }
    }

    /// Rendered body (JSON is pretty-printed)
    pub fn body(&self) -> String {
        match self {
            Export::Json(value) => format!("{:#}", value),
            Export::Text(text) => text.clone(),
        }
    }
}

/// Single entry point for all consumer-facing operations.
#[derive(Debug, Clone)]
pub struct KnowflowApi {
    store: Arc<PaperStore>,
    ingestor: Ingestor,
}

impl KnowflowApi {
    pub fn new(store: Arc<PaperStore>, pipeline: Arc<Pipeline>) -> Self {
        let ingestor = Ingestor::new(store.clone(), pipeline);
        Self { store, ingestor }
    }

    /// Fresh store with the default seeded pipeline
    pub fn in_memory() -> Self {
        Self::new(Arc::new(PaperStore::new()), Arc::new(Pipeline::default()))
    }

    pub fn store(&self) -> &Arc<PaperStore> {
        &self.store
    }

    // --- Write ---

    /// Ingest uploaded file content.
    ///
    /// Invalid UTF-8 is dropped rather than rejected. Fails with `NoRuntime`,
    /// before any paper is created, when called outside a Tokio runtime.
    pub fn ingest_upload(&self, filename: Option<&str>, content: &[u8]) -> ApiResult<PaperId> {
        let runtime = runtime()?;
        let mut text = decode_upload(content);
        if text.is_empty() {
            text = EMPTY_UPLOAD_TEXT.to_string();
        }
        let title = filename
            .filter(|name| !name.is_empty())
            .unwrap_or(UNTITLED_UPLOAD);

        let paper = self.store.create_paper(title, UPLOAD_SOURCE);
        self.ingestor.spawn(&runtime, paper.paper_id, text);
        Ok(paper.paper_id)
    }

    /// Ingest a remote reference (an http or https URL).
    ///
    /// The normalized URL becomes the paper's source. Same runtime
    /// requirement as `ingest_upload`.
    pub fn ingest_reference(&self, url: &str) -> ApiResult<PaperId> {
        let url = validate_reference(url)?;
        let runtime = runtime()?;
        let text = format!("Synthetic content pulled from {}", url);
        let paper = self.store.create_paper(REFERENCE_TITLE, url);
        self.ingestor.spawn(&runtime, paper.paper_id, text);
        Ok(paper.paper_id)
    }

    // --- Reads ---

    pub fn status(&self, id: &PaperId) -> ApiResult<StatusView> {
        self.paper(id).map(|paper| StatusView::from(&paper))
    }

    /// Title, summary, nodes and edges of a READY paper
    pub fn graph(&self, id: &PaperId) -> ApiResult<GraphView> {
        self.ready_paper(id).map(GraphView::from)
    }

    pub fn export(&self, id: &PaperId, format: ExportFormat) -> ApiResult<Export> {
        let paper = self.ready_paper(id)?;
        match format {
            ExportFormat::Json => Ok(Export::Json(serde_json::to_value(GraphView::from(paper))?)),
            ExportFormat::Txt => Ok(Export::Text(summary_text(&paper.summary))),
        }
    }

    /// Rank sentences from every stored paper against `query`
    pub fn search(&self, query: &str) -> SearchResponse {
        let hits = hybrid_search(query, self.store.sentences());
        debug!(query, hits = hits.len(), "search");
        SearchResponse {
            query: query.to_string(),
            results: hits
                .into_iter()
                .map(|hit| SearchResultView {
                    paper_id: hit.sentence.paper_id,
                    sentence_id: hit.sentence.sentence_id,
                    section: hit.sentence.section,
                    text: hit.sentence.text,
                    score: hit.score,
                })
                .collect(),
        }
    }

    /// Poll until the paper reaches READY or ERROR
    pub async fn wait_until_settled(
        &self,
        id: &PaperId,
        poll_interval: Duration,
        timeout: Duration,
    ) -> ApiResult<StatusView> {
        let poll = async {
            loop {
                match self.status(id) {
                    Ok(view) if !view.status.is_terminal() => {
                        tokio::time::sleep(poll_interval).await
                    }
                    settled => return settled,
                }
            }
        };
        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => {
                if let Ok(view) = &result {
                    info!(paper_id = %id, status = %view.status, "paper settled");
                }
                result
            }
            Err(_) => Err(ApiError::Timeout {
                id: *id,
                waited: timeout,
            }),
        }
    }

    fn paper(&self, id: &PaperId) -> ApiResult<Paper> {
        self.store.get_paper(id).ok_or(ApiError::NotFound(*id))
    }

    fn ready_paper(&self, id: &PaperId) -> ApiResult<Paper> {
        let paper = self.paper(id)?;
        if paper.status != PaperStatus::Ready {
            return Err(ApiError::Conflict {
                id: *id,
                status: paper.status,
            });
        }
        Ok(paper)
    }
}

/// Decode UTF-8, dropping invalid byte sequences
fn decode_upload(content: &[u8]) -> String {
    content.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn runtime() -> ApiResult<Handle> {
    Handle::try_current().map_err(|_| ApiError::NoRuntime)
}

/// Parse an http(s) URL with a host, returning its normalized form
fn validate_reference(raw: &str) -> ApiResult<String> {
    let url = Url::parse(raw)
        .map_err(|e| ApiError::InvalidInput(format!("malformed URL '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidInput(format!(
            "not an http(s) URL: '{}'",
            raw
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ApiError::InvalidInput(format!("URL has no host: '{}'", raw)));
    }
    Ok(url.into())
}

fn summary_text(summary: &[SummaryBullet]) -> String {
    if summary.is_empty() {
        return NO_SUMMARY.to_string();
    }
    summary
        .iter()
        .map(|bullet| bullet.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
