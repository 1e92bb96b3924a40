//! KnowFlow: document ingestion into per-paper knowledge graphs
//!
//! Documents (uploads or URL references) run through an asynchronous
//! extraction pipeline that derives a small knowledge graph per paper:
//! sentences with embeddings, entity nodes, relation edges and a summary.
//! Results are exposed through status polling, graph retrieval, export and
//! hybrid search.
//!
//! # Core Concepts
//!
//! - **Papers**: move QUEUED → PROCESSING → READY | ERROR inside a
//!   concurrency-safe `PaperStore`
//! - **Pipeline**: deterministic stages (segment, extract nodes, extract
//!   edges, summarize) backed by a pluggable `FeatureProvider`
//! - **Search**: lexical overlap plus an embedding signal over every stored
//!   sentence
//!
//! # Example
//!
//! ```
//! use knowflow::KnowflowApi;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let api = KnowflowApi::in_memory();
//! let id = api
//!     .ingest_upload(Some("notes.txt"), b"Transformers use attention.")
//!     .unwrap();
//! let status = api.status(&id).unwrap();
//! assert_eq!(status.title, "notes.txt");
//! # }
//! ```

pub mod api;
pub mod config;
pub mod ingest;
mod model;
pub mod pipeline;
pub mod search;
pub mod store;

pub use api::{ApiError, ApiResult, Export, ExportFormat, GraphView, KnowflowApi, StatusView};
pub use config::{Config, ConfigError};
pub use ingest::Ingestor;
pub use model::{
    Artifacts, Edge, EdgeId, EvidenceSpan, Node, NodeId, NodeType, Paper, PaperId, PaperStatus,
    Relation, Section, Sentence, SentenceId, SummaryBullet, EMBEDDING_DIM,
};
pub use pipeline::{FeatureProvider, Pipeline, PipelineError, SeededFeatures};
pub use search::{hybrid_search, SearchHit};
pub use store::{PaperStore, StoreError, StoreResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
