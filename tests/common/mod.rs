//! Shared helpers for KnowFlow integration tests

#![allow(dead_code)]

use knowflow::{KnowflowApi, PaperId, StatusView};
use std::time::Duration;

pub const POLL: Duration = Duration::from_millis(5);
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// A short multi-sentence document
pub const ABSTRACT: &str = "Transformers rely on self attention to model long range context. \
We evaluate on ImageNet and report top-1 accuracy. \
Our method improves on convolutional baselines while using fewer parameters.";

/// Plain-text corpus, one document per entry
pub fn corpus() -> Vec<(&'static str, &'static str)> {
    vec![
        ("attention.txt", ABSTRACT),
        ("cats.txt", "The cat sat on the mat."),
        ("dogs.txt", "Dogs bark at the mailman every morning."),
        ("graphs.txt", "Graph neural networks pass messages between neighbouring nodes."),
    ]
}

/// Block until `id` reaches READY or ERROR
pub async fn settle(api: &KnowflowApi, id: &PaperId) -> StatusView {
    api.wait_until_settled(id, POLL, TIMEOUT)
        .await
        .expect("paper did not settle")
}

/// Upload one document and wait for it
pub async fn ingest_and_settle(api: &KnowflowApi, name: &str, text: &str) -> PaperId {
    let id = api.ingest_upload(Some(name), text.as_bytes()).unwrap();
    settle(api, &id).await;
    id
}
