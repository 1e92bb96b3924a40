//! Paper lifecycle under the asynchronous ingestor
//!
//! Covers status progression, all-or-nothing artifact commits, concurrent
//! ingestions and the structural guarantees of a READY graph.

mod common;

use common::{corpus, ingest_and_settle, settle, ABSTRACT};
use knowflow::{KnowflowApi, PaperId, PaperStatus, Pipeline};
use std::collections::HashSet;
use std::time::Duration;

fn rank(status: PaperStatus) -> u8 {
    match status {
        PaperStatus::Queued => 0,
        PaperStatus::Processing => 1,
        PaperStatus::Ready | PaperStatus::Error => 2,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn upload_settles_ready_with_graph() {
    let api = KnowflowApi::in_memory();
    let id = api.ingest_upload(Some("attention.txt"), ABSTRACT.as_bytes()).unwrap();

    let view = settle(&api, &id).await;
    assert_eq!(view.status, PaperStatus::Ready);
    assert_eq!(view.title, "attention.txt");
    assert!(view.error_message.is_none());
    assert!(view.updated_at >= view.created_at);

    let graph = api.graph(&id).unwrap();
    assert!(!graph.nodes.is_empty());
    assert!(graph.nodes.len() <= 8);
    assert!(!graph.summary.is_empty());
    assert!(graph.summary.len() <= 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn status_never_moves_backwards() {
    let api = KnowflowApi::in_memory();
    let id = api.ingest_upload(Some("attention.txt"), ABSTRACT.as_bytes()).unwrap();

    let observer = {
        let api = api.clone();
        tokio::spawn(async move {
            let mut seen = Vec::new();
            loop {
                let status = api.status(&id).unwrap().status;
                seen.push(status);
                if status.is_terminal() {
                    return seen;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
    };

    let seen = observer.await.unwrap();
    assert!(seen.windows(2).all(|w| rank(w[0]) <= rank(w[1])));
    assert_eq!(seen.last(), Some(&PaperStatus::Ready));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn artifacts_are_visible_only_when_ready() {
    let api = KnowflowApi::in_memory();
    let id = api.ingest_upload(Some("attention.txt"), ABSTRACT.as_bytes()).unwrap();

    loop {
        let paper = api.store().get_paper(&id).unwrap();
        match paper.status {
            PaperStatus::Ready => {
                assert!(!paper.sentences.is_empty());
                assert!(!paper.nodes.is_empty());
                assert!(!paper.summary.is_empty());
                break;
            }
            PaperStatus::Error => panic!("unexpected failure: {:?}", paper.error_message),
            _ => {
                assert!(paper.sentences.is_empty());
                assert!(paper.nodes.is_empty());
                assert!(paper.edges.is_empty());
                assert!(paper.summary.is_empty());
            }
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_ingestions_all_settle_independently() {
    let api = KnowflowApi::in_memory();
    let docs = corpus();

    let ids: Vec<PaperId> = docs
        .iter()
        .map(|(name, text)| api.ingest_upload(Some(name), text.as_bytes()).unwrap())
        .collect();
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());

    for (id, (name, _)) in ids.iter().zip(&docs) {
        let view = settle(&api, id).await;
        assert_eq!(view.status, PaperStatus::Ready);
        assert_eq!(&view.title, name);
    }
    assert_eq!(api.store().len(), docs.len());

    // Sentences never leak across papers
    for id in &ids {
        let paper = api.store().get_paper(id).unwrap();
        assert!(paper.sentences.iter().all(|s| s.paper_id == *id));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ready_graph_is_internally_consistent() {
    let api = KnowflowApi::in_memory();
    let id = ingest_and_settle(&api, "attention.txt", ABSTRACT).await;
    let paper = api.store().get_paper(&id).unwrap();

    let sentence_ids: HashSet<_> = paper.sentences.iter().map(|s| s.sentence_id).collect();
    let node_ids: HashSet<_> = paper.nodes.iter().map(|n| n.node_id).collect();

    for sentence in &paper.sentences {
        assert_eq!(sentence.embedding.len(), knowflow::EMBEDDING_DIM);
        assert!(sentence.text.chars().count() <= 120);
    }
    for node in &paper.nodes {
        assert_eq!(node.evidence.len(), 1);
        assert!(sentence_ids.contains(&node.evidence[0].sentence_id));
        assert!((0.0..1.0).contains(&node.score));
    }
    for edge in &paper.edges {
        assert!(node_ids.contains(&edge.src));
        assert!(node_ids.contains(&edge.dst));
        assert_ne!(edge.src, edge.dst);
    }
    assert_eq!(paper.edges.len(), paper.nodes.len() / 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pipeline_output_is_reproducible_per_paper() {
    let pipeline = Pipeline::default();
    let id = PaperId::new();

    let first = pipeline.run(&id, ABSTRACT).unwrap();
    let second = pipeline.run(&id, ABSTRACT).unwrap();
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn empty_upload_uses_placeholder_text() {
    let api = KnowflowApi::in_memory();
    let id = api.ingest_upload(None, b"").unwrap();

    let view = settle(&api, &id).await;
    assert_eq!(view.status, PaperStatus::Ready);
    assert_eq!(view.title, "Untitled PDF");

    let paper = api.store().get_paper(&id).unwrap();
    assert_eq!(paper.source, "upload");
    assert_eq!(paper.sentences.len(), 1);
    assert_eq!(paper.sentences[0].text, "Placeholder content for empty PDF");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn blank_upload_keeps_raw_text_and_default_label() {
    let api = KnowflowApi::in_memory();
    let id = ingest_and_settle(&api, "blank.txt", "   ").await;

    let paper = api.store().get_paper(&id).unwrap();
    assert_eq!(paper.status, PaperStatus::Ready);
    assert_eq!(paper.sentences.len(), 1);
    assert_eq!(paper.sentences[0].text, "   ");
    assert_eq!(paper.nodes.len(), 1);
    assert_eq!(paper.nodes[0].label, "Entity");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn invalid_utf8_is_dropped_not_rejected() {
    let api = KnowflowApi::in_memory();
    let id = api.ingest_upload(Some("bytes.bin"), b"Valid \xff\xfeprefix text").unwrap();

    assert_eq!(settle(&api, &id).await.status, PaperStatus::Ready);
    let paper = api.store().get_paper(&id).unwrap();
    let text: String = paper.sentences.iter().map(|s| s.text.as_str()).collect();
    assert!(!text.contains('\u{fffd}'));
    assert!(text.contains("prefix"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reference_ingestion_records_url_as_source() {
    let api = KnowflowApi::in_memory();
    let url = "https://arxiv.org/abs/1706.03762";
    let id = api.ingest_reference(url).unwrap();

    let view = settle(&api, &id).await;
    assert_eq!(view.status, PaperStatus::Ready);
    assert_eq!(view.title, "arXiv draft");

    let paper = api.store().get_paper(&id).unwrap();
    assert_eq!(paper.source, url);
    assert!(paper.sentences[0]
        .text
        .starts_with("Synthetic content pulled from"));
}
