//! Tests for index construction over mock embedding and store backends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ragline::document::{Chunk, Page, SearchResult};
use ragline::error::{RagError, Result};
use ragline::inmemory::InMemoryVectorStore;
use ragline::mock::MockEmbeddingProvider;
use ragline::vectorstore::{Metric, VectorStore};
use ragline::{EmbeddingProvider, Indexer, RagConfig};

fn indexer_over(store: Arc<InMemoryVectorStore>, config: RagConfig) -> Indexer {
    Indexer::builder()
        .config(config)
        .embedding_provider(Arc::new(MockEmbeddingProvider::new(32)))
        .vector_store(store)
        .build()
        .unwrap()
}

async fn all_ids(store: &InMemoryVectorStore, collection: &str) -> Vec<String> {
    let query = MockEmbeddingProvider::new(32).embed("probe").await.unwrap();
    let mut ids: Vec<String> = store
        .search(collection, &query, 1000)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.chunk.id)
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn build_reports_pages_chunks_and_skips() {
    let store = Arc::new(InMemoryVectorStore::new());
    let indexer = indexer_over(store.clone(), RagConfig::default());

    let pages = vec![
        Page::new("doc", 1, "abcdefghij".repeat(200)),
        Page::new("doc", 2, "   \n\t  "),
        Page::new("notes.txt", 1, "hello   world"),
    ];
    let report = indexer.build_index("docs", &pages).await.unwrap();

    assert_eq!(report.pages, 2);
    assert_eq!(report.skipped_pages, 1);
    assert_eq!(report.chunks, 5);

    let ids = all_ids(&store, "docs").await;
    assert_eq!(
        ids,
        vec![
            "doc-1-chunk0",
            "doc-1-chunk1",
            "doc-1-chunk2",
            "doc-1-chunk3",
            "notes.txt-1-chunk0",
        ]
    );
}

#[tokio::test]
async fn page_text_is_whitespace_normalized_before_chunking() {
    let store = Arc::new(InMemoryVectorStore::new());
    let indexer = indexer_over(store.clone(), RagConfig::default());

    let pages = vec![Page::new("notes.txt", 1, "hello \t  world\n\nagain")];
    indexer.build_index("docs", &pages).await.unwrap();

    let query = MockEmbeddingProvider::new(32).embed("probe").await.unwrap();
    let results = store.search("docs", &query, 10).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.text, "hello world again");
    assert_eq!(results[0].chunk.source, "notes.txt");
    assert_eq!(results[0].chunk.page, 1);
}

#[tokio::test]
async fn default_chunker_follows_config_geometry() {
    let store = Arc::new(InMemoryVectorStore::new());
    let config = RagConfig::builder().chunk_size(10).chunk_overlap(3).build().unwrap();
    let indexer = indexer_over(store.clone(), config);

    let report = indexer
        .build_index("docs", &[Page::new("doc", 1, "a".repeat(20))])
        .await
        .unwrap();
    assert_eq!(report.chunks, 3);
}

#[tokio::test]
async fn rebuild_replaces_stale_chunks() {
    let store = Arc::new(InMemoryVectorStore::new());
    let indexer = indexer_over(store.clone(), RagConfig::default());

    indexer
        .build_index("docs", &[Page::new("old.txt", 1, "alpha beta gamma")])
        .await
        .unwrap();
    indexer
        .build_index("docs", &[Page::new("new.txt", 1, "delta epsilon")])
        .await
        .unwrap();

    let ids = all_ids(&store, "docs").await;
    assert_eq!(ids, vec!["new.txt-1-chunk0"]);
}

#[tokio::test]
async fn rebuilding_the_same_corpus_is_idempotent() {
    let store = Arc::new(InMemoryVectorStore::new());
    let indexer = indexer_over(store.clone(), RagConfig::default());
    let pages =
        vec![Page::new("doc", 1, "abcdefghij".repeat(200)), Page::new("doc", 2, "tail page")];

    let first = indexer.build_index("docs", &pages).await.unwrap();
    let first_ids = all_ids(&store, "docs").await;

    let second = indexer.build_index("docs", &pages).await.unwrap();
    let second_ids = all_ids(&store, "docs").await;

    assert_eq!(first, second);
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn empty_corpus_fails_before_touching_the_store() {
    let store = Arc::new(InMemoryVectorStore::new());
    store.create_collection("docs", 32, Metric::Cosine).await.unwrap();
    let seeded = Chunk {
        id: "keep-1-chunk0".to_string(),
        text: "survives".to_string(),
        embedding: MockEmbeddingProvider::new(32).embed("survives").await.unwrap(),
        source: "keep".to_string(),
        page: 1,
    };
    store.upsert("docs", &[seeded]).await.unwrap();

    let indexer = indexer_over(store.clone(), RagConfig::default());
    let err = indexer
        .build_index("docs", &[Page::new("doc", 1, "   "), Page::new("doc", 2, "")])
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::EmptyCorpus));

    // The previous index is still intact.
    let ids = all_ids(&store, "docs").await;
    assert_eq!(ids, vec!["keep-1-chunk0"]);
}

#[tokio::test]
async fn batch_size_does_not_change_the_result() {
    let pages = vec![
        Page::new("a.txt", 1, "abcdefghij".repeat(200)),
        Page::new("b.txt", 1, "one two three four five"),
    ];

    let small_batches = Arc::new(InMemoryVectorStore::new());
    let config = RagConfig::builder().batch_size(2).build().unwrap();
    indexer_over(small_batches.clone(), config).build_index("docs", &pages).await.unwrap();

    let one_batch = Arc::new(InMemoryVectorStore::new());
    indexer_over(one_batch.clone(), RagConfig::default())
        .build_index("docs", &pages)
        .await
        .unwrap();

    assert_eq!(all_ids(&small_batches, "docs").await, all_ids(&one_batch, "docs").await);
}

#[tokio::test]
async fn builder_rejects_missing_components() {
    let err = Indexer::builder().build().unwrap_err();
    assert!(matches!(err, RagError::InvalidConfiguration(_)));

    let err = Indexer::builder().config(RagConfig::default()).build().unwrap_err();
    assert!(matches!(err, RagError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn builder_rejects_config_with_zero_batch_size() {
    // A handwritten config skips builder validation; the indexer re-checks.
    let config = RagConfig { batch_size: 0, ..RagConfig::default() };
    let err = Indexer::builder()
        .config(config)
        .embedding_provider(Arc::new(MockEmbeddingProvider::new(32)))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, RagError::InvalidConfiguration(msg) if msg.contains("batch_size")));
}

#[tokio::test]
async fn debug_output_shows_the_config() {
    let indexer = indexer_over(Arc::new(InMemoryVectorStore::new()), RagConfig::default());
    let rendered = format!("{indexer:?}");
    assert!(rendered.starts_with("Indexer"));
    assert!(rendered.contains("chunk_size: 800"));
}

struct FailingStore;

#[async_trait]
impl VectorStore for FailingStore {
    async fn create_collection(&self, _: &str, _: usize, _: Metric) -> Result<()> {
        Ok(())
    }

    async fn delete_collection(&self, _: &str) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, _: &str, _: &[Chunk]) -> Result<()> {
        Err(RagError::Store { backend: "failing".to_string(), message: "disk full".to_string() })
    }

    async fn search(&self, _: &str, _: &[f32], _: usize) -> Result<Vec<SearchResult>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn store_failure_surfaces_as_index_write_failure() {
    let indexer = Indexer::builder()
        .config(RagConfig::default())
        .embedding_provider(Arc::new(MockEmbeddingProvider::new(32)))
        .vector_store(Arc::new(FailingStore))
        .build()
        .unwrap();

    let err = indexer
        .build_index("docs", &[Page::new("doc", 1, "some text")])
        .await
        .unwrap_err();
    match err {
        RagError::IndexWriteFailure { operation, collection, message } => {
            assert_eq!(operation, "upsert");
            assert_eq!(collection, "docs");
            assert!(message.contains("disk full"));
        }
        other => panic!("expected IndexWriteFailure, got {other:?}"),
    }
}

struct SlowEmbedder;

#[async_trait]
impl EmbeddingProvider for SlowEmbedder {
    async fn embed(&self, _: &str) -> Result<Vec<f32>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![1.0, 0.0])
    }

    fn dimensions(&self) -> usize {
        2
    }
}

#[tokio::test(start_paused = true)]
async fn unresponsive_embedder_times_out() {
    let config = RagConfig::builder()
        .service_timeout(Some(Duration::from_secs(1)))
        .build()
        .unwrap();
    let indexer = Indexer::builder()
        .config(config)
        .embedding_provider(Arc::new(SlowEmbedder))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();

    let err = indexer
        .build_index("docs", &[Page::new("doc", 1, "some text")])
        .await
        .unwrap_err();
    match err {
        RagError::ServiceUnavailable { service, timeout } => {
            assert_eq!(service, "embedding provider");
            assert_eq!(timeout, Duration::from_secs(1));
        }
        other => panic!("expected ServiceUnavailable, got {other:?}"),
    }
}
