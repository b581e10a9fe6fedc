//! Tests for in-memory vector store behavior and search ordering.

use std::collections::HashMap;

use proptest::prelude::*;
use ragline::document::Chunk;
use ragline::error::RagError;
use ragline::inmemory::InMemoryVectorStore;
use ragline::vectorstore::{Metric, VectorStore};

fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: format!("text for {id}"),
        embedding,
        source: "doc.txt".to_string(),
        page: 1,
    }
}

#[tokio::test]
async fn search_on_missing_collection_is_collection_not_found() {
    let store = InMemoryVectorStore::new();
    let err = store.search("ghost", &[1.0, 0.0], 5).await.unwrap_err();
    assert!(matches!(err, RagError::CollectionNotFound(name) if name == "ghost"));
}

#[tokio::test]
async fn upsert_on_missing_collection_is_collection_not_found() {
    let store = InMemoryVectorStore::new();
    let err = store.upsert("ghost", &[chunk("a", vec![1.0, 0.0])]).await.unwrap_err();
    assert!(matches!(err, RagError::CollectionNotFound(_)));
}

#[tokio::test]
async fn delete_collection_is_noop_when_missing() {
    let store = InMemoryVectorStore::new();
    store.delete_collection("never-created").await.unwrap();
}

#[tokio::test]
async fn create_collection_is_idempotent_and_keeps_data() {
    let store = InMemoryVectorStore::new();
    store.create_collection("docs", 2, Metric::Cosine).await.unwrap();
    store.upsert("docs", &[chunk("a", vec![1.0, 0.0])]).await.unwrap();

    store.create_collection("docs", 2, Metric::Cosine).await.unwrap();
    let results = store.search("docs", &[1.0, 0.0], 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.id, "a");
}

#[tokio::test]
async fn upsert_overwrites_by_id() {
    let store = InMemoryVectorStore::new();
    store.create_collection("docs", 2, Metric::Cosine).await.unwrap();
    store.upsert("docs", &[chunk("a", vec![1.0, 0.0])]).await.unwrap();

    let mut replacement = chunk("a", vec![0.0, 1.0]);
    replacement.text = "replaced".to_string();
    store.upsert("docs", &[replacement]).await.unwrap();

    let results = store.search("docs", &[0.0, 1.0], 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.text, "replaced");
}

#[tokio::test]
async fn cosine_metric_ignores_magnitude() {
    let store = InMemoryVectorStore::new();
    store.create_collection("docs", 2, Metric::Cosine).await.unwrap();
    // Same direction, different magnitudes: cosine scores both as 1.0.
    store
        .upsert("docs", &[chunk("unit", vec![1.0, 0.0]), chunk("long", vec![5.0, 0.0])])
        .await
        .unwrap();

    let results = store.search("docs", &[2.0, 0.0], 5).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert!((results[1].score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn dot_metric_ranks_by_raw_product() {
    let store = InMemoryVectorStore::new();
    store.create_collection("docs", 2, Metric::Dot).await.unwrap();
    store
        .upsert("docs", &[chunk("half", vec![0.5, 0.0]), chunk("unit", vec![1.0, 0.0])])
        .await
        .unwrap();

    let results = store.search("docs", &[1.0, 0.0], 5).await.unwrap();
    assert_eq!(results[0].chunk.id, "unit");
    assert!((results[0].score - 1.0).abs() < 1e-6);
    assert!((results[1].score - 0.5).abs() < 1e-6);
}

#[tokio::test]
async fn zero_magnitude_vectors_score_zero() {
    let store = InMemoryVectorStore::new();
    store.create_collection("docs", 2, Metric::Cosine).await.unwrap();
    store.upsert("docs", &[chunk("zero", vec![0.0, 0.0])]).await.unwrap();

    let results = store.search("docs", &[1.0, 0.0], 5).await.unwrap();
    assert_eq!(results[0].score, 0.0);
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate a chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| Chunk {
            id,
            text,
            embedding,
            source: "doc.txt".to_string(),
            page: 1,
        },
    )
}

/// **Property: search ordering.** *For any* set of stored chunks, searching
/// with a query embedding SHALL return results ordered by descending
/// similarity score, and the number of results SHALL be at most `top_k`.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, unique_count) = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                store.create_collection("test", DIM, Metric::Cosine).await.unwrap();

                // Deduplicate chunks by id to avoid upsert overwriting
                let mut deduped: HashMap<String, Chunk> = HashMap::new();
                for chunk in &chunks {
                    deduped.entry(chunk.id.clone()).or_insert_with(|| chunk.clone());
                }
                let unique_chunks: Vec<Chunk> = deduped.into_values().collect();
                let count = unique_chunks.len();

                store.upsert("test", &unique_chunks).await.unwrap();
                let results = store.search("test", &query, top_k).await.unwrap();
                (results, count)
            });

            // Result count is at most top_k and at most the number of stored chunks
            prop_assert!(results.len() <= top_k);
            prop_assert!(results.len() <= unique_count);

            // Results are ordered by descending score
            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}
