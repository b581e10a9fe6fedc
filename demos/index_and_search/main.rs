//! # Index and Search Demo
//!
//! Builds a searchable index from plain-text documents, then previews
//! retrieval for a few queries.
//!
//! Uses `InMemoryVectorStore` and the deterministic `MockEmbeddingProvider`
//! so it runs with **zero API keys**.
//!
//! Run: `cargo run -p ragline-demos --example index_and_search`

use std::sync::Arc;

use ragline::mock::MockEmbeddingProvider;
use ragline::{
    InMemoryVectorStore, Indexer, Page, PlainTextExtractor, RagConfig, Retriever, TextExtractor,
    DEFAULT_COLLECTION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // -- 1. Extract pages from raw documents -------------------------------
    // Form feed characters mark page breaks; the handbook below has two
    // pages, the language notes a single one.
    let corpus: &[(&str, &[u8])] = &[
        (
            "handbook.txt",
            b"Refunds are issued within 14 days of purchase. Contact support \
              with your order number to start a return.\x0c\
              Shipping is free for orders above 50 euros. Expedited delivery \
              takes two business days." as &[u8],
        ),
        (
            "languages.txt",
            b"Rust is a systems programming language focused on safety, speed, \
              and concurrency. It achieves memory safety without a garbage \
              collector through its ownership system.",
        ),
    ];

    let extractor = PlainTextExtractor::new();
    let mut pages: Vec<Page> = Vec::new();
    for (name, bytes) in corpus {
        pages.extend(extractor.extract(name, bytes).await?);
    }
    println!("Extracted {} pages from {} documents", pages.len(), corpus.len());

    // -- 2. Build the index -------------------------------------------------
    // chunk_size=120 keeps chunks small for this demo; overlap=30 ensures
    // context is shared between adjacent chunks.
    let config = RagConfig::builder().chunk_size(120).chunk_overlap(30).build()?;
    let embedder = Arc::new(MockEmbeddingProvider::new(64));
    let store = Arc::new(InMemoryVectorStore::new());

    let indexer = Indexer::builder()
        .config(config)
        .embedding_provider(embedder.clone())
        .vector_store(store.clone())
        .build()?;

    let report = indexer.build_index(DEFAULT_COLLECTION, &pages).await?;
    println!(
        "Indexed {} chunks from {} pages ({} skipped)",
        report.chunks, report.pages, report.skipped_pages
    );

    // -- 3. Preview retrieval -----------------------------------------------
    let retriever = Retriever::new(embedder, store);
    let queries = ["refund window", "memory safety", "shipping cost"];

    for query in &queries {
        println!("\nQuery: \"{query}\"");
        let results = retriever.retrieve(DEFAULT_COLLECTION, query, 3).await?;
        if results.is_empty() {
            println!("  (no results)");
        } else {
            for (i, result) in results.iter().enumerate() {
                println!(
                    "  {}. [score={:.4}] {} p.{} | {}",
                    i + 1,
                    result.score,
                    result.chunk.source,
                    result.chunk.page,
                    // Show a short preview of the chunk text.
                    &result.chunk.text[..result.chunk.text.len().min(60)],
                );
            }
        }
    }

    println!("\nDone.");
    Ok(())
}
