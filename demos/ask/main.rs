//! # Ask Demo
//!
//! The full question-answering flow: index a corpus, then ask questions and
//! print cited answers.
//!
//! Swap `MockCompletionModel` for a real [`CompletionModel`] implementation
//! (and `MockEmbeddingProvider` for the `openai` feature's provider) to run
//! against live services.
//!
//! Run: `cargo run -p ragline-demos --example ask`

use std::sync::Arc;

use ragline::mock::{MockCompletionModel, MockEmbeddingProvider};
use ragline::{
    AnswerPipeline, CompletionModel, InMemoryVectorStore, Indexer, Page, RagConfig,
    DEFAULT_COLLECTION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // -- 1. Index a small corpus --------------------------------------------
    let pages = vec![
        Page::new(
            "policies.txt",
            1,
            "Refunds are issued within 14 days of purchase. Contact support \
             with your order number to start a return.",
        ),
        Page::new(
            "policies.txt",
            2,
            "Shipping is free for orders above 50 euros. Expedited delivery \
             takes two business days.",
        ),
        Page::new(
            "faq.txt",
            1,
            "Support is available on weekdays between 9:00 and 17:00 CET via \
             chat and email.",
        ),
    ];

    let config = RagConfig::builder().chunk_size(120).chunk_overlap(30).top_k(3).build()?;
    let embedder = Arc::new(MockEmbeddingProvider::new(64));
    let store = Arc::new(InMemoryVectorStore::new());

    let indexer = Indexer::builder()
        .config(config.clone())
        .embedding_provider(embedder.clone())
        .vector_store(store.clone())
        .build()?;
    let report = indexer.build_index(DEFAULT_COLLECTION, &pages).await?;
    println!("Indexed {} chunks from {} pages", report.chunks, report.pages);

    // -- 2. Build the answering pipeline ------------------------------------
    // The mock model answers with a fixed string; a real backend would read
    // the assembled prompt and ground its answer in the context blocks.
    let model: Arc<dyn CompletionModel> =
        Arc::new(MockCompletionModel::new("Refunds are issued within 14 days of purchase."));

    let pipeline = AnswerPipeline::builder()
        .config(config)
        .embedding_provider(embedder)
        .vector_store(store)
        .completion_model(model)
        .build()?;

    // -- 3. Ask questions ----------------------------------------------------
    let questions = ["how long do I have to request a refund?", "when is support reachable?"];

    for question in &questions {
        println!("\nQ: {question}");
        let answer = pipeline.answer(DEFAULT_COLLECTION, question).await?;
        println!("A: {}", answer.text);
        println!("Sources:");
        for citation in &answer.sources {
            println!("  - {citation}");
        }
    }

    println!("\nDone.");
    Ok(())
}
