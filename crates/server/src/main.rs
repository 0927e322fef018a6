mod api;
mod router;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ragline_ingest::{create_embedder, ChunkBuilder, EmbeddingGenerator};
use ragline_pipeline::{DocumentPipeline, PdfExtractor};
use ragline_storage::PdfStore;
use ragline_vector::create_index;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    ragline_core::config::load_dotenv();
    let config = ragline_core::Config::from_env();
    config.log_summary();

    let store = Arc::new(PdfStore::from_config(&config).context("initializing PDF storage")?);
    info!(
        "PDF storage ready ({})",
        if store.is_remote() { "s3" } else { "local" }
    );

    let embedder = create_embedder(&config.embedding).context("initializing embedder")?;
    let generator = EmbeddingGenerator::new(embedder, config.embedding.batch_size);

    let index = create_index(&config.vector, config.embedding.dimensions)
        .context("initializing vector index")?;
    index
        .ensure_collection()
        .await
        .context("ensuring vector collection exists")?;
    info!("Vector collection '{}' ready", config.vector.collection);

    let pipeline = DocumentPipeline::new(
        Arc::new(PdfExtractor::new(store.clone())),
        ChunkBuilder::new(config.chunking.clone()),
        generator,
        index,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = router::build_router(Arc::new(state::AppState {
        config,
        store,
        pipeline,
    }));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", addr);
    info!("API docs at http://{}/docs", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
