use std::sync::Arc;

use async_trait::async_trait;

use ragline_core::config::VectorConfig;
use ragline_ingest::EmbeddedChunk;

use crate::error::IndexError;
use crate::memory::MemoryIndex;
use crate::qdrant::QdrantIndex;
use crate::types::ScoredChunk;

/// A store of (vector, payload) points keyed by chunk id, grouped by
/// `pdf_key`. All failures propagate unmodified; the caller owns retry
/// policy.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the backing collection if absent; idempotent and safe to call
    /// concurrently from multiple instances.
    async fn ensure_collection(&self) -> Result<(), IndexError>;

    /// Upsert one point per chunk under `pdf_key`. Idempotent per chunk id:
    /// re-storing overwrites rather than duplicating. Returns the number of
    /// points written.
    async fn store_embeddings(
        &self,
        chunks: &[EmbeddedChunk],
        pdf_key: &str,
    ) -> Result<usize, IndexError>;

    /// Top-`limit` points by descending similarity, optionally restricted
    /// to an exact-match `pdf_key`.
    async fn search(
        &self,
        query_vector: &[f32],
        pdf_key: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, IndexError>;

    /// Bulk-delete every point whose payload `pdf_key` equals the given key.
    async fn delete_pdf(&self, pdf_key: &str) -> Result<(), IndexError>;
}

/// Select the index backend from config; the single selection point.
pub fn create_index(
    config: &VectorConfig,
    dimensions: usize,
) -> Result<Arc<dyn VectorIndex>, IndexError> {
    match config.provider.as_str() {
        "qdrant" => Ok(Arc::new(QdrantIndex::new(config, dimensions))),
        "memory" => Ok(Arc::new(MemoryIndex::new(dimensions))),
        other => Err(IndexError::NotConfigured(format!(
            "unknown vector provider '{other}'"
        ))),
    }
}
