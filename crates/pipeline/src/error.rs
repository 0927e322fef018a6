use thiserror::Error;

use ragline_ingest::{ChunkError, EmbeddingError};
use ragline_vector::IndexError;

use crate::extract::ExtractError;

/// Stage-tagged pipeline failure. Every variant carries the document key
/// and the underlying stage error; the first failure aborts the run with
/// no partial indexing.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extraction failed for '{pdf_key}': {source}")]
    Extraction {
        pdf_key: String,
        #[source]
        source: ExtractError,
    },

    #[error("chunking failed for '{pdf_key}': {source}")]
    Chunking {
        pdf_key: String,
        #[source]
        source: ChunkError,
    },

    #[error("embedding failed for '{pdf_key}': {source}")]
    Embedding {
        pdf_key: String,
        #[source]
        source: EmbeddingError,
    },

    #[error("index operation failed for '{pdf_key}': {source}")]
    Index {
        pdf_key: String,
        #[source]
        source: IndexError,
    },
}

impl PipelineError {
    /// Stage name for logs and HTTP error bodies.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Extraction { .. } => "extraction",
            PipelineError::Chunking { .. } => "chunking",
            PipelineError::Embedding { .. } => "embedding",
            PipelineError::Index { .. } => "index",
        }
    }

    pub fn pdf_key(&self) -> &str {
        match self {
            PipelineError::Extraction { pdf_key, .. }
            | PipelineError::Chunking { pdf_key, .. }
            | PipelineError::Embedding { pdf_key, .. }
            | PipelineError::Index { pdf_key, .. } => pdf_key,
        }
    }
}
