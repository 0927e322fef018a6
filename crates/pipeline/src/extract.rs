//! The extraction collaborator seam.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use ragline_ingest::TextElement;
use ragline_storage::{PdfStore, StorageError};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Parse(#[from] ragline_ingest::extract::ExtractError),
}

/// Supplies the ordered element sequence for a document key.
#[async_trait]
pub trait ElementExtractor: Send + Sync {
    async fn extract(&self, pdf_key: &str) -> Result<Vec<TextElement>, ExtractError>;
}

/// Production extractor: fetch the raw PDF from the store and parse it into
/// typed elements.
pub struct PdfExtractor {
    store: Arc<PdfStore>,
}

impl PdfExtractor {
    pub fn new(store: Arc<PdfStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ElementExtractor for PdfExtractor {
    async fn extract(&self, pdf_key: &str) -> Result<Vec<TextElement>, ExtractError> {
        let bytes = self.store.get_pdf(pdf_key).await?;
        let elements = ragline_ingest::extract::extract_elements(&bytes)?;
        debug!("extracted {} elements from '{}'", elements.len(), pdf_key);
        Ok(elements)
    }
}
