use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use ragline_ingest::{ChunkBuilder, EmbeddingGenerator};
use ragline_vector::{ScoredChunk, VectorIndex};

use crate::error::PipelineError;
use crate::extract::ElementExtractor;

/// Result of one ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub status: &'static str,
    pub pdf_key: String,
    pub chunk_count: usize,
    pub embedded_count: usize,
}

/// Sequences the ingestion and retrieval flows. Holds no algorithmic logic
/// beyond ordering the stages and tagging their failures.
pub struct DocumentPipeline {
    extractor: Arc<dyn ElementExtractor>,
    builder: ChunkBuilder,
    generator: EmbeddingGenerator,
    index: Arc<dyn VectorIndex>,
}

impl DocumentPipeline {
    pub fn new(
        extractor: Arc<dyn ElementExtractor>,
        builder: ChunkBuilder,
        generator: EmbeddingGenerator,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            extractor,
            builder,
            generator,
            index,
        }
    }

    /// Run the full ingestion pipeline for one document. Not resumable: a
    /// failure anywhere requires re-running from extraction. Points are
    /// upserted only after the entire embed step succeeds, so a failed run
    /// never leaves a partial chunk set behind.
    pub async fn process_document(&self, pdf_key: &str) -> Result<IngestReport, PipelineError> {
        info!("processing '{}': extracting", pdf_key);
        let elements =
            self.extractor
                .extract(pdf_key)
                .await
                .map_err(|source| PipelineError::Extraction {
                    pdf_key: pdf_key.to_string(),
                    source,
                })?;

        info!("processing '{}': chunking {} elements", pdf_key, elements.len());
        let chunks =
            self.builder
                .create_chunks(&elements)
                .map_err(|source| PipelineError::Chunking {
                    pdf_key: pdf_key.to_string(),
                    source,
                })?;

        // A document below the minimum chunk length is a valid empty run.
        if chunks.is_empty() {
            info!("processing '{}': no chunks survived filtering", pdf_key);
            return Ok(IngestReport {
                status: "success",
                pdf_key: pdf_key.to_string(),
                chunk_count: 0,
                embedded_count: 0,
            });
        }

        info!("processing '{}': embedding {} chunks", pdf_key, chunks.len());
        let embedded = self
            .generator
            .generate_embeddings(&chunks)
            .await
            .map_err(|source| PipelineError::Embedding {
                pdf_key: pdf_key.to_string(),
                source,
            })?;

        info!("processing '{}': storing {} embeddings", pdf_key, embedded.len());
        let stored = self
            .index
            .store_embeddings(&embedded, pdf_key)
            .await
            .map_err(|source| PipelineError::Index {
                pdf_key: pdf_key.to_string(),
                source,
            })?;

        Ok(IngestReport {
            status: "success",
            pdf_key: pdf_key.to_string(),
            chunk_count: chunks.len(),
            embedded_count: stored,
        })
    }

    /// Embed the query and return the top-`limit` chunks, optionally
    /// restricted to one document.
    pub async fn search(
        &self,
        query: &str,
        pdf_key: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, PipelineError> {
        let scope = pdf_key.unwrap_or("*");
        let vector = self
            .generator
            .generate_query_embedding(query)
            .await
            .map_err(|source| PipelineError::Embedding {
                pdf_key: scope.to_string(),
                source,
            })?;
        self.index
            .search(&vector, pdf_key, limit)
            .await
            .map_err(|source| PipelineError::Index {
                pdf_key: scope.to_string(),
                source,
            })
    }

    /// Remove every indexed chunk for a document.
    pub async fn delete_document(&self, pdf_key: &str) -> Result<(), PipelineError> {
        self.index
            .delete_pdf(pdf_key)
            .await
            .map_err(|source| PipelineError::Index {
                pdf_key: pdf_key.to_string(),
                source,
            })
    }
}
