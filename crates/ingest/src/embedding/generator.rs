//! The embedding generator: batches chunks through a backend, validates
//! dimensions, L2-normalizes every vector, and stamps provenance metadata.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ragline_core::config::EmbeddingConfig;

use crate::chunker::{Chunk, ChunkMetadata};

use super::ollama::OllamaEmbedder;
use super::openai::OpenAiEmbedder;
use super::traits::{Embedder, EmbeddingError};

/// A chunk paired with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub chunk_id: Uuid,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: EmbeddedMetadata,
}

/// Chunk metadata extended with embedding provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedMetadata {
    #[serde(flatten)]
    pub chunk: ChunkMetadata,
    pub embedding_model: String,
    pub embedding_dimension: usize,
}

/// Select the embedding backend from config. This is the single selection
/// point; call sites never branch on which variant is active.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match config.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
            config.dimensions,
        ))),
        "openai" => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                EmbeddingError::NotConfigured("OPENAI_API_KEY not set".to_string())
            })?;
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key,
                config.openai_model.clone(),
                config.openai_base_url.clone(),
                config.dimensions,
            )))
        }
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider '{other}'"
        ))),
    }
}

/// Wraps an [`Embedder`] backend with the chunk-level contract: fixed-size
/// batching for throughput (never affecting output order or values), full
/// dimension validation, and unit-norm vectors so cosine similarity and
/// dot product coincide.
pub struct EmbeddingGenerator {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl EmbeddingGenerator {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.embedder.dimensions()
    }

    /// Embed all chunks. Any backend failure fails the whole call; partial
    /// results are never returned.
    pub async fn generate_embeddings(
        &self,
        chunks: &[Chunk],
    ) -> Result<Vec<EmbeddedChunk>, EmbeddingError> {
        let mut embedded = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: batch.len(),
                    actual: vectors.len(),
                });
            }
            for (chunk, vector) in batch.iter().zip(vectors) {
                let vector = self.validate_and_normalize(vector)?;
                embedded.push(EmbeddedChunk {
                    chunk_id: chunk.chunk_id,
                    text: chunk.text.clone(),
                    embedding: vector,
                    metadata: EmbeddedMetadata {
                        chunk: chunk.metadata.clone(),
                        embedding_model: self.embedder.model().to_string(),
                        embedding_dimension: self.embedder.dimensions(),
                    },
                });
            }
        }
        Ok(embedded)
    }

    /// Embed a search query to a unit-norm vector.
    pub async fn generate_query_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embedder.embed_batch(&[text]).await?;
        if vectors.len() != 1 {
            return Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual: vectors.len(),
            });
        }
        self.validate_and_normalize(vectors.remove(0))
    }

    fn validate_and_normalize(&self, mut vector: Vec<f32>) -> Result<Vec<f32>, EmbeddingError> {
        let expected = self.embedder.dimensions();
        if vector.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TextElement;
    use crate::chunker::ChunkBuilder;
    use async_trait::async_trait;
    use ragline_core::config::ChunkingConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic fake: vector derived from text length, not normalized.
    struct FakeEmbedder {
        dims: usize,
        calls: AtomicUsize,
    }

    impl FakeEmbedder {
        fn new(dims: usize) -> Self {
            Self {
                dims,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| {
                    (0..self.dims)
                        .map(|i| (t.len() + i) as f32)
                        .collect()
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            self.dims
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    struct WrongDimsEmbedder;

    #[async_trait]
    impl Embedder for WrongDimsEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts.iter().map(|_| vec![1.0, 2.0, 3.0]).collect())
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn model(&self) -> &str {
            "wrong-dims"
        }
    }

    fn sample_chunks(count: usize) -> Vec<Chunk> {
        let builder = ChunkBuilder::new(ChunkingConfig {
            chunk_size: 512,
            chunk_overlap: 50,
            min_chunk_size: 1,
        });
        let elements: Vec<TextElement> = (0..count)
            .map(|i| {
                let mut elems = vec![TextElement::heading(format!("Section {i}"), Some(i as u32 + 1))];
                elems.push(TextElement::text(
                    format!("Body text number {i} with a few distinct words."),
                    Some(i as u32 + 1),
                ));
                elems
            })
            .flatten()
            .collect();
        let chunks = builder.create_chunks(&elements).unwrap();
        assert_eq!(chunks.len(), count);
        chunks
    }

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[tokio::test]
    async fn vectors_are_unit_norm_with_declared_dimension() {
        let generator = EmbeddingGenerator::new(Arc::new(FakeEmbedder::new(8)), 32);
        let chunks = sample_chunks(3);
        let embedded = generator.generate_embeddings(&chunks).await.unwrap();
        assert_eq!(embedded.len(), 3);
        for e in &embedded {
            assert_eq!(e.embedding.len(), 8);
            let n = norm(&e.embedding);
            assert!((0.999..=1.001).contains(&n), "norm was {n}");
            assert_eq!(e.metadata.embedding_model, "fake-model");
            assert_eq!(e.metadata.embedding_dimension, 8);
        }
    }

    #[tokio::test]
    async fn provenance_preserves_chunk_metadata() {
        let generator = EmbeddingGenerator::new(Arc::new(FakeEmbedder::new(4)), 32);
        let chunks = sample_chunks(1);
        let embedded = generator.generate_embeddings(&chunks).await.unwrap();
        assert_eq!(embedded[0].chunk_id, chunks[0].chunk_id);
        assert_eq!(embedded[0].text, chunks[0].text);
        assert_eq!(
            embedded[0].metadata.chunk.document_sections,
            chunks[0].metadata.document_sections
        );
        // Flattened serialization carries both chunk and provenance fields.
        let json = serde_json::to_value(&embedded[0].metadata).unwrap();
        assert!(json.get("start_page").is_some());
        assert!(json.get("embedding_model").is_some());
    }

    #[tokio::test]
    async fn batch_boundaries_do_not_change_output() {
        let chunks = sample_chunks(5);
        let one_batch = EmbeddingGenerator::new(Arc::new(FakeEmbedder::new(6)), 32);
        let singles = EmbeddingGenerator::new(Arc::new(FakeEmbedder::new(6)), 1);

        let a = one_batch.generate_embeddings(&chunks).await.unwrap();
        let b = singles.generate_embeddings(&chunks).await.unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.chunk_id, y.chunk_id);
            for (p, q) in x.embedding.iter().zip(&y.embedding) {
                assert!((p - q).abs() < 1e-6);
            }
        }
    }

    #[tokio::test]
    async fn batching_splits_backend_calls() {
        let embedder = Arc::new(FakeEmbedder::new(4));
        let generator = EmbeddingGenerator::new(embedder.clone(), 2);
        let chunks = sample_chunks(5);
        generator.generate_embeddings(&chunks).await.unwrap();
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn dimension_mismatch_fails_whole_call() {
        let generator = EmbeddingGenerator::new(Arc::new(WrongDimsEmbedder), 32);
        let chunks = sample_chunks(2);
        let err = generator.generate_embeddings(&chunks).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[tokio::test]
    async fn query_embedding_is_normalized() {
        let generator = EmbeddingGenerator::new(Arc::new(FakeEmbedder::new(8)), 32);
        let v = generator
            .generate_query_embedding("what is in the report?")
            .await
            .unwrap();
        assert_eq!(v.len(), 8);
        assert!((norm(&v) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn create_embedder_requires_openai_key() {
        let config = EmbeddingConfig {
            provider: "openai".into(),
            dimensions: 1536,
            batch_size: 32,
            ollama_url: "http://localhost:11434".into(),
            ollama_model: "nomic-embed-text".into(),
            openai_api_key: None,
            openai_model: "text-embedding-3-small".into(),
            openai_base_url: None,
        };
        assert!(matches!(
            create_embedder(&config),
            Err(EmbeddingError::NotConfigured(_))
        ));
    }
}
