//! In-memory brute-force index with the same observable semantics as the
//! Qdrant backend. Used when `VECTOR_PROVIDER=memory` and as a test double.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use ragline_ingest::EmbeddedChunk;

use crate::error::IndexError;
use crate::index::VectorIndex;
use crate::types::ScoredChunk;

struct MemoryPoint {
    vector: Vec<f32>,
    text: String,
    pdf_key: String,
    metadata: serde_json::Value,
}

pub struct MemoryIndex {
    dimensions: usize,
    points: RwLock<HashMap<Uuid, MemoryPoint>>,
}

impl MemoryIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            points: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored points (test support).
    pub async fn len(&self) -> usize {
        self.points.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.points.read().await.is_empty()
    }
}

/// Stored vectors are unit-norm, so the dot product is cosine similarity.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn ensure_collection(&self) -> Result<(), IndexError> {
        Ok(())
    }

    async fn store_embeddings(
        &self,
        chunks: &[EmbeddedChunk],
        pdf_key: &str,
    ) -> Result<usize, IndexError> {
        for chunk in chunks {
            if chunk.embedding.len() != self.dimensions {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: chunk.embedding.len(),
                });
            }
        }

        let mut points = self.points.write().await;
        for chunk in chunks {
            // Last write wins per chunk id, matching upsert semantics.
            points.insert(
                chunk.chunk_id,
                MemoryPoint {
                    vector: chunk.embedding.clone(),
                    text: chunk.text.clone(),
                    pdf_key: pdf_key.to_string(),
                    metadata: serde_json::to_value(&chunk.metadata)
                        .map_err(|e| IndexError::InvalidResponse(e.to_string()))?,
                },
            );
        }
        Ok(chunks.len())
    }

    async fn search(
        &self,
        query_vector: &[f32],
        pdf_key: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        if query_vector.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query_vector.len(),
            });
        }

        let points = self.points.read().await;
        let mut hits: Vec<ScoredChunk> = points
            .iter()
            .filter(|(_, p)| pdf_key.map_or(true, |key| p.pdf_key == key))
            .map(|(id, p)| ScoredChunk {
                chunk_id: *id,
                text: p.text.clone(),
                pdf_key: p.pdf_key.clone(),
                metadata: p.metadata.clone(),
                score: dot(query_vector, &p.vector),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn delete_pdf(&self, pdf_key: &str) -> Result<(), IndexError> {
        self.points
            .write()
            .await
            .retain(|_, p| p.pdf_key != pdf_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragline_ingest::chunker::ChunkMetadata;
    use ragline_ingest::EmbeddedMetadata;
    use std::collections::BTreeSet;

    fn embedded(id: Uuid, vector: Vec<f32>, text: &str) -> EmbeddedChunk {
        let dimension = vector.len();
        EmbeddedChunk {
            chunk_id: id,
            text: text.to_string(),
            embedding: vector,
            metadata: EmbeddedMetadata {
                chunk: ChunkMetadata {
                    start_page: 1,
                    end_page: 1,
                    document_sections: BTreeSet::from(["text".to_string()]),
                    original_length: text.len(),
                },
                embedding_model: "fake-model".into(),
                embedding_dimension: dimension,
            },
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_per_chunk_id() {
        let index = MemoryIndex::new(2);
        let id = Uuid::new_v4();
        let chunk = embedded(id, vec![1.0, 0.0], "v1");
        index.store_embeddings(&[chunk], "a.pdf").await.unwrap();

        let updated = embedded(id, vec![0.0, 1.0], "v2");
        index.store_embeddings(&[updated], "a.pdf").await.unwrap();

        assert_eq!(index.len().await, 1);
        let hits = index.search(&[0.0, 1.0], None, 10).await.unwrap();
        assert_eq!(hits[0].text, "v2");
    }

    #[tokio::test]
    async fn results_rank_by_descending_similarity() {
        let index = MemoryIndex::new(2);
        let chunks = vec![
            embedded(Uuid::new_v4(), vec![1.0, 0.0], "east"),
            embedded(Uuid::new_v4(), vec![0.0, 1.0], "north"),
            embedded(
                Uuid::new_v4(),
                vec![0.707, 0.707],
                "northeast",
            ),
        ];
        index.store_embeddings(&chunks, "a.pdf").await.unwrap();

        let hits = index.search(&[1.0, 0.0], None, 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "east");
        assert_eq!(hits[1].text, "northeast");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn filter_restricts_to_exact_pdf_key() {
        let index = MemoryIndex::new(2);
        index
            .store_embeddings(&[embedded(Uuid::new_v4(), vec![1.0, 0.0], "in a")], "a.pdf")
            .await
            .unwrap();
        index
            .store_embeddings(&[embedded(Uuid::new_v4(), vec![1.0, 0.0], "in b")], "b.pdf")
            .await
            .unwrap();

        let hits = index.search(&[1.0, 0.0], Some("a.pdf"), 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits.iter().all(|h| h.pdf_key == "a.pdf"));

        // Exact match, not prefix.
        let hits = index.search(&[1.0, 0.0], Some("a"), 10).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_every_point_for_the_key() {
        let index = MemoryIndex::new(2);
        let a: Vec<EmbeddedChunk> = (0..3)
            .map(|_| embedded(Uuid::new_v4(), vec![1.0, 0.0], "a"))
            .collect();
        index.store_embeddings(&a, "a.pdf").await.unwrap();
        index
            .store_embeddings(&[embedded(Uuid::new_v4(), vec![1.0, 0.0], "b")], "b.pdf")
            .await
            .unwrap();

        index.delete_pdf("a.pdf").await.unwrap();

        let hits = index.search(&[1.0, 0.0], Some("a.pdf"), 10).await.unwrap();
        assert!(hits.is_empty());
        assert_eq!(index.len().await, 1);
    }

    #[tokio::test]
    async fn query_dimension_is_checked() {
        let index = MemoryIndex::new(4);
        let err = index.search(&[1.0, 0.0], None, 5).await.unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }
}
