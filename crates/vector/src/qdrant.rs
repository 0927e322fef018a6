//! Qdrant backend speaking the JSON REST API via reqwest.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use ragline_core::config::VectorConfig;
use ragline_ingest::EmbeddedChunk;

use crate::error::IndexError;
use crate::index::VectorIndex;
use crate::types::ScoredChunk;

pub struct QdrantIndex {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
    dimensions: usize,
    batch_size: usize,
}

impl QdrantIndex {
    pub fn new(config: &VectorConfig, dimensions: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
            dimensions,
            batch_size: config.batch_size.max(1),
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.collection, suffix)
    }

    async fn error_for_status(response: Response) -> Result<Response, IndexError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(IndexError::Api { status, body })
    }

    fn pdf_key_filter(pdf_key: &str) -> serde_json::Value {
        json!({
            "must": [
                { "key": "pdf_key", "match": { "value": pdf_key } }
            ]
        })
    }
}

#[derive(Deserialize)]
struct ExistsResponse {
    result: ExistsResult,
}

#[derive(Deserialize)]
struct ExistsResult {
    exists: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    id: Uuid,
    score: f32,
    payload: SearchPayload,
}

#[derive(Deserialize)]
struct SearchPayload {
    text: String,
    pdf_key: String,
    #[serde(default)]
    metadata: serde_json::Value,
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self) -> Result<(), IndexError> {
        let response = self
            .request(self.client.get(self.collection_url("/exists")))
            .send()
            .await?;
        let exists: ExistsResponse = Self::error_for_status(response).await?.json().await?;
        if exists.result.exists {
            debug!("collection '{}' already exists", self.collection);
            return Ok(());
        }

        let body = json!({
            "vectors": { "size": self.dimensions, "distance": "Cosine" }
        });
        let response = self
            .request(self.client.put(self.collection_url("")))
            .json(&body)
            .send()
            .await?;
        match Self::error_for_status(response).await {
            Ok(_) => {
                info!(
                    "created collection '{}' (dim={}, distance=Cosine)",
                    self.collection, self.dimensions
                );
                Ok(())
            }
            // A concurrent creator won the race; the collection is there.
            Err(IndexError::Api { status: 409, .. }) => Ok(()),
            Err(IndexError::Api { status, body }) if body.contains("already exists") => {
                debug!("collection create raced ({status}), treating as satisfied");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn store_embeddings(
        &self,
        chunks: &[EmbeddedChunk],
        pdf_key: &str,
    ) -> Result<usize, IndexError> {
        // Dimension mismatch is a configuration error; check everything
        // before the first network call.
        for chunk in chunks {
            if chunk.embedding.len() != self.dimensions {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: chunk.embedding.len(),
                });
            }
        }

        for batch in chunks.chunks(self.batch_size) {
            let points: Vec<serde_json::Value> = batch
                .iter()
                .map(|chunk| {
                    json!({
                        "id": chunk.chunk_id,
                        "vector": chunk.embedding,
                        "payload": {
                            "text": chunk.text,
                            "pdf_key": pdf_key,
                            "metadata": chunk.metadata,
                        }
                    })
                })
                .collect();
            let response = self
                .request(
                    self.client
                        .put(self.collection_url("/points"))
                        .query(&[("wait", "true")]),
                )
                .json(&json!({ "points": points }))
                .send()
                .await?;
            Self::error_for_status(response).await?;
        }

        info!("stored {} embeddings for pdf '{}'", chunks.len(), pdf_key);
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

        let mut body = json!({
            "vector": query_vector,
            "limit": limit,
            "with_payload": true,
        });
        if let Some(key) = pdf_key {
            body["filter"] = Self::pdf_key_filter(key);
        }

        let response = self
            .request(self.client.post(self.collection_url("/points/search")))
            .json(&body)
            .send()
            .await?;
        let parsed: SearchResponse = Self::error_for_status(response).await?.json().await?;

        Ok(parsed
            .result
            .into_iter()
            .map(|hit| ScoredChunk {
                chunk_id: hit.id,
                text: hit.payload.text,
                pdf_key: hit.payload.pdf_key,
                metadata: hit.payload.metadata,
                score: hit.score,
            })
            .collect())
    }

    async fn delete_pdf(&self, pdf_key: &str) -> Result<(), IndexError> {
        let response = self
            .request(
                self.client
                    .post(self.collection_url("/points/delete"))
                    .query(&[("wait", "true")]),
            )
            .json(&json!({ "filter": Self::pdf_key_filter(pdf_key) }))
            .send()
            .await?;
        Self::error_for_status(response).await?;
        info!("deleted all points for pdf '{}'", pdf_key);
        Ok(())
    }
}
