//! Ingestion and retrieval endpoints: process, search, and the chat
//! placeholder.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use ragline_vector::ScoredChunk;

use crate::api::pipeline_error;
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ProcessRequest {
    pub pdf_key: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProcessResponse {
    pub status: String,
    pub pdf_key: String,
    pub chunk_count: usize,
    pub embedded_count: usize,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub pdf_key: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    5
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<ScoredChunk>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AskRequest {
    pub question: String,
    pub pdf_key: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AskResponse {
    pub answer: &'static str,
    pub context: &'static str,
}

/// Run the ingestion pipeline for a stored PDF
///
/// Extracts, chunks, embeds, and indexes the document in one run. Not
/// resumable: a failure at any stage requires re-running from extraction.
#[utoipa::path(
    post,
    path = "/api/v1/process",
    tag = "RAG",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Document indexed", body = ProcessResponse),
        (status = 502, description = "A pipeline stage failed", body = String)
    )
)]
pub async fn process(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, (StatusCode, String)> {
    let report = state
        .pipeline
        .process_document(&request.pdf_key)
        .await
        .map_err(pipeline_error)?;
    Ok(Json(ProcessResponse {
        status: report.status.to_string(),
        pdf_key: report.pdf_key,
        chunk_count: report.chunk_count,
        embedded_count: report.embedded_count,
    }))
}

/// Semantic search over indexed chunks
///
/// Embeds the query and returns the most similar chunks, optionally
/// restricted to one document. Failures return an error body, never a
/// partial result set.
#[utoipa::path(
    post,
    path = "/api/v1/search",
    tag = "RAG",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Ranked results", body = SearchResponse),
        (status = 502, description = "Embedding or index failure", body = String)
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let results = state
        .pipeline
        .search(&request.query, request.pdf_key.as_deref(), request.limit)
        .await
        .map_err(pipeline_error)?;
    Ok(Json(SearchResponse { results }))
}

/// Ask a question about a PDF (placeholder)
///
/// LLM answer generation is not implemented; this returns a static
/// placeholder response.
#[utoipa::path(
    post,
    path = "/api/v1/ask",
    tag = "RAG",
    request_body = AskRequest,
    responses((status = 200, description = "Placeholder answer", body = AskResponse))
)]
pub async fn ask(Json(_request): Json<AskRequest>) -> Json<AskResponse> {
    Json(AskResponse {
        answer: "This is a placeholder response. LLM integration coming soon!",
        context: "Placeholder context from PDF",
    })
}
