//! Raw PDF management: upload, listing, deletion.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use ragline_storage::{PdfStore, PRESIGN_TTL};

use crate::api::pipeline_error;
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub filename: String,
    pub key: String,
    pub url: Option<String>,
    pub status: &'static str,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PdfSummary {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub filename: String,
    pub key: String,
    pub size: u64,
    #[schema(value_type = String)]
    pub uploaded_at: DateTime<Utc>,
    pub url: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub status: &'static str,
    pub key: String,
}

/// Upload a PDF
///
/// Stores the raw bytes under a collision-proof `{uuid}_{filename}` key.
/// The document is not indexed until `/api/v1/process` is called with the
/// returned key.
#[utoipa::path(
    post,
    path = "/api/v1/upload-pdf",
    tag = "PDFs",
    request_body(content_type = "multipart/form-data", description = "PDF file upload"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file or not a PDF", body = String)
    )
)]
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("multipart error: {e}")))?
        .ok_or((StatusCode::BAD_REQUEST, "no file provided".to_string()))?;

    let filename = field.file_name().unwrap_or("unnamed").to_string();
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err((StatusCode::BAD_REQUEST, "file must be a PDF".to_string()));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("failed to read file: {e}")))?;

    let key = PdfStore::make_key(&filename);
    state
        .store
        .put_pdf(&key, bytes)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("upload failed: {e}")))?;

    info!("uploaded '{}' as '{}'", filename, key);
    let url = presign_quietly(&state.store, &key).await;

    Ok(Json(UploadResponse {
        id: Uuid::new_v4(),
        filename,
        key,
        url,
        status: "uploaded",
    }))
}

/// List stored PDFs
#[utoipa::path(
    get,
    path = "/api/v1/pdfs",
    tag = "PDFs",
    responses((status = 200, description = "Stored PDFs", body = [PdfSummary]))
)]
pub async fn list_pdfs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PdfSummary>>, (StatusCode, String)> {
    let objects = state
        .store
        .list_pdfs()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("listing failed: {e}")))?;

    let mut pdfs = Vec::with_capacity(objects.len());
    for object in objects {
        let url = presign_quietly(&state.store, &object.key).await;
        pdfs.push(PdfSummary {
            id: Uuid::new_v4(),
            filename: PdfStore::display_name(&object.key).to_string(),
            key: object.key,
            size: object.size,
            uploaded_at: object.last_modified,
            url,
        });
    }
    Ok(Json(pdfs))
}

/// Delete a PDF and its indexed chunks
///
/// Index deletion is authoritative; removal of the raw object is
/// best-effort and logged on failure.
#[utoipa::path(
    delete,
    path = "/api/v1/pdfs/{key}",
    tag = "PDFs",
    params(("key" = String, Path, description = "Stored PDF key")),
    responses(
        (status = 200, description = "Document removed", body = DeleteResponse),
        (status = 502, description = "Index deletion failed", body = String)
    )
)]
pub async fn delete_pdf(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>, (StatusCode, String)> {
    state
        .pipeline
        .delete_document(&key)
        .await
        .map_err(pipeline_error)?;

    if let Err(e) = state.store.delete_pdf(&key).await {
        warn!("raw object cleanup failed for '{}': {e}", key);
    }

    Ok(Json(DeleteResponse {
        status: "deleted",
        key,
    }))
}

async fn presign_quietly(store: &PdfStore, key: &str) -> Option<String> {
    match store.presign_get(key, PRESIGN_TTL).await {
        Ok(url) => url,
        Err(e) => {
            warn!("presign failed for '{}': {e}", key);
            None
        }
    }
}
