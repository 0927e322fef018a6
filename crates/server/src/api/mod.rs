//! HTTP handlers, grouped by concern.

pub mod doc;
pub mod health;
pub mod pdfs;
pub mod rag;

use axum::http::StatusCode;

use ragline_pipeline::PipelineError;

/// Map a pipeline failure to a stage-tagged HTTP error body.
pub(crate) fn pipeline_error(err: PipelineError) -> (StatusCode, String) {
    tracing::error!("pipeline failure in {} stage: {err}", err.stage());
    (StatusCode::BAD_GATEWAY, format!("[{}] {err}", err.stage()))
}
