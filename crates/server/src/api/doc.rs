//! OpenAPI documentation aggregator.
//!
//! Collects all `#[utoipa::path]`-annotated handlers and `ToSchema`-derived
//! types into a single OpenAPI 3.1 spec, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ragline API",
        version = "0.1.0",
        description = "PDF retrieval backend: upload, chunk, embed, and search documents.",
    ),
    tags(
        (name = "Health", description = "Server readiness and configuration"),
        (name = "PDFs", description = "Raw PDF upload, listing, and deletion"),
        (name = "RAG", description = "Document ingestion and semantic search"),
    ),
    paths(
        // Health
        crate::api::health::health,
        crate::api::health::config,
        // PDFs
        crate::api::pdfs::upload_pdf,
        crate::api::pdfs::list_pdfs,
        crate::api::pdfs::delete_pdf,
        // RAG
        crate::api::rag::process,
        crate::api::rag::search,
        crate::api::rag::ask,
    ),
    components(schemas(
        crate::api::health::HealthResponse,
        crate::api::pdfs::UploadResponse,
        crate::api::pdfs::PdfSummary,
        crate::api::pdfs::DeleteResponse,
        crate::api::rag::ProcessRequest,
        crate::api::rag::ProcessResponse,
        crate::api::rag::SearchRequest,
        crate::api::rag::SearchResponse,
        crate::api::rag::AskRequest,
        crate::api::rag::AskResponse,
    ))
)]
pub struct ApiDoc;
