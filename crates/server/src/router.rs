//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single
//! `Router`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/health", get(api::health::health))
        .route("/config", get(api::health::config))
        .route(
            "/api/v1/upload-pdf",
            post(api::pdfs::upload_pdf).layer(DefaultBodyLimit::max(100 * 1024 * 1024)),
        )
        .route("/api/v1/pdfs", get(api::pdfs::list_pdfs))
        .route("/api/v1/pdfs/{key}", delete(api::pdfs::delete_pdf))
        .route("/api/v1/process", post(api::rag::process))
        .route("/api/v1/search", post(api::rag::search))
        .route("/api/v1/ask", post(api::rag::ask))
        .layer(cors)
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => CorsLayer::permissive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::path::PathBuf;
    use tower::ServiceExt;

    use ragline_core::config::{
        AwsConfig, ChunkingConfig, Config, EmbeddingConfig, ServerConfig, StorageConfig,
        VectorConfig,
    };
    use ragline_ingest::{ChunkBuilder, Embedder, EmbeddingError, EmbeddingGenerator, TextElement};
    use ragline_pipeline::{DocumentPipeline, ElementExtractor, ExtractError};
    use ragline_storage::PdfStore;
    use ragline_vector::MemoryIndex;

    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|t| vec![t.len() as f32 + 1.0, 1.0, 1.0, 1.0])
                .collect())
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn model(&self) -> &str {
            "length-embedder"
        }
    }

    struct CannedExtractor;

    #[async_trait]
    impl ElementExtractor for CannedExtractor {
        async fn extract(&self, _pdf_key: &str) -> Result<Vec<TextElement>, ExtractError> {
            Ok(vec![
                TextElement::heading("Report", Some(1)),
                TextElement::text("The quarterly revenue grew by twelve percent.", Some(1)),
            ])
        }
    }

    fn test_config(data_dir: PathBuf) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                cors_origin: "*".into(),
            },
            storage: StorageConfig { data_dir },
            aws: AwsConfig {
                region: "eu-central-1".into(),
                access_key_id: None,
                secret_access_key: None,
                session_token: None,
                s3_bucket: None,
                s3_prefix: None,
                endpoint_url: None,
            },
            vector: VectorConfig {
                provider: "memory".into(),
                url: "http://localhost:6333".into(),
                api_key: None,
                collection: "pdf_chunks".into(),
                batch_size: 100,
            },
            embedding: EmbeddingConfig {
                provider: "ollama".into(),
                dimensions: 4,
                batch_size: 32,
                ollama_url: "http://localhost:11434".into(),
                ollama_model: "nomic-embed-text".into(),
                openai_api_key: None,
                openai_model: "text-embedding-3-small".into(),
                openai_base_url: None,
            },
            chunking: ChunkingConfig {
                chunk_size: 512,
                chunk_overlap: 50,
                min_chunk_size: 10,
            },
        }
    }

    fn test_app(tmp: &tempfile::TempDir) -> Router {
        let config = test_config(tmp.path().to_path_buf());
        let store = Arc::new(PdfStore::local(tmp.path()).unwrap());
        let pipeline = DocumentPipeline::new(
            Arc::new(CannedExtractor),
            ChunkBuilder::new(config.chunking.clone()),
            EmbeddingGenerator::new(Arc::new(LengthEmbedder), config.embedding.batch_size),
            Arc::new(MemoryIndex::new(4)),
        );
        build_router(Arc::new(AppState {
            config,
            store,
            pipeline,
        }))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_body(filename: &str, content: &[u8]) -> (String, Vec<u8>) {
        let boundary = "test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }

    #[tokio::test]
    async fn health_reports_component_config() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["storage_backend"], "local");
        assert_eq!(json["embedding_provider"], "ollama");
    }

    #[tokio::test]
    async fn upload_rejects_non_pdf_filenames() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let (content_type, body) = multipart_body("notes.txt", b"plain text");
        let response = app
            .oneshot(
                Request::post("/api/v1/upload-pdf")
                    .header("content-type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_stores_under_uuid_key() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let (content_type, body) = multipart_body("report.pdf", b"%PDF-1.4 fake");
        let response = app
            .oneshot(
                Request::post("/api/v1/upload-pdf")
                    .header("content-type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "uploaded");
        assert_eq!(json["filename"], "report.pdf");
        assert!(json["key"].as_str().unwrap().ends_with("_report.pdf"));
    }

    #[tokio::test]
    async fn process_then_search_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/process")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"pdf_key": "x_report.pdf"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["chunk_count"], 1);
        assert_eq!(json["embedded_count"], 1);

        let response = app
            .oneshot(
                Request::post("/api/v1/search")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"query": "revenue growth", "pdf_key": "x_report.pdf"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["pdf_key"], "x_report.pdf");
        assert!(results[0]["text"]
            .as_str()
            .unwrap()
            .contains("quarterly revenue"));
    }

    #[tokio::test]
    async fn ask_returns_placeholder() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app
            .oneshot(
                Request::post("/api/v1/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"question": "what grew?", "pdf_key": "x_report.pdf"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["answer"].as_str().unwrap().contains("placeholder"));
    }
}
