use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub aws: AwsConfig,
    pub vector: VectorConfig,
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            storage: StorageConfig::from_env(),
            aws: AwsConfig::from_env(),
            vector: VectorConfig::from_env(),
            embedding: EmbeddingConfig::from_env(),
            chunking: ChunkingConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  server:    port={}", self.server.port);
        tracing::info!("  storage:   data_dir={}", self.storage.data_dir.display());
        tracing::info!(
            "  aws:       region={}, bucket={}",
            self.aws.region,
            self.aws.s3_bucket.as_deref().unwrap_or("(none -> local uploads)")
        );
        tracing::info!(
            "  vector:    provider={}, url={}, collection={}",
            self.vector.provider,
            self.vector.url,
            self.vector.collection
        );
        tracing::info!(
            "  embedding: provider={}, dimensions={}, batch_size={}",
            self.embedding.provider,
            self.embedding.dimensions,
            self.embedding.batch_size
        );
        tracing::info!(
            "  chunking:  chunk_size={}, overlap={}, min={}",
            self.chunking.chunk_size,
            self.chunking.chunk_overlap,
            self.chunking.min_chunk_size
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "server": { "host": self.server.host, "port": self.server.port },
            "storage": { "data_dir": self.storage.data_dir },
            "aws": {
                "region": self.aws.region,
                "s3_bucket": self.aws.s3_bucket,
                "configured": self.aws.is_configured(),
            },
            "vector": {
                "provider": self.vector.provider,
                "url": self.vector.url,
                "collection": self.vector.collection,
                "batch_size": self.vector.batch_size,
            },
            "embedding": {
                "provider": self.embedding.provider,
                "dimensions": self.embedding.dimensions,
                "batch_size": self.embedding.batch_size,
                "configured": self.embedding.is_configured(),
            },
            "chunking": {
                "chunk_size": self.chunking.chunk_size,
                "chunk_overlap": self.chunking.chunk_overlap,
                "min_chunk_size": self.chunking.min_chunk_size,
            },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 8000),
            cors_origin: env_or("CORS_ORIGIN", "*"),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            data_dir: PathBuf::from(env_or("DATA_DIR", "data")),
        }
    }
}

// ── AWS / S3 ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env() -> Self {
        Self {
            region: env_or("AWS_REGION", "eu-central-1"),
            access_key_id: env_opt("AWS_ACCESS_KEY_ID"),
            secret_access_key: env_opt("AWS_SECRET_ACCESS_KEY"),
            session_token: env_opt("AWS_SESSION_TOKEN"),
            s3_bucket: env_opt("S3_BUCKET"),
            s3_prefix: env_opt("S3_PREFIX"),
            endpoint_url: env_opt("AWS_ENDPOINT_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_key_id.is_some() && self.s3_bucket.is_some()
    }
}

// ── Vector index ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    /// "qdrant" or "memory" (dev/test backend).
    pub provider: String,
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
    /// Points per upsert request.
    pub batch_size: usize,
}

impl VectorConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("VECTOR_PROVIDER", "qdrant"),
            url: env_or("QDRANT_URL", "http://localhost:6333"),
            api_key: env_opt("QDRANT_API_KEY"),
            collection: env_or("QDRANT_COLLECTION", "pdf_chunks"),
            batch_size: env_usize("QDRANT_BATCH_SIZE", 100),
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama" or "openai".
    pub provider: String,
    pub dimensions: usize,
    /// Chunks per embedding request.
    pub batch_size: usize,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
}

impl EmbeddingConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("EMBEDDING_PROVIDER", "ollama"),
            dimensions: env_usize("EMBEDDING_DIMENSIONS", 768),
            batch_size: env_usize("EMBEDDING_BATCH_SIZE", 32),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            openai_base_url: env_opt("OPENAI_BASE_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Token budget per chunk (1 token ~= 4 chars).
    pub chunk_size: usize,
    /// Characters of trailing context carried across a semantic split.
    pub chunk_overlap: usize,
    /// Minimum chunk length in characters; shorter chunks are dropped.
    pub min_chunk_size: usize,
}

impl ChunkingConfig {
    fn from_env() -> Self {
        Self {
            chunk_size: env_usize("CHUNK_SIZE", 512),
            chunk_overlap: env_usize("CHUNK_OVERLAP", 50),
            min_chunk_size: env_usize("MIN_CHUNK_SIZE", 100),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 50,
            min_chunk_size: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_defaults() {
        let c = ChunkingConfig::default();
        assert_eq!(c.chunk_size, 512);
        assert_eq!(c.chunk_overlap, 50);
        assert_eq!(c.min_chunk_size, 100);
    }

    #[test]
    fn redacted_summary_has_no_secrets() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8000,
                cors_origin: "*".into(),
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
            },
            aws: AwsConfig {
                region: "eu-central-1".into(),
                access_key_id: Some("AKIA-SECRET".into()),
                secret_access_key: Some("very-secret".into()),
                session_token: None,
                s3_bucket: Some("pdfs".into()),
                s3_prefix: None,
                endpoint_url: None,
            },
            vector: VectorConfig {
                provider: "qdrant".into(),
                url: "http://localhost:6333".into(),
                api_key: Some("qdrant-secret".into()),
                collection: "pdf_chunks".into(),
                batch_size: 100,
            },
            embedding: EmbeddingConfig {
                provider: "openai".into(),
                dimensions: 1536,
                batch_size: 32,
                ollama_url: "http://localhost:11434".into(),
                ollama_model: "nomic-embed-text".into(),
                openai_api_key: Some("sk-secret".into()),
                openai_model: "text-embedding-3-small".into(),
                openai_base_url: None,
            },
            chunking: ChunkingConfig::default(),
        };

        let summary = config.redacted_summary().to_string();
        assert!(!summary.contains("very-secret"));
        assert!(!summary.contains("sk-secret"));
        assert!(!summary.contains("qdrant-secret"));
        assert!(summary.contains("pdf_chunks"));
    }
}
