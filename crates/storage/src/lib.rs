//! Object storage for raw PDFs: a thin forwarding layer over object_store
//! with a config-driven Local/S3 backend split.

pub mod backend;
pub mod error;

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use object_store::path::Path;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

pub use backend::{LocalBackend, S3Backend, StorageBackend};
pub use error::StorageError;

/// Default TTL for presigned download URLs.
pub const PRESIGN_TTL: Duration = Duration::from_secs(3600);

/// A stored PDF object as seen in listings.
#[derive(Debug, Clone, Serialize)]
pub struct PdfObject {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Raw-PDF store: put/get/list/delete/presign, keyed by opaque string keys.
pub struct PdfStore {
    backend: StorageBackend,
}

impl PdfStore {
    /// Select the backend from config: S3 when AWS is configured, otherwise
    /// the local filesystem under `{data_dir}/uploads`.
    pub fn from_config(config: &ragline_core::Config) -> Result<Self, StorageError> {
        let backend = if config.aws.is_configured() {
            StorageBackend::S3(S3Backend::new(&config.aws)?)
        } else {
            let uploads = config.storage.data_dir.join("uploads");
            StorageBackend::Local(LocalBackend::new(&uploads)?)
        };
        Ok(Self { backend })
    }

    pub fn local(root: &std::path::Path) -> Result<Self, StorageError> {
        Ok(Self {
            backend: StorageBackend::Local(LocalBackend::new(root)?),
        })
    }

    pub fn is_remote(&self) -> bool {
        self.backend.is_remote()
    }

    /// Collision-proof upload key for an original filename.
    pub fn make_key(filename: &str) -> String {
        format!("{}_{}", Uuid::new_v4(), filename)
    }

    /// Original filename for display: the key with its UUID prefix stripped.
    pub fn display_name(key: &str) -> &str {
        key.split_once('_').map(|(_, name)| name).unwrap_or(key)
    }

    fn object_path(&self, key: &str) -> Path {
        let prefix = self.backend.prefix();
        if prefix.is_empty() {
            Path::from(key)
        } else {
            Path::from(format!("{prefix}/{key}"))
        }
    }

    /// Store raw PDF bytes under `key`.
    pub async fn put_pdf(&self, key: &str, bytes: Bytes) -> Result<(), StorageError> {
        let path = self.object_path(key);
        self.backend.store().put(&path, bytes.into()).await?;
        info!("stored pdf '{}'", key);
        Ok(())
    }

    /// Fetch raw PDF bytes for extraction.
    pub async fn get_pdf(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.object_path(key);
        Ok(self.backend.store().get(&path).await?.bytes().await?)
    }

    /// List stored PDFs (`.pdf` keys only) under the configured prefix.
    pub async fn list_pdfs(&self) -> Result<Vec<PdfObject>, StorageError> {
        let prefix = self.backend.prefix();
        let list_prefix = if prefix.is_empty() {
            None
        } else {
            Some(Path::from(prefix))
        };

        let mut stream = self.backend.store().list(list_prefix.as_ref());
        let mut objects = Vec::new();
        while let Some(meta) = stream.try_next().await? {
            let key = match meta.location.filename() {
                Some(name) if name.to_lowercase().ends_with(".pdf") => name.to_string(),
                _ => continue,
            };
            objects.push(PdfObject {
                key,
                size: meta.size as u64,
                last_modified: meta.last_modified,
            });
        }
        objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(objects)
    }

    /// Remove the raw object for `key`.
    pub async fn delete_pdf(&self, key: &str) -> Result<(), StorageError> {
        let path = self.object_path(key);
        self.backend.store().delete(&path).await?;
        info!("deleted pdf '{}'", key);
        Ok(())
    }

    /// Presigned GET URL, or `None` on the local backend.
    pub async fn presign_get(
        &self,
        key: &str,
        ttl: Duration,
    ) -> Result<Option<String>, StorageError> {
        let path = self.object_path(key);
        self.backend.signed_get_url(&path, ttl).await
    }
}
