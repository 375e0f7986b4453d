use crate::config::{StorageBackend, StorageConfig};
use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Metadata returned by a successful lookup. Every field is optional since
/// backends report different subsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMetadata {
    pub content_length: Option<i64>,
    pub content_type: Option<String>,
    pub e_tag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Outcome of a metadata-only lookup.
#[derive(Debug)]
pub enum ObjectLookup {
    Found(ObjectMetadata),
    NotFound,
    /// Any other failure. The error is for server-side logs only.
    Failed(anyhow::Error),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket the store is bound to.
    fn bucket(&self) -> &str;

    /// Check whether `key` exists without transferring its body.
    async fn head_object(&self, key: &str) -> ObjectLookup;
}

/// Build the backend selected by `config.backend`.
pub async fn from_config(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, AppError> {
    match config.backend {
        StorageBackend::S3 => Ok(Arc::new(S3Storage::from_config(config).await)),
        StorageBackend::Local => {
            let root = Path::new(&config.local_path);
            Ok(Arc::new(LocalStorage::new(root, &config.bucket).await?))
        }
    }
}

pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        // Without both halves of a static key, fall back to the SDK's default chain.
        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id.expose_secret(),
                secret.expose_secret(),
                None,
                None,
                "file-check-config",
            ));
        }

        let sdk_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "S3 storage initialized"
        );

        Self::new(S3Client::from_conf(builder.build()), config.bucket.clone())
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn head_object(&self, key: &str) -> ObjectLookup {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(output) => ObjectLookup::Found(ObjectMetadata {
                content_length: output.content_length(),
                content_type: output.content_type().map(str::to_string),
                e_tag: output.e_tag().map(str::to_string),
                last_modified: output
                    .last_modified()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos())),
            }),
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_not_found()) {
                    ObjectLookup::NotFound
                } else {
                    ObjectLookup::Failed(
                        anyhow::Error::new(err).context("S3 head_object request failed"),
                    )
                }
            }
        }
    }
}

/// Filesystem-backed store rooted at `<base_path>/<bucket>`, for local runs.
pub struct LocalStorage {
    bucket: String,
    root: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>, bucket: &str) -> Result<Self, AppError> {
        let root = base_path.into().join(bucket);
        fs::create_dir_all(&root).await?;
        tracing::info!(root = %root.display(), "Local storage initialized");
        Ok(Self {
            bucket: bucket.to_string(),
            root,
        })
    }

    /// Map a key onto a path under the root. Keys that could escape it
    /// resolve to `None`.
    fn object_path(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let mut components = relative.components().peekable();
        components.peek()?;
        if components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
            Some(self.root.join(relative))
        } else {
            None
        }
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn head_object(&self, key: &str) -> ObjectLookup {
        let Some(path) = self.object_path(key) else {
            return ObjectLookup::NotFound;
        };

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => ObjectLookup::Found(ObjectMetadata {
                content_length: i64::try_from(meta.len()).ok(),
                content_type: None,
                e_tag: None,
                last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
            }),
            Ok(_) => ObjectLookup::NotFound,
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
                ObjectLookup::NotFound
            }
            Err(e) => ObjectLookup::Failed(
                anyhow::Error::new(e).context(format!("Failed to stat {}", path.display())),
            ),
        }
    }
}
