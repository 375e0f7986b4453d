#![allow(dead_code)]

use async_trait::async_trait;
use file_check_service::config::{FileCheckConfig, StorageBackend, StorageConfig};
use file_check_service::services::{ObjectLookup, ObjectMetadata, ObjectStore};
use file_check_service::startup::{build_router, AppState, Application};
use service_core::config::Config as CoreConfig;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_BUCKET: &str = "test-bucket";

/// Internal detail the failing store reports. Must never reach a response body.
pub const FAILURE_DETAIL: &str = "AccessDenied: request signature mismatch (req 7F3A)";

/// In-memory stand-in for the object store that counts lookups.
pub struct FakeStore {
    objects: HashSet<String>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_objects(keys: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            objects: keys.iter().map(|k| k.to_string()).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            objects: HashSet::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    async fn head_object(&self, key: &str) -> ObjectLookup {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            ObjectLookup::Failed(anyhow::anyhow!(FAILURE_DETAIL))
        } else if self.objects.contains(key) {
            ObjectLookup::Found(ObjectMetadata {
                content_length: Some(42),
                ..Default::default()
            })
        } else {
            ObjectLookup::NotFound
        }
    }
}

pub fn test_config() -> FileCheckConfig {
    FileCheckConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        storage: StorageConfig {
            backend: StorageBackend::S3,
            bucket: TEST_BUCKET.to_string(),
            region: "us-west-2".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint_url: None,
            local_path: "storage".to_string(),
        },
    }
}

pub fn test_router(storage: Arc<dyn ObjectStore>) -> axum::Router {
    build_router(AppState { storage })
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(storage: Arc<dyn ObjectStore>) -> Self {
        let app = Application::with_storage(test_config(), storage)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    pub async fn spawn_with_config(config: FileCheckConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    async fn run(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling the liveness endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/healthz", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
