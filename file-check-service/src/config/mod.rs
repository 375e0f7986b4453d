use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct FileCheckConfig {
    pub common: core_config::Config,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Bucket holding the checked objects. Never empty.
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<Secret<String>>,
    pub secret_access_key: Option<Secret<String>>,
    /// Override for S3-compatible stores (MinIO, LocalStack, ...).
    pub endpoint_url: Option<String>,
    pub local_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Local,
    S3,
}

impl FileCheckConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env, PORT and logging settings)
        let common_config = core_config::Config::load()?;

        Ok(FileCheckConfig {
            common: common_config,
            storage: StorageConfig::from_source(|key| env::var(key).ok())?,
        })
    }
}

impl StorageConfig {
    /// Build storage settings from a key lookup. `FileCheckConfig::load`
    /// passes the process environment.
    pub fn from_source<F>(source: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(StorageConfig {
            backend: get_env(&source, "STORAGE_BACKEND", Some("s3"))?
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            bucket: get_env(&source, "BUCKET_NAME", None)?,
            region: get_env(&source, "AWS_REGION", Some("us-west-2"))?,
            access_key_id: optional_env(&source, "AWS_ACCESS_KEY").map(Secret::new),
            secret_access_key: optional_env(&source, "AWS_SECRET_KEY").map(Secret::new),
            endpoint_url: optional_env(&source, "AWS_ENDPOINT_URL"),
            local_path: get_env(&source, "STORAGE_LOCAL_PATH", Some("storage"))?,
        })
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "s3" => Ok(StorageBackend::S3),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

// Empty values count as unset.
fn optional_env<F>(source: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    source(key).filter(|val| !val.is_empty())
}

fn get_env<F>(source: &F, key: &str, default: Option<&str>) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match optional_env(source, key) {
        Some(val) => Ok(val),
        None => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}
