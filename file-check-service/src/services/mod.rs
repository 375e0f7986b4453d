pub mod metrics;
pub mod storage;

pub use self::metrics::{get_metrics, init_metrics};
pub use storage::{LocalStorage, ObjectLookup, ObjectMetadata, ObjectStore, S3Storage};
