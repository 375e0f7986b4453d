pub mod files;
pub mod health;
pub mod metrics;

pub use files::check_file;
pub use health::{liveness, readiness};
pub use self::metrics::metrics_endpoint;
