//! Liveness and readiness probes. Neither touches the storage backend.

pub async fn liveness() -> &'static str {
    "Healthy"
}

pub async fn readiness() -> &'static str {
    "Ready"
}
