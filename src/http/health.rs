//! Liveness probe.

use axum::Json;
use serde_json::{Value, json};

/// Reports that the process is serving requests.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
