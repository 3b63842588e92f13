use axum::Json;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const HEALTH_PATH: &str = "/health";

/// Liveness probe.
#[allow(clippy::unused_async)]
pub async fn health_check() -> Json<Value> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(json!({
        "status": "healthy",
        "timestamp": timestamp,
    }))
}
