pub mod bets;
pub mod data;
pub mod health;
pub mod metrics;
pub mod users;

use axum::Json;
use serde::Deserialize;
use serde_json::json;

pub async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the betting API!" }))
}

/// Offset/limit paging for list endpoints.
#[derive(Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}
