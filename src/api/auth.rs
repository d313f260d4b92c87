use axum::extract::{Query, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::errors::AppError;
use crate::AppState;

#[derive(Deserialize)]
pub struct UpdateKeyParam {
    secret_key: Option<String>,
}

/// Shared-secret gate for destructive operations.
///
/// When `DATA_UPDATE_KEY` is configured, every POST/PUT/DELETE request must
/// carry a `secret_key` query parameter matching it. Reads are never gated,
/// and an unset key disables the gate entirely (dev mode).
pub async fn require_update_key(
    State(state): State<AppState>,
    Query(params): Query<UpdateKeyParam>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.update_key.as_deref() else {
        return next.run(req).await;
    };

    if !matches!(req.method().as_str(), "POST" | "PUT" | "DELETE") {
        return next.run(req).await;
    }

    match params.secret_key.as_deref() {
        Some(key) if key == expected => next.run(req).await,
        _ => AppError::Unauthorized.into_response(),
    }
}
