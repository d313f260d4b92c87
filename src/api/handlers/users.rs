use axum::extract::{Path, Query, State};
use axum::Json;
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Paging;
use crate::db::{bet_repo, user_repo};
use crate::errors::AppError;
use crate::ledger::{self, ShotBalances};
use crate::models::{Bet, BetWithNames, User};
use crate::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct ShotBalancesResponse {
    pub balance: ShotBalances,
    pub user: User,
}

#[derive(Serialize)]
pub struct BetSummaryResponse {
    pub user: User,
    pub bets_owed: Vec<BetWithNames>,
    pub bets_owned: Vec<BetWithNames>,
}

async fn fetch_user(state: &AppState, user_id: i64) -> Result<User, AppError> {
    user_repo::get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /users — register a user
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<UserPayload>,
) -> Result<Json<User>, AppError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() {
        return Err(AppError::BadRequest("name and email are required".into()));
    }

    if user_repo::get_user_by_email(&state.db, &body.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let user = user_repo::create_user(&state.db, &body.name, &body.email).await?;
    counter!("users_created_total").increment(1);
    tracing::info!(user_id = user.id, "user created");

    Ok(Json(user))
}

/// GET /users — list users
pub async fn list(
    State(state): State<AppState>,
    Query(paging): Query<Paging>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = user_repo::list_users(&state.db, paging.skip, paging.limit).await?;
    Ok(Json(users))
}

/// GET /users/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let user = fetch_user(&state, user_id).await?;
    Ok(Json(user))
}

/// PUT /users/{id} — overwrite name and email
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(body): Json<UserPayload>,
) -> Result<Json<User>, AppError> {
    let existing = fetch_user(&state, user_id).await?;

    if body.name.trim().is_empty() || body.email.trim().is_empty() {
        return Err(AppError::BadRequest("name and email are required".into()));
    }

    // The email column is unique; reject a takeover of another user's address.
    if body.email != existing.email {
        if let Some(other) = user_repo::get_user_by_email(&state.db, &body.email).await? {
            if other.id != user_id {
                return Err(AppError::BadRequest("Email already registered".into()));
            }
        }
    }

    let user = user_repo::update_user(&state.db, user_id, &body.name, &body.email).await?;
    Ok(Json(user))
}

/// DELETE /users/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = user_repo::delete_user(&state.db, user_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    tracing::info!(user_id, "user deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// GET /users/{id}/shot-balances — gross per-counterparty totals
pub async fn shot_balances(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ShotBalancesResponse>, AppError> {
    let user = fetch_user(&state, user_id).await?;
    let bets = bet_repo::get_bets_for_user(&state.db, user_id).await?;
    let balance = ledger::compute_shot_balances(user_id, &bets);

    Ok(Json(ShotBalancesResponse { balance, user }))
}

/// GET /users/{id}/bets-owed — bets where the user is the bettor
pub async fn bets_owed(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Bet>>, AppError> {
    fetch_user(&state, user_id).await?;
    let bets = bet_repo::get_bets_by_bettor(&state.db, user_id).await?;
    Ok(Json(bets))
}

/// GET /users/{id}/bets-owned — bets where the user is the bettee
pub async fn bets_owned(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Bet>>, AppError> {
    fetch_user(&state, user_id).await?;
    let bets = bet_repo::get_bets_by_bettee(&state.db, user_id).await?;
    Ok(Json(bets))
}

/// GET /users/{id}/bet-summary — both sides with counterparty names joined in
pub async fn bet_summary(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<BetSummaryResponse>, AppError> {
    let user = fetch_user(&state, user_id).await?;
    let bets_owed = bet_repo::get_bets_owed_with_names(&state.db, user_id).await?;
    let bets_owned = bet_repo::get_bets_owned_with_names(&state.db, user_id).await?;

    Ok(Json(BetSummaryResponse {
        user,
        bets_owed,
        bets_owned,
    }))
}

/// GET /users/{id}/related-users — distinct counterparties
pub async fn related_users(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<User>>, AppError> {
    fetch_user(&state, user_id).await?;
    let users = user_repo::get_related_users(&state.db, user_id).await?;
    Ok(Json(users))
}
