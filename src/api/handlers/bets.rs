use axum::extract::{Path, Query, State};
use axum::Json;
use metrics::counter;
use serde::Deserialize;
use serde_json::json;

use super::Paging;
use crate::db::{bet_repo, user_repo};
use crate::errors::AppError;
use crate::models::Bet;
use crate::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateBetRequest {
    pub bettor_id: i64,
    pub bettee_id: i64,
    pub shots: i32,
    #[serde(default)]
    pub description: String,
}

/// Partial update: absent fields keep their stored value.
#[derive(Deserialize)]
pub struct UpdateBetRequest {
    pub bettor_id: Option<i64>,
    pub bettee_id: Option<i64>,
    pub shots: Option<i32>,
    pub description: Option<String>,
    pub outcome: Option<String>,
}

async fn ensure_parties_exist(
    state: &AppState,
    bettor_id: i64,
    bettee_id: i64,
) -> Result<(), AppError> {
    let bettor = user_repo::get_user(&state.db, bettor_id).await?;
    let bettee = user_repo::get_user(&state.db, bettee_id).await?;
    if bettor.is_none() || bettee.is_none() {
        return Err(AppError::NotFound("Bettor or Bettee not found".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /bets — place a bet between two existing users
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateBetRequest>,
) -> Result<Json<Bet>, AppError> {
    if body.shots < 1 {
        return Err(AppError::BadRequest("shots must be a positive integer".into()));
    }
    ensure_parties_exist(&state, body.bettor_id, body.bettee_id).await?;

    let bet = bet_repo::create_bet(
        &state.db,
        body.bettor_id,
        body.bettee_id,
        body.shots,
        &body.description,
    )
    .await?;

    counter!("bets_created_total").increment(1);
    tracing::info!(
        bet_id = bet.id,
        bettor_id = bet.bettor_id,
        bettee_id = bet.bettee_id,
        shots = bet.shots,
        "bet created"
    );

    Ok(Json(bet))
}

/// GET /bets — list bets
pub async fn list(
    State(state): State<AppState>,
    Query(paging): Query<Paging>,
) -> Result<Json<Vec<Bet>>, AppError> {
    let bets = bet_repo::list_bets(&state.db, paging.skip, paging.limit).await?;
    Ok(Json(bets))
}

/// GET /bets/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(bet_id): Path<i64>,
) -> Result<Json<Bet>, AppError> {
    let bet = bet_repo::get_bet(&state.db, bet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Bet not found".into()))?;

    Ok(Json(bet))
}

/// PUT /bets/{id} — partial update, including outcome resolution
pub async fn update(
    State(state): State<AppState>,
    Path(bet_id): Path<i64>,
    Json(body): Json<UpdateBetRequest>,
) -> Result<Json<Bet>, AppError> {
    let existing = bet_repo::get_bet(&state.db, bet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Bet not found".into()))?;

    let bettor_id = body.bettor_id.unwrap_or(existing.bettor_id);
    let bettee_id = body.bettee_id.unwrap_or(existing.bettee_id);
    let shots = body.shots.unwrap_or(existing.shots);
    let description = body.description.unwrap_or_else(|| existing.description.clone());
    let outcome = body.outcome.or_else(|| existing.outcome.clone());

    if shots < 1 {
        return Err(AppError::BadRequest("shots must be a positive integer".into()));
    }
    ensure_parties_exist(&state, bettor_id, bettee_id).await?;

    let was_resolved = existing.outcome_state().is_resolved();

    let bet = bet_repo::update_bet(
        &state.db,
        bet_id,
        bettor_id,
        bettee_id,
        shots,
        &description,
        outcome.as_deref(),
    )
    .await?;

    if !was_resolved && bet.outcome_state().is_resolved() {
        counter!("bets_resolved_total").increment(1);
        tracing::info!(bet_id = bet.id, outcome = ?bet.outcome, "bet resolved");
    }

    Ok(Json(bet))
}

/// DELETE /bets/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(bet_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = bet_repo::delete_bet(&state.db, bet_id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("Bet not found".into()));
    }

    tracing::info!(bet_id, "bet deleted");
    Ok(Json(json!({ "message": "Bet deleted successfully" })))
}
