use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::db::{bet_repo, user_repo};
use crate::errors::AppError;
use crate::ledger::{self, LedgerEvent, ShotGraph};
use crate::AppState;

#[derive(Serialize)]
pub struct EventLogResponse {
    pub events: Vec<LedgerEvent>,
}

/// GET /data/graph — who-owes-whom graph plus leaderboard
pub async fn graph(State(state): State<AppState>) -> Result<Json<ShotGraph>, AppError> {
    let bets = bet_repo::list_all_bets(&state.db).await?;
    let users = user_repo::list_all_users(&state.db).await?;

    let graph = ledger::build_graph(&bets, &users)?;
    Ok(Json(graph))
}

/// GET /data/events — bet timeline, most recent first
pub async fn events(State(state): State<AppState>) -> Result<Json<EventLogResponse>, AppError> {
    let bets = bet_repo::list_all_bets(&state.db).await?;
    let users = user_repo::list_all_users(&state.db).await?;

    let events = ledger::build_event_log(&bets, &users)?;
    Ok(Json(EventLogResponse { events }))
}
