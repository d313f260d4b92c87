use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_update_key;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Service routes — never gated
    let service = Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Ledger API. Mutating methods pass through the shared-secret gate.
    let api = Router::new()
        // Users
        .route(
            "/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/users/:id",
            get(handlers::users::detail)
                .put(handlers::users::update)
                .delete(handlers::users::remove),
        )
        .route("/users/:id/shot-balances", get(handlers::users::shot_balances))
        .route("/users/:id/bets-owed", get(handlers::users::bets_owed))
        .route("/users/:id/bets-owned", get(handlers::users::bets_owned))
        .route("/users/:id/bet-summary", get(handlers::users::bet_summary))
        .route("/users/:id/related-users", get(handlers::users::related_users))
        // Bets
        .route(
            "/bets",
            get(handlers::bets::list).post(handlers::bets::create),
        )
        .route(
            "/bets/:id",
            get(handlers::bets::detail)
                .put(handlers::bets::update)
                .delete(handlers::bets::remove),
        )
        // Derived views
        .route("/data/graph", get(handlers::data::graph))
        .route("/data/events", get(handlers::data::events))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_update_key,
        ));

    // CORS: the original service allowed any origin for its dashboard
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    service
        .merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
