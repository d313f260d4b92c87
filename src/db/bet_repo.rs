use sqlx::PgPool;

use crate::models::{Bet, BetWithNames};

/// Insert a new bet between two existing users.
pub async fn create_bet(
    pool: &PgPool,
    bettor_id: i64,
    bettee_id: i64,
    shots: i32,
    description: &str,
) -> anyhow::Result<Bet> {
    let bet = sqlx::query_as::<_, Bet>(
        r#"
        INSERT INTO bets (bettor_id, bettee_id, shots, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(bettor_id)
    .bind(bettee_id)
    .bind(shots)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(bet)
}

/// Fetch a bet by id.
pub async fn get_bet(pool: &PgPool, bet_id: i64) -> anyhow::Result<Option<Bet>> {
    let bet = sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1")
        .bind(bet_id)
        .fetch_optional(pool)
        .await?;

    Ok(bet)
}

/// List bets in id order with offset/limit paging.
pub async fn list_bets(pool: &PgPool, skip: i64, limit: i64) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>(
        "SELECT * FROM bets ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

/// Fetch the full bet set, for the graph and event-log derivations.
pub async fn list_all_bets(pool: &PgPool) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>("SELECT * FROM bets ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(bets)
}

/// Overwrite every mutable field of a bet.
pub async fn update_bet(
    pool: &PgPool,
    bet_id: i64,
    bettor_id: i64,
    bettee_id: i64,
    shots: i32,
    description: &str,
    outcome: Option<&str>,
) -> anyhow::Result<Bet> {
    let bet = sqlx::query_as::<_, Bet>(
        r#"
        UPDATE bets
        SET bettor_id = $2,
            bettee_id = $3,
            shots = $4,
            description = $5,
            outcome = $6
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(bet_id)
    .bind(bettor_id)
    .bind(bettee_id)
    .bind(shots)
    .bind(description)
    .bind(outcome)
    .fetch_one(pool)
    .await?;

    Ok(bet)
}

/// Delete a bet. Returns the number of rows removed.
pub async fn delete_bet(pool: &PgPool, bet_id: i64) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM bets WHERE id = $1")
        .bind(bet_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Bets where the user is the bettor (owes shots).
pub async fn get_bets_by_bettor(pool: &PgPool, user_id: i64) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>(
        "SELECT * FROM bets WHERE bettor_id = $1 ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

/// Bets where the user is the bettee (is owed shots).
pub async fn get_bets_by_bettee(pool: &PgPool, user_id: i64) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>(
        "SELECT * FROM bets WHERE bettee_id = $1 ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

/// Every bet the user appears in, on either side. Input for the balance
/// aggregation.
pub async fn get_bets_for_user(pool: &PgPool, user_id: i64) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>(
        "SELECT * FROM bets WHERE bettor_id = $1 OR bettee_id = $1 ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

/// Bets where the user is the bettor, with both party names joined in.
pub async fn get_bets_owed_with_names(
    pool: &PgPool,
    user_id: i64,
) -> anyhow::Result<Vec<BetWithNames>> {
    let bets = sqlx::query_as::<_, BetWithNames>(
        r#"
        SELECT b.id, b.date_created, b.bettor_id, b.bettee_id, b.shots,
               b.description, b.outcome,
               bettor.name AS bettor_name, bettee.name AS bettee_name
        FROM bets b
        JOIN users bettor ON bettor.id = b.bettor_id
        JOIN users bettee ON bettee.id = b.bettee_id
        WHERE b.bettor_id = $1
        ORDER BY b.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

/// Bets where the user is the bettee, with both party names joined in.
pub async fn get_bets_owned_with_names(
    pool: &PgPool,
    user_id: i64,
) -> anyhow::Result<Vec<BetWithNames>> {
    let bets = sqlx::query_as::<_, BetWithNames>(
        r#"
        SELECT b.id, b.date_created, b.bettor_id, b.bettee_id, b.shots,
               b.description, b.outcome,
               bettor.name AS bettor_name, bettee.name AS bettee_name
        FROM bets b
        JOIN users bettor ON bettor.id = b.bettor_id
        JOIN users bettee ON bettee.id = b.bettee_id
        WHERE b.bettee_id = $1
        ORDER BY b.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}
