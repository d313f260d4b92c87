use sqlx::PgPool;

use crate::models::User;

/// Insert a new user.
pub async fn create_user(pool: &PgPool, name: &str, email: &str) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Fetch a user by id.
pub async fn get_user(pool: &PgPool, user_id: i64) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Fetch a user by email (unique).
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// List users in id order with offset/limit paging.
pub async fn list_users(pool: &PgPool, skip: i64, limit: i64) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Fetch every user.
pub async fn list_all_users(pool: &PgPool) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(users)
}

/// Overwrite a user's name and email.
pub async fn update_user(
    pool: &PgPool,
    user_id: i64,
    name: &str,
    email: &str,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET name = $2, email = $3
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Delete a user. Returns the number of rows removed.
pub async fn delete_user(pool: &PgPool, user_id: i64) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Distinct counterparties this user has bet with, on either side,
/// excluding the user itself.
pub async fn get_related_users(pool: &PgPool, user_id: i64) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users
        WHERE id IN (
            SELECT bettee_id FROM bets WHERE bettor_id = $1
            UNION
            SELECT bettor_id FROM bets WHERE bettee_id = $1
        )
        AND id <> $1
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
