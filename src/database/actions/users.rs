use crate::{
    error::QueryError,
    pagination::Pagination,
    schema::{NewUser, User},
};

use sqlx::{Pool, Postgres};

pub async fn insert_user(user: NewUser, pool: &Pool<Postgres>) -> Result<User, QueryError> {
    let row: User = sqlx::query_as(
        "
        INSERT INTO users (email, username, first_name, last_name, password, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *;
    ",
    )
    .bind(user.email)
    .bind(user.username)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.password)
    .bind(user.role)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_user(id: i32, pool: &Pool<Postgres>) -> Result<Option<User>, QueryError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn list_users(
    pagination: Pagination,
    pool: &Pool<Postgres>,
) -> Result<(Vec<User>, i64), QueryError> {
    let rows: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY id DESC LIMIT $1 OFFSET $2")
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(pool)
        .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok((rows, total.0))
}

pub async fn list_subscriptions(
    user_id: i32,
    pagination: Pagination,
    pool: &Pool<Postgres>,
) -> Result<(Vec<User>, i64), QueryError> {
    let rows: Vec<User> = sqlx::query_as(
        "
        SELECT u.*
        FROM subscriptions s
        INNER JOIN users u ON u.id = s.author_id
        WHERE s.user_id = $1
        ORDER BY s.id DESC
        LIMIT $2 OFFSET $3
    ",
    )
    .bind(user_id)
    .bind(pagination.limit)
    .bind(pagination.offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok((rows, total.0))
}
