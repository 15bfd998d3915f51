use crate::{
    error::QueryError,
    schema::{Id, RelationKind, RelationRow},
};

use sqlx::{Pool, Postgres};

pub async fn relation_exists(
    kind: RelationKind,
    actor_id: Id,
    target_id: Id,
    pool: &Pool<Postgres>,
) -> Result<bool, QueryError> {
    let (table, target) = (kind.table(), kind.target_column());

    let result: Option<(i32,)> = sqlx::query_as(&format!(
        "SELECT id FROM {table} WHERE user_id = $1 AND {target} = $2"
    ))
    .bind(actor_id)
    .bind(target_id)
    .fetch_optional(pool)
    .await?;

    Ok(result.is_some())
}

pub async fn insert_relation(
    kind: RelationKind,
    actor_id: Id,
    target_id: Id,
    pool: &Pool<Postgres>,
) -> Result<RelationRow, QueryError> {
    let (table, target) = (kind.table(), kind.target_column());

    sqlx::query(&format!(
        "INSERT INTO {table} (user_id, {target}) VALUES ($1, $2)"
    ))
    .bind(actor_id)
    .bind(target_id)
    .execute(pool)
    .await?;

    Ok(RelationRow {
        kind,
        actor_id,
        target_id,
    })
}

pub async fn delete_relation(
    kind: RelationKind,
    actor_id: Id,
    target_id: Id,
    pool: &Pool<Postgres>,
) -> Result<u64, QueryError> {
    let (table, target) = (kind.table(), kind.target_column());

    let result = sqlx::query(&format!(
        "DELETE FROM {table} WHERE user_id = $1 AND {target} = $2"
    ))
    .bind(actor_id)
    .bind(target_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
