use crate::{error::QueryError, schema::Ingredient};

use sqlx::{Pool, Postgres};

pub async fn insert_ingredient(
    name: &str,
    unit: &str,
    pool: &Pool<Postgres>,
) -> Result<Ingredient, QueryError> {
    let row: Ingredient = sqlx::query_as(
        "INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(unit)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn search_ingredients(
    prefix: &str,
    pool: &Pool<Postgres>,
) -> Result<Vec<Ingredient>, QueryError> {
    let pattern = format!("{}%", escape_like(prefix));

    let rows: Vec<Ingredient> = sqlx::query_as(
        "SELECT * FROM ingredients WHERE name ILIKE $1 ORDER BY name, measurement_unit",
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
