use crate::{
    error::QueryError,
    pagination::Pagination,
    schema::{
        CartLine, IngredientAmount, Recipe, RecipeFields, RecipeFilter, RecipeIngredient,
        RecipePatch, Id,
    },
};

use sqlx::{PgConnection, Pool, Postgres, QueryBuilder};

pub async fn insert_recipe(
    author_id: Id,
    fields: &RecipeFields,
    ingredients: &[IngredientAmount],
    tags: &[Id],
    pool: &Pool<Postgres>,
) -> Result<Recipe, QueryError> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    let recipe: Recipe = sqlx::query_as(
        "
        INSERT INTO recipes (author_id, name, image, text, cooking_time)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
    ",
    )
    .bind(author_id)
    .bind(&fields.name)
    .bind(&fields.image)
    .bind(&fields.text)
    .bind(fields.cooking_time)
    .fetch_one(&mut *tr)
    .await?;

    insert_recipe_ingredients(recipe.id, ingredients, &mut *tr).await?;
    insert_recipe_tags(recipe.id, tags, &mut *tr).await?;

    tr.commit().await?;

    Ok(recipe)
}

pub async fn update_recipe(
    id: Id,
    patch: &RecipePatch,
    pool: &Pool<Postgres>,
) -> Result<Option<Recipe>, QueryError> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    let recipe: Option<Recipe> = sqlx::query_as(
        "
        UPDATE recipes SET
        name = COALESCE($1, name),
        image = COALESCE($2, image),
        text = COALESCE($3, text),
        cooking_time = COALESCE($4, cooking_time)
        WHERE id = $5
        RETURNING *
    ",
    )
    .bind(&patch.name)
    .bind(&patch.image)
    .bind(&patch.text)
    .bind(patch.cooking_time)
    .bind(id)
    .fetch_optional(&mut *tr)
    .await?;

    let Some(recipe) = recipe else {
        return Ok(None);
    };

    if let Some(ingredients) = &patch.ingredients {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tr)
            .await?;
        insert_recipe_ingredients(id, ingredients, &mut *tr).await?;
    }

    if let Some(tags) = &patch.tags {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tr)
            .await?;
        insert_recipe_tags(id, tags, &mut *tr).await?;
    }

    tr.commit().await?;

    Ok(Some(recipe))
}

async fn insert_recipe_ingredients(
    recipe_id: Id,
    ingredients: &[IngredientAmount],
    conn: &mut PgConnection,
) -> Result<(), QueryError> {
    for ingredient in ingredients {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)",
        )
        .bind(recipe_id)
        .bind(ingredient.id)
        .bind(ingredient.amount)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn insert_recipe_tags(
    recipe_id: Id,
    tags: &[Id],
    conn: &mut PgConnection,
) -> Result<(), QueryError> {
    for tag_id in tags {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

pub async fn delete_recipe(id: Id, pool: &Pool<Postgres>) -> Result<bool, QueryError> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_recipe(id: Id, pool: &Pool<Postgres>) -> Result<Option<Recipe>, QueryError> {
    let row: Option<Recipe> = sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn list_recipe_ingredients(
    recipe_id: Id,
    pool: &Pool<Postgres>,
) -> Result<Vec<RecipeIngredient>, QueryError> {
    let rows: Vec<RecipeIngredient> = sqlx::query_as(
        "
        SELECT i.id AS id, i.name AS name, i.measurement_unit AS measurement_unit, ri.amount AS amount
        FROM recipe_ingredients ri
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = $1
        ORDER BY i.name
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn push_recipe_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &RecipeFilter,
    viewer: Option<Id>,
) {
    builder.push(" WHERE TRUE");

    if let Some(author) = filter.author {
        builder.push(" AND r.author_id = ").push_bind(author);
    }

    if !filter.tags.is_empty() {
        builder
            .push(" AND EXISTS (SELECT 1 FROM recipe_tags rt INNER JOIN tags t ON t.id = rt.tag_id WHERE rt.recipe_id = r.id AND t.slug = ANY(")
            .push_bind(filter.tags.clone())
            .push("))");
    }

    if filter.is_favorited {
        builder
            .push(" AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ")
            .push_bind(viewer)
            .push(")");
    }

    if filter.is_in_shopping_cart {
        builder
            .push(" AND EXISTS (SELECT 1 FROM shopping_cart sc WHERE sc.recipe_id = r.id AND sc.user_id = ")
            .push_bind(viewer)
            .push(")");
    }
}

pub async fn fetch_recipes(
    filter: &RecipeFilter,
    viewer: Option<Id>,
    pagination: Pagination,
    pool: &Pool<Postgres>,
) -> Result<(Vec<Recipe>, i64), QueryError> {
    let mut builder = QueryBuilder::new("SELECT r.* FROM recipes r");
    push_recipe_filter(&mut builder, filter, viewer);
    builder
        .push(" ORDER BY r.id DESC LIMIT ")
        .push_bind(pagination.limit)
        .push(" OFFSET ")
        .push_bind(pagination.offset);

    let rows: Vec<Recipe> = builder.build_query_as().fetch_all(pool).await?;

    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM recipes r");
    push_recipe_filter(&mut builder, filter, viewer);
    let total: i64 = builder.build_query_scalar().fetch_one(pool).await?;

    Ok((rows, total))
}

pub async fn list_author_recipes(
    author_id: Id,
    limit: Option<i64>,
    pool: &Pool<Postgres>,
) -> Result<Vec<Recipe>, QueryError> {
    // LIMIT NULL is no limit in Postgres
    let rows: Vec<Recipe> =
        sqlx::query_as("SELECT * FROM recipes WHERE author_id = $1 ORDER BY id DESC LIMIT $2")
            .bind(author_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

    Ok(rows)
}

pub async fn count_author_recipes(author_id: Id, pool: &Pool<Postgres>) -> Result<i64, QueryError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(count.0)
}

pub async fn list_cart_lines(user_id: Id, pool: &Pool<Postgres>) -> Result<Vec<CartLine>, QueryError> {
    let rows: Vec<CartLine> = sqlx::query_as(
        "
        SELECT i.name AS name, i.measurement_unit AS measurement_unit, ri.amount::BIGINT AS amount
        FROM shopping_cart sc
        INNER JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE sc.user_id = $1
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
