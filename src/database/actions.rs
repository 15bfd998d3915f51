pub mod ingredients;
pub mod recipes;
pub mod relations;
pub mod tags;
pub mod users;

use sqlx::{Pool, Postgres};

use super::{
    error::QueryError,
    pagination::Pagination,
    schema::{
        CartLine, Id, Ingredient, IngredientAmount, NewTag, NewUser, Recipe, RecipeFields,
        RecipeFilter, RecipeIngredient, RecipePatch, RelationKind, RelationRow, Tag, User,
    },
    store::Store,
};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, QueryError> {
        users::insert_user(user, &self.pool).await
    }

    async fn get_user(&self, id: Id) -> Result<Option<User>, QueryError> {
        users::get_user(id, &self.pool).await
    }

    async fn list_users(&self, pagination: Pagination) -> Result<(Vec<User>, i64), QueryError> {
        users::list_users(pagination, &self.pool).await
    }

    async fn insert_ingredient(&self, name: &str, unit: &str) -> Result<Ingredient, QueryError> {
        ingredients::insert_ingredient(name, unit, &self.pool).await
    }

    async fn search_ingredients(&self, prefix: &str) -> Result<Vec<Ingredient>, QueryError> {
        ingredients::search_ingredients(prefix, &self.pool).await
    }

    async fn insert_tag(&self, tag: NewTag) -> Result<Tag, QueryError> {
        tags::insert_tag(tag, &self.pool).await
    }

    async fn get_tag(&self, id: Id) -> Result<Option<Tag>, QueryError> {
        tags::get_tag(id, &self.pool).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, QueryError> {
        tags::list_tags(&self.pool).await
    }

    async fn insert_recipe(
        &self,
        author_id: Id,
        fields: &RecipeFields,
        ingredients: &[IngredientAmount],
        tags: &[Id],
    ) -> Result<Recipe, QueryError> {
        recipes::insert_recipe(author_id, fields, ingredients, tags, &self.pool).await
    }

    async fn update_recipe(
        &self,
        id: Id,
        patch: &RecipePatch,
    ) -> Result<Option<Recipe>, QueryError> {
        recipes::update_recipe(id, patch, &self.pool).await
    }

    async fn delete_recipe(&self, id: Id) -> Result<bool, QueryError> {
        recipes::delete_recipe(id, &self.pool).await
    }

    async fn get_recipe(&self, id: Id) -> Result<Option<Recipe>, QueryError> {
        recipes::get_recipe(id, &self.pool).await
    }

    async fn list_recipe_ingredients(
        &self,
        recipe_id: Id,
    ) -> Result<Vec<RecipeIngredient>, QueryError> {
        recipes::list_recipe_ingredients(recipe_id, &self.pool).await
    }

    async fn list_recipe_tags(&self, recipe_id: Id) -> Result<Vec<Tag>, QueryError> {
        tags::list_recipe_tags(recipe_id, &self.pool).await
    }

    async fn fetch_recipes(
        &self,
        filter: &RecipeFilter,
        viewer: Option<Id>,
        pagination: Pagination,
    ) -> Result<(Vec<Recipe>, i64), QueryError> {
        recipes::fetch_recipes(filter, viewer, pagination, &self.pool).await
    }

    async fn list_author_recipes(
        &self,
        author_id: Id,
        limit: Option<i64>,
    ) -> Result<Vec<Recipe>, QueryError> {
        recipes::list_author_recipes(author_id, limit, &self.pool).await
    }

    async fn count_author_recipes(&self, author_id: Id) -> Result<i64, QueryError> {
        recipes::count_author_recipes(author_id, &self.pool).await
    }

    async fn relation_exists(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<bool, QueryError> {
        relations::relation_exists(kind, actor_id, target_id, &self.pool).await
    }

    async fn insert_relation(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<RelationRow, QueryError> {
        relations::insert_relation(kind, actor_id, target_id, &self.pool).await
    }

    async fn delete_relation(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<u64, QueryError> {
        relations::delete_relation(kind, actor_id, target_id, &self.pool).await
    }

    async fn list_subscriptions(
        &self,
        user_id: Id,
        pagination: Pagination,
    ) -> Result<(Vec<User>, i64), QueryError> {
        users::list_subscriptions(user_id, pagination, &self.pool).await
    }

    async fn list_cart_lines(&self, user_id: Id) -> Result<Vec<CartLine>, QueryError> {
        recipes::list_cart_lines(user_id, &self.pool).await
    }
}
