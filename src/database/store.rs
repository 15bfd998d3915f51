use super::{
    error::QueryError,
    pagination::Pagination,
    schema::{
        CartLine, Id, Ingredient, IngredientAmount, NewTag, NewUser, Recipe, RecipeFields,
        RecipeFilter, RecipeIngredient, RecipePatch, RelationKind, RelationRow, Tag, User,
    },
};

/// Persistence used by the services.
///
/// Implementations must enforce the uniqueness constraints of the schema and
/// report a violation as [`QueryErrorKind::UniqueViolation`], and a reference
/// to a missing row as [`QueryErrorKind::MissingReference`]. Multi-row recipe
/// writes are all-or-nothing.
///
/// [`QueryErrorKind::UniqueViolation`]: super::error::QueryErrorKind::UniqueViolation
/// [`QueryErrorKind::MissingReference`]: super::error::QueryErrorKind::MissingReference
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn insert_user(&self, user: NewUser) -> Result<User, QueryError>;
    async fn get_user(&self, id: Id) -> Result<Option<User>, QueryError>;
    async fn list_users(&self, pagination: Pagination) -> Result<(Vec<User>, i64), QueryError>;

    async fn insert_ingredient(&self, name: &str, unit: &str) -> Result<Ingredient, QueryError>;
    async fn search_ingredients(&self, prefix: &str) -> Result<Vec<Ingredient>, QueryError>;

    async fn insert_tag(&self, tag: NewTag) -> Result<Tag, QueryError>;
    async fn get_tag(&self, id: Id) -> Result<Option<Tag>, QueryError>;
    async fn list_tags(&self) -> Result<Vec<Tag>, QueryError>;

    async fn insert_recipe(
        &self,
        author_id: Id,
        fields: &RecipeFields,
        ingredients: &[IngredientAmount],
        tags: &[Id],
    ) -> Result<Recipe, QueryError>;
    async fn update_recipe(&self, id: Id, patch: &RecipePatch)
        -> Result<Option<Recipe>, QueryError>;
    async fn delete_recipe(&self, id: Id) -> Result<bool, QueryError>;
    async fn get_recipe(&self, id: Id) -> Result<Option<Recipe>, QueryError>;
    async fn list_recipe_ingredients(&self, recipe_id: Id)
        -> Result<Vec<RecipeIngredient>, QueryError>;
    async fn list_recipe_tags(&self, recipe_id: Id) -> Result<Vec<Tag>, QueryError>;
    async fn fetch_recipes(
        &self,
        filter: &RecipeFilter,
        viewer: Option<Id>,
        pagination: Pagination,
    ) -> Result<(Vec<Recipe>, i64), QueryError>;
    async fn list_author_recipes(
        &self,
        author_id: Id,
        limit: Option<i64>,
    ) -> Result<Vec<Recipe>, QueryError>;
    async fn count_author_recipes(&self, author_id: Id) -> Result<i64, QueryError>;

    async fn relation_exists(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<bool, QueryError>;
    async fn insert_relation(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<RelationRow, QueryError>;
    async fn delete_relation(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<u64, QueryError>;
    async fn list_subscriptions(
        &self,
        user_id: Id,
        pagination: Pagination,
    ) -> Result<(Vec<User>, i64), QueryError>;

    async fn list_cart_lines(&self, user_id: Id) -> Result<Vec<CartLine>, QueryError>;
}
