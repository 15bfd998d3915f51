use crate::{
    database::{memory::MemoryStore, store::Store},
    error::QueryError,
    jwt::{Requester, SessionData},
    pagination::Pagination,
    schema::{
        CartLine, Id, Ingredient, IngredientAmount, NewTag, NewUser, Recipe, RecipeFields,
        RecipeFilter, RecipeIngredient, RecipePatch, RelationKind, RelationRow, Tag, User,
        UserRole,
    },
};

pub struct Fixture {
    pub store: MemoryStore,
    pub alice: User,
    pub bob: User,
    pub admin: User,
    pub flour: Ingredient,
    pub sugar: Ingredient,
    pub breakfast: Tag,
    pub dinner: Tag,
}

impl Fixture {
    pub async fn recipe(&self, author: &User, name: &str, parts: &[(&Ingredient, i32)]) -> Recipe {
        let ingredients: Vec<IngredientAmount> = parts
            .iter()
            .map(|(ingredient, amount)| IngredientAmount {
                id: ingredient.id,
                amount: *amount,
            })
            .collect();

        self.store
            .insert_recipe(author.id, &fields(name), &ingredients, &[self.breakfast.id])
            .await
            .unwrap()
    }
}

pub fn new_user(username: &str, role: UserRole) -> NewUser {
    NewUser {
        email: format!("{username}@example.com"),
        username: username.to_string(),
        first_name: username.to_string(),
        last_name: "Tester".to_string(),
        password: "hashed".to_string(),
        role,
    }
}

pub fn fields(name: &str) -> RecipeFields {
    RecipeFields {
        name: name.to_string(),
        image: format!("recipes/{}.png", name.to_lowercase()),
        text: "Mix everything and cook".to_string(),
        cooking_time: 15,
    }
}

pub fn requester(user: &User) -> Requester {
    Requester::Authenticated(SessionData {
        user_id: user.id,
        username: user.username.clone(),
        user_role: user.role.clone(),
        is_admin: user.role == UserRole::Admin,
    })
}

pub async fn seeded() -> Fixture {
    let store = MemoryStore::new();

    let alice = store.insert_user(new_user("alice", UserRole::User)).await.unwrap();
    let bob = store.insert_user(new_user("bob", UserRole::User)).await.unwrap();
    let admin = store.insert_user(new_user("admin", UserRole::Admin)).await.unwrap();

    let flour = store.insert_ingredient("Flour", "g").await.unwrap();
    let sugar = store.insert_ingredient("Sugar", "g").await.unwrap();

    let breakfast = store
        .insert_tag(NewTag {
            name: "Breakfast".to_string(),
            color: "#E26C2D".to_string(),
            slug: "breakfast".to_string(),
        })
        .await
        .unwrap();
    let dinner = store
        .insert_tag(NewTag {
            name: "Dinner".to_string(),
            color: "#8775D2".to_string(),
            slug: "dinner".to_string(),
        })
        .await
        .unwrap();

    Fixture {
        store,
        alice,
        bob,
        admin,
        flour,
        sugar,
        breakfast,
        dinner,
    }
}

/// Store whose existence checks always miss, so writes race into the
/// storage constraints.
pub struct RacingStore<'a> {
    inner: &'a MemoryStore,
}

impl<'a> RacingStore<'a> {
    pub fn new(inner: &'a MemoryStore) -> Self {
        Self { inner }
    }
}

impl Store for RacingStore<'_> {
    async fn insert_user(&self, user: NewUser) -> Result<User, QueryError> {
        self.inner.insert_user(user).await
    }

    async fn get_user(&self, id: Id) -> Result<Option<User>, QueryError> {
        self.inner.get_user(id).await
    }

    async fn list_users(&self, pagination: Pagination) -> Result<(Vec<User>, i64), QueryError> {
        self.inner.list_users(pagination).await
    }

    async fn insert_ingredient(&self, name: &str, unit: &str) -> Result<Ingredient, QueryError> {
        self.inner.insert_ingredient(name, unit).await
    }

    async fn search_ingredients(&self, prefix: &str) -> Result<Vec<Ingredient>, QueryError> {
        self.inner.search_ingredients(prefix).await
    }

    async fn insert_tag(&self, tag: NewTag) -> Result<Tag, QueryError> {
        self.inner.insert_tag(tag).await
    }

    async fn get_tag(&self, id: Id) -> Result<Option<Tag>, QueryError> {
        self.inner.get_tag(id).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, QueryError> {
        self.inner.list_tags().await
    }

    async fn insert_recipe(
        &self,
        author_id: Id,
        fields: &RecipeFields,
        ingredients: &[IngredientAmount],
        tags: &[Id],
    ) -> Result<Recipe, QueryError> {
        self.inner
            .insert_recipe(author_id, fields, ingredients, tags)
            .await
    }

    async fn update_recipe(
        &self,
        id: Id,
        patch: &RecipePatch,
    ) -> Result<Option<Recipe>, QueryError> {
        self.inner.update_recipe(id, patch).await
    }

    async fn delete_recipe(&self, id: Id) -> Result<bool, QueryError> {
        self.inner.delete_recipe(id).await
    }

    async fn get_recipe(&self, id: Id) -> Result<Option<Recipe>, QueryError> {
        self.inner.get_recipe(id).await
    }

    async fn list_recipe_ingredients(
        &self,
        recipe_id: Id,
    ) -> Result<Vec<RecipeIngredient>, QueryError> {
        self.inner.list_recipe_ingredients(recipe_id).await
    }

    async fn list_recipe_tags(&self, recipe_id: Id) -> Result<Vec<Tag>, QueryError> {
        self.inner.list_recipe_tags(recipe_id).await
    }

    async fn fetch_recipes(
        &self,
        filter: &RecipeFilter,
        viewer: Option<Id>,
        pagination: Pagination,
    ) -> Result<(Vec<Recipe>, i64), QueryError> {
        self.inner.fetch_recipes(filter, viewer, pagination).await
    }

    async fn list_author_recipes(
        &self,
        author_id: Id,
        limit: Option<i64>,
    ) -> Result<Vec<Recipe>, QueryError> {
        self.inner.list_author_recipes(author_id, limit).await
    }

    async fn count_author_recipes(&self, author_id: Id) -> Result<i64, QueryError> {
        self.inner.count_author_recipes(author_id).await
    }

    async fn relation_exists(
        &self,
        _kind: RelationKind,
        _actor_id: Id,
        _target_id: Id,
    ) -> Result<bool, QueryError> {
        Ok(false)
    }

    async fn insert_relation(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<RelationRow, QueryError> {
        self.inner.insert_relation(kind, actor_id, target_id).await
    }

    async fn delete_relation(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<u64, QueryError> {
        self.inner.delete_relation(kind, actor_id, target_id).await
    }

    async fn list_subscriptions(
        &self,
        user_id: Id,
        pagination: Pagination,
    ) -> Result<(Vec<User>, i64), QueryError> {
        self.inner.list_subscriptions(user_id, pagination).await
    }

    async fn list_cart_lines(&self, user_id: Id) -> Result<Vec<CartLine>, QueryError> {
        self.inner.list_cart_lines(user_id).await
    }
}
