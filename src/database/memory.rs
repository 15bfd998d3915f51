use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
};

use super::{
    error::QueryError,
    pagination::Pagination,
    schema::{
        CartLine, Id, Ingredient, IngredientAmount, NewTag, NewUser, Recipe, RecipeFields,
        RecipeFilter, RecipeIngredient, RecipePatch, RelationKind, RelationRow, Tag, User,
    },
    store::Store,
};

#[derive(Default)]
struct Tables {
    next_id: Id,
    users: Vec<User>,
    ingredients: Vec<Ingredient>,
    tags: Vec<Tag>,
    recipes: Vec<Recipe>,
    // (recipe_id, ingredient_id, amount)
    recipe_ingredients: Vec<(Id, Id, i32)>,
    // (recipe_id, tag_id)
    recipe_tags: Vec<(Id, Id)>,
    // Insertion order doubles as the relation row id.
    relations: Vec<RelationRow>,
}

impl Tables {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn has_relation(&self, kind: RelationKind, actor_id: Id, target_id: Id) -> bool {
        self.relations
            .iter()
            .any(|r| r.kind == kind && r.actor_id == actor_id && r.target_id == target_id)
    }

    fn check_recipe_parts(
        &self,
        ingredients: Option<&[IngredientAmount]>,
        tags: Option<&[Id]>,
    ) -> Result<(), QueryError> {
        if let Some(ingredients) = ingredients {
            let mut seen = HashSet::new();
            for part in ingredients {
                if !self.ingredients.iter().any(|i| i.id == part.id) {
                    return Err(QueryError::missing_reference(format!(
                        "ingredient {} doesn't exist",
                        part.id
                    )));
                }
                if !seen.insert(part.id) {
                    return Err(QueryError::unique_violation(
                        "unique_recipe_ingredients".to_string(),
                    ));
                }
            }
        }

        if let Some(tags) = tags {
            let mut seen = HashSet::new();
            for tag_id in tags {
                if !self.tags.iter().any(|t| t.id == *tag_id) {
                    return Err(QueryError::missing_reference(format!(
                        "tag {tag_id} doesn't exist"
                    )));
                }
                if !seen.insert(*tag_id) {
                    return Err(QueryError::unique_violation("recipe_tags_pkey".to_string()));
                }
            }
        }

        Ok(())
    }

    fn replace_recipe_parts(
        &mut self,
        recipe_id: Id,
        ingredients: Option<&[IngredientAmount]>,
        tags: Option<&[Id]>,
    ) {
        if let Some(ingredients) = ingredients {
            self.recipe_ingredients.retain(|(r, _, _)| *r != recipe_id);
            self.recipe_ingredients
                .extend(ingredients.iter().map(|i| (recipe_id, i.id, i.amount)));
        }

        if let Some(tags) = tags {
            self.recipe_tags.retain(|(r, _)| *r != recipe_id);
            self.recipe_tags.extend(tags.iter().map(|t| (recipe_id, *t)));
        }
    }

    fn matches(&self, recipe: &Recipe, filter: &RecipeFilter, viewer: Option<Id>) -> bool {
        if filter.author.is_some_and(|author| author != recipe.author_id) {
            return false;
        }

        if !filter.tags.is_empty() {
            let tagged = self.recipe_tags.iter().any(|(r, t)| {
                *r == recipe.id
                    && self
                        .tags
                        .iter()
                        .any(|tag| tag.id == *t && filter.tags.contains(&tag.slug))
            });
            if !tagged {
                return false;
            }
        }

        let related = |kind| viewer.is_some_and(|user| self.has_relation(kind, user, recipe.id));
        if filter.is_favorited && !related(RelationKind::Favorite) {
            return false;
        }
        if filter.is_in_shopping_cart && !related(RelationKind::ShoppingCart) {
            return false;
        }

        true
    }
}

/// In-process [`Store`] with the same constraints as the PostgreSQL schema.
/// Every call runs under one lock, so multi-row writes are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, QueryError> {
        self.tables
            .lock()
            .map_err(|_| QueryError::new("Store lock poisoned".to_owned()))
    }
}

impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, QueryError> {
        let mut tables = self.lock()?;

        if tables
            .users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(QueryError::unique_violation("users_email_or_username".to_string()));
        }

        let row = User {
            id: tables.next_id(),
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            password: user.password,
            role: user.role,
        };
        tables.users.push(row.clone());

        Ok(row)
    }

    async fn get_user(&self, id: Id) -> Result<Option<User>, QueryError> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self, pagination: Pagination) -> Result<(Vec<User>, i64), QueryError> {
        let guard = self.lock()?;
        let users: Vec<User> = guard.users.iter().rev().cloned().collect();

        Ok((pagination.apply(&users), users.len() as i64))
    }

    async fn insert_ingredient(&self, name: &str, unit: &str) -> Result<Ingredient, QueryError> {
        let mut tables = self.lock()?;

        if tables
            .ingredients
            .iter()
            .any(|i| i.name == name && i.measurement_unit == unit)
        {
            return Err(QueryError::unique_violation(
                "unique_name_measurement_unit".to_string(),
            ));
        }

        let row = Ingredient {
            id: tables.next_id(),
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        };
        tables.ingredients.push(row.clone());

        Ok(row)
    }

    async fn search_ingredients(&self, prefix: &str) -> Result<Vec<Ingredient>, QueryError> {
        let prefix = prefix.to_lowercase();
        let mut rows: Vec<Ingredient> = self
            .lock()?
            .ingredients
            .iter()
            .filter(|i| i.name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (&a.name, &a.measurement_unit).cmp(&(&b.name, &b.measurement_unit))
        });

        Ok(rows)
    }

    async fn insert_tag(&self, tag: NewTag) -> Result<Tag, QueryError> {
        let mut tables = self.lock()?;

        if tables
            .tags
            .iter()
            .any(|t| t.name == tag.name || t.color == tag.color || t.slug == tag.slug)
        {
            return Err(QueryError::unique_violation("tags_unique".to_string()));
        }

        let row = Tag {
            id: tables.next_id(),
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        };
        tables.tags.push(row.clone());

        Ok(row)
    }

    async fn get_tag(&self, id: Id) -> Result<Option<Tag>, QueryError> {
        Ok(self.lock()?.tags.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, QueryError> {
        let mut rows = self.lock()?.tags.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(rows)
    }

    async fn insert_recipe(
        &self,
        author_id: Id,
        fields: &RecipeFields,
        ingredients: &[IngredientAmount],
        tags: &[Id],
    ) -> Result<Recipe, QueryError> {
        let mut tables = self.lock()?;

        if !tables.users.iter().any(|u| u.id == author_id) {
            return Err(QueryError::missing_reference(format!(
                "user {author_id} doesn't exist"
            )));
        }
        tables.check_recipe_parts(Some(ingredients), Some(tags))?;

        let recipe = Recipe {
            id: tables.next_id(),
            author_id,
            name: fields.name.clone(),
            image: fields.image.clone(),
            text: fields.text.clone(),
            cooking_time: fields.cooking_time,
        };
        tables.recipes.push(recipe.clone());
        tables.replace_recipe_parts(recipe.id, Some(ingredients), Some(tags));

        Ok(recipe)
    }

    async fn update_recipe(
        &self,
        id: Id,
        patch: &RecipePatch,
    ) -> Result<Option<Recipe>, QueryError> {
        let mut tables = self.lock()?;

        if !tables.recipes.iter().any(|r| r.id == id) {
            return Ok(None);
        }
        tables.check_recipe_parts(patch.ingredients.as_deref(), patch.tags.as_deref())?;
        tables.replace_recipe_parts(id, patch.ingredients.as_deref(), patch.tags.as_deref());

        let Some(recipe) = tables.recipes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            recipe.name = name.clone();
        }
        if let Some(image) = &patch.image {
            recipe.image = image.clone();
        }
        if let Some(text) = &patch.text {
            recipe.text = text.clone();
        }
        if let Some(cooking_time) = patch.cooking_time {
            recipe.cooking_time = cooking_time;
        }

        Ok(Some(recipe.clone()))
    }

    async fn delete_recipe(&self, id: Id) -> Result<bool, QueryError> {
        let mut tables = self.lock()?;

        let before = tables.recipes.len();
        tables.recipes.retain(|r| r.id != id);
        if tables.recipes.len() == before {
            return Ok(false);
        }

        tables.recipe_ingredients.retain(|(r, _, _)| *r != id);
        tables.recipe_tags.retain(|(r, _)| *r != id);
        tables
            .relations
            .retain(|rel| rel.kind.targets_user() || rel.target_id != id);

        Ok(true)
    }

    async fn get_recipe(&self, id: Id) -> Result<Option<Recipe>, QueryError> {
        Ok(self.lock()?.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_recipe_ingredients(
        &self,
        recipe_id: Id,
    ) -> Result<Vec<RecipeIngredient>, QueryError> {
        let guard = self.lock()?;
        let tables = &*guard;

        let mut rows: Vec<RecipeIngredient> = tables
            .recipe_ingredients
            .iter()
            .filter(|(r, _, _)| *r == recipe_id)
            .filter_map(|(_, ingredient_id, amount)| {
                tables
                    .ingredients
                    .iter()
                    .find(|i| i.id == *ingredient_id)
                    .map(|i| RecipeIngredient {
                        id: i.id,
                        name: i.name.clone(),
                        measurement_unit: i.measurement_unit.clone(),
                        amount: *amount,
                    })
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(rows)
    }

    async fn list_recipe_tags(&self, recipe_id: Id) -> Result<Vec<Tag>, QueryError> {
        let guard = self.lock()?;
        let tables = &*guard;

        let mut rows: Vec<Tag> = tables
            .recipe_tags
            .iter()
            .filter(|(r, _)| *r == recipe_id)
            .filter_map(|(_, tag_id)| tables.tags.iter().find(|t| t.id == *tag_id).cloned())
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(rows)
    }

    async fn fetch_recipes(
        &self,
        filter: &RecipeFilter,
        viewer: Option<Id>,
        pagination: Pagination,
    ) -> Result<(Vec<Recipe>, i64), QueryError> {
        let guard = self.lock()?;
        let tables = &*guard;

        let matching: Vec<Recipe> = tables
            .recipes
            .iter()
            .rev()
            .filter(|r| tables.matches(r, filter, viewer))
            .cloned()
            .collect();

        Ok((pagination.apply(&matching), matching.len() as i64))
    }

    async fn list_author_recipes(
        &self,
        author_id: Id,
        limit: Option<i64>,
    ) -> Result<Vec<Recipe>, QueryError> {
        let guard = self.lock()?;
        let tables = &*guard;

        let rows = tables
            .recipes
            .iter()
            .rev()
            .filter(|r| r.author_id == author_id)
            .take(limit.map_or(usize::MAX, |l| l.max(0) as usize))
            .cloned()
            .collect();

        Ok(rows)
    }

    async fn count_author_recipes(&self, author_id: Id) -> Result<i64, QueryError> {
        let guard = self.lock()?;
        let tables = &*guard;

        Ok(tables
            .recipes
            .iter()
            .filter(|r| r.author_id == author_id)
            .count() as i64)
    }

    async fn relation_exists(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<bool, QueryError> {
        Ok(self.lock()?.has_relation(kind, actor_id, target_id))
    }

    async fn insert_relation(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<RelationRow, QueryError> {
        let mut tables = self.lock()?;

        let target_exists = if kind.targets_user() {
            tables.users.iter().any(|u| u.id == target_id)
        } else {
            tables.recipes.iter().any(|r| r.id == target_id)
        };
        if !target_exists || !tables.users.iter().any(|u| u.id == actor_id) {
            return Err(QueryError::missing_reference(format!(
                "{} target {target_id} doesn't exist",
                kind.table()
            )));
        }

        if tables.has_relation(kind, actor_id, target_id) {
            return Err(QueryError::unique_violation(format!(
                "{} already holds ({actor_id}, {target_id})",
                kind.table()
            )));
        }

        let row = RelationRow {
            kind,
            actor_id,
            target_id,
        };
        tables.relations.push(row);

        Ok(row)
    }

    async fn delete_relation(
        &self,
        kind: RelationKind,
        actor_id: Id,
        target_id: Id,
    ) -> Result<u64, QueryError> {
        let mut tables = self.lock()?;

        let before = tables.relations.len();
        tables
            .relations
            .retain(|r| !(r.kind == kind && r.actor_id == actor_id && r.target_id == target_id));

        Ok((before - tables.relations.len()) as u64)
    }

    async fn list_subscriptions(
        &self,
        user_id: Id,
        pagination: Pagination,
    ) -> Result<(Vec<User>, i64), QueryError> {
        let guard = self.lock()?;
        let tables = &*guard;

        let authors: Vec<User> = tables
            .relations
            .iter()
            .rev()
            .filter(|r| r.kind == RelationKind::Subscription && r.actor_id == user_id)
            .filter_map(|r| tables.users.iter().find(|u| u.id == r.target_id).cloned())
            .collect();

        Ok((pagination.apply(&authors), authors.len() as i64))
    }

    async fn list_cart_lines(&self, user_id: Id) -> Result<Vec<CartLine>, QueryError> {
        let guard = self.lock()?;
        let tables = &*guard;

        let lines = tables
            .relations
            .iter()
            .filter(|r| r.kind == RelationKind::ShoppingCart && r.actor_id == user_id)
            .flat_map(|r| {
                tables
                    .recipe_ingredients
                    .iter()
                    .filter(move |(recipe_id, _, _)| *recipe_id == r.target_id)
            })
            .filter_map(|(_, ingredient_id, amount)| {
                tables
                    .ingredients
                    .iter()
                    .find(|i| i.id == *ingredient_id)
                    .map(|i| CartLine {
                        name: i.name.clone(),
                        measurement_unit: i.measurement_unit.clone(),
                        amount: i64::from(*amount),
                    })
            })
            .collect();

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::QueryErrorKind, testing};

    #[tokio::test]
    async fn failed_recipe_insert_leaves_no_rows() {
        let fixture = testing::seeded().await;
        let store = &fixture.store;

        let error = store
            .insert_recipe(
                fixture.alice.id,
                &testing::fields("Pancakes"),
                &[IngredientAmount { id: fixture.flour.id, amount: 200 }],
                &[fixture.breakfast.id, 9999],
            )
            .await
            .unwrap_err();

        assert_eq!(error.kind(), QueryErrorKind::MissingReference);
        let (rows, total) = store
            .fetch_recipes(&RecipeFilter::default(), None, Pagination::new(10, 0))
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn deleting_a_recipe_cascades() {
        let fixture = testing::seeded().await;
        let store = &fixture.store;
        let recipe = fixture.recipe(&fixture.alice, "Pancakes", &[(&fixture.flour, 200)]).await;

        store
            .insert_relation(RelationKind::Favorite, fixture.bob.id, recipe.id)
            .await
            .unwrap();
        store
            .insert_relation(RelationKind::Subscription, fixture.bob.id, fixture.alice.id)
            .await
            .unwrap();

        assert!(store.delete_recipe(recipe.id).await.unwrap());
        assert!(store.list_recipe_ingredients(recipe.id).await.unwrap().is_empty());
        assert!(store.list_recipe_tags(recipe.id).await.unwrap().is_empty());
        assert!(!store
            .relation_exists(RelationKind::Favorite, fixture.bob.id, recipe.id)
            .await
            .unwrap());
        assert!(store
            .relation_exists(RelationKind::Subscription, fixture.bob.id, fixture.alice.id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn ingredient_pair_is_unique() {
        let store = MemoryStore::new();

        store.insert_ingredient("Salt", "g").await.unwrap();
        store.insert_ingredient("Salt", "pinch").await.unwrap();
        let error = store.insert_ingredient("Salt", "g").await.unwrap_err();

        assert_eq!(error.kind(), QueryErrorKind::UniqueViolation);
    }

    #[tokio::test]
    async fn recipes_filter_by_tag_slug_newest_first() {
        let fixture = testing::seeded().await;
        let first = fixture.recipe(&fixture.alice, "Porridge", &[(&fixture.flour, 50)]).await;
        let second = fixture.recipe(&fixture.alice, "Toast", &[(&fixture.flour, 80)]).await;

        let filter = RecipeFilter {
            tags: vec![fixture.breakfast.slug.clone()],
            ..RecipeFilter::default()
        };
        let (rows, total) = fixture
            .store
            .fetch_recipes(&filter, None, Pagination::new(10, 0))
            .await
            .unwrap();

        assert_eq!(total, 2);
        assert_eq!(rows, vec![second, first]);

        let filter = RecipeFilter {
            tags: vec!["no-such-tag".to_string()],
            ..RecipeFilter::default()
        };
        let (rows, total) = fixture
            .store
            .fetch_recipes(&filter, None, Pagination::new(10, 0))
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 0);
    }
}
