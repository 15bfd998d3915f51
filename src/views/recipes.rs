use serde::{Deserialize, Serialize};

use crate::{
    database::store::Store,
    error::ServiceError,
    jwt::Requester,
    pagination::{PageContext, Pagination},
    services::relations::RelationService,
    schema::{
        Id, IngredientAmount, Recipe, RecipeFields, RecipeFilter, RecipeIngredient, RecipePatch,
        RelationKind, Tag,
    },
};

use super::users::{project_user, UserView};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeView {
    pub id: Id,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSummaryView {
    pub id: Id,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<Recipe> for RecipeSummaryView {
    fn from(value: Recipe) -> Self {
        Self {
            id: value.id,
            name: value.name,
            image: value.image,
            cooking_time: value.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecipeWrite {
    pub tags: Option<Vec<Id>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ServiceError> {
    value.ok_or_else(|| ServiceError::Validation(format!("{field} is required")))
}

impl RecipeWrite {
    pub fn into_new(self) -> Result<(RecipeFields, Vec<IngredientAmount>, Vec<Id>), ServiceError> {
        let tags = required(self.tags, "tags")?;
        let ingredients = required(self.ingredients, "ingredients")?;
        let fields = RecipeFields {
            name: required(self.name, "name")?,
            image: required(self.image, "image")?,
            text: required(self.text, "text")?,
            cooking_time: required(self.cooking_time, "cooking_time")?,
        };

        Ok((fields, ingredients, tags))
    }

    pub fn into_patch(self) -> RecipePatch {
        RecipePatch {
            name: self.name,
            image: self.image,
            text: self.text,
            cooking_time: self.cooking_time,
            ingredients: self.ingredients,
            tags: self.tags,
        }
    }
}

pub async fn project_recipe<S: Store>(
    store: &S,
    recipe: &Recipe,
    requester: &Requester,
) -> Result<RecipeView, ServiceError> {
    let author = store
        .get_user(recipe.author_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Recipe author no longer exists"))?;
    let relations = RelationService::new(store);

    Ok(RecipeView {
        id: recipe.id,
        tags: store.list_recipe_tags(recipe.id).await?,
        author: project_user(store, &author, requester).await?,
        ingredients: store.list_recipe_ingredients(recipe.id).await?,
        is_favorited: relations
            .is_related(RelationKind::Favorite, requester, recipe.id)
            .await?,
        is_in_shopping_cart: relations
            .is_related(RelationKind::ShoppingCart, requester, recipe.id)
            .await?,
        name: recipe.name.clone(),
        image: recipe.image.clone(),
        text: recipe.text.clone(),
        cooking_time: recipe.cooking_time,
    })
}

/// Anonymous requesters asking for favorites or cart contents get an empty
/// page.
pub async fn list_recipes<S: Store>(
    store: &S,
    filter: &RecipeFilter,
    requester: &Requester,
    pagination: Pagination,
) -> Result<PageContext<RecipeView>, ServiceError> {
    let viewer = requester.user_id();
    if viewer.is_none() && (filter.is_favorited || filter.is_in_shopping_cart) {
        return Ok(PageContext::from_rows(vec![], 0, pagination));
    }

    let (recipes, total) = store.fetch_recipes(filter, viewer, pagination).await?;
    log::trace!("Listing {} of {total} recipes", recipes.len());

    let mut rows = Vec::with_capacity(recipes.len());
    for recipe in &recipes {
        rows.push(project_recipe(store, recipe, requester).await?);
    }

    Ok(PageContext::from_rows(rows, total, pagination))
}
