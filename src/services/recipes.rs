use std::collections::HashSet;

use crate::{
    config::Config,
    constants::{MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT},
    database::store::Store,
    error::{QueryError, QueryErrorKind, ServiceError},
    jwt::Requester,
    permissions::{authorize_recipe_mutation, ActionType},
    schema::{Id, IngredientAmount, Recipe, RecipeFields, RecipePatch},
};

fn validate_tags(tags: &[Id]) -> Result<(), ServiceError> {
    if tags.is_empty() {
        return Err(ServiceError::validation("A recipe needs at least one tag"));
    }
    Ok(())
}

fn validate_ingredients(ingredients: &[IngredientAmount]) -> Result<(), ServiceError> {
    if ingredients.is_empty() {
        return Err(ServiceError::validation(
            "A recipe needs at least one ingredient",
        ));
    }
    Ok(())
}

fn validate_cooking_time(cooking_time: i32) -> Result<(), ServiceError> {
    if cooking_time < MIN_COOKING_TIME {
        return Err(ServiceError::validation(
            "Cooking time must be at least one minute",
        ));
    }
    Ok(())
}

fn validate_unique_ingredients(ingredients: &[IngredientAmount]) -> Result<(), ServiceError> {
    let mut seen = HashSet::new();
    if ingredients.iter().any(|i| !seen.insert(i.id)) {
        return Err(ServiceError::validation(
            "Ingredients must not repeat within a recipe",
        ));
    }
    Ok(())
}

fn validate_unique_tags(tags: &[Id]) -> Result<(), ServiceError> {
    let mut seen = HashSet::new();
    if tags.iter().any(|t| !seen.insert(*t)) {
        return Err(ServiceError::validation("Tags must not repeat within a recipe"));
    }
    Ok(())
}

fn validate_amounts(ingredients: &[IngredientAmount]) -> Result<(), ServiceError> {
    if ingredients.iter().any(|i| i.amount < MIN_INGREDIENT_AMOUNT) {
        return Err(ServiceError::validation(
            "Ingredient amount must be at least one",
        ));
    }
    Ok(())
}

fn validate_name(name: &str, max_length: usize) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::validation("Recipe name must not be empty"));
    }
    if name.chars().count() > max_length {
        return Err(ServiceError::Validation(format!(
            "Recipe name must be at most {max_length} characters"
        )));
    }
    Ok(())
}

fn unknown_part(error: QueryError) -> ServiceError {
    match error.kind() {
        QueryErrorKind::MissingReference => ServiceError::validation("Unknown ingredient or tag"),
        _ => error.into(),
    }
}

fn validate_parts(
    tags: Option<&[Id]>,
    ingredients: Option<&[IngredientAmount]>,
    cooking_time: Option<i32>,
    name: Option<&str>,
    max_name_length: usize,
) -> Result<(), ServiceError> {
    if let Some(tags) = tags {
        validate_tags(tags)?;
    }
    if let Some(ingredients) = ingredients {
        validate_ingredients(ingredients)?;
    }
    if let Some(cooking_time) = cooking_time {
        validate_cooking_time(cooking_time)?;
    }
    if let Some(ingredients) = ingredients {
        validate_unique_ingredients(ingredients)?;
    }
    if let Some(tags) = tags {
        validate_unique_tags(tags)?;
    }
    if let Some(ingredients) = ingredients {
        validate_amounts(ingredients)?;
    }
    if let Some(name) = name {
        validate_name(name, max_name_length)?;
    }
    Ok(())
}

pub struct RecipeService<'a, S: Store> {
    store: &'a S,
    config: &'a Config,
}

impl<'a, S: Store> RecipeService<'a, S> {
    pub fn new(store: &'a S, config: &'a Config) -> Self {
        Self { store, config }
    }

    pub async fn create_recipe(
        &self,
        author: Id,
        fields: RecipeFields,
        ingredients: Vec<IngredientAmount>,
        tags: Vec<Id>,
    ) -> Result<Recipe, ServiceError> {
        validate_parts(
            Some(&tags),
            Some(&ingredients),
            Some(fields.cooking_time),
            Some(&fields.name),
            self.config.max_recipe_text_length,
        )?;

        let recipe = self
            .store
            .insert_recipe(author, &fields, &ingredients, &tags)
            .await
            .map_err(unknown_part)?;

        log::info!("User {author} created recipe {}", recipe.id);
        Ok(recipe)
    }

    pub async fn create_recipe_as(
        &self,
        requester: &Requester,
        fields: RecipeFields,
        ingredients: Vec<IngredientAmount>,
        tags: Vec<Id>,
    ) -> Result<Recipe, ServiceError> {
        let session = requester.authenticate(ActionType::CreateRecipes)?;
        self.create_recipe(session.user_id, fields, ingredients, tags)
            .await
    }

    pub async fn update_recipe(
        &self,
        recipe: &Recipe,
        patch: RecipePatch,
    ) -> Result<Recipe, ServiceError> {
        validate_parts(
            patch.tags.as_deref(),
            patch.ingredients.as_deref(),
            patch.cooking_time,
            patch.name.as_deref(),
            self.config.max_recipe_text_length,
        )?;

        let updated = self
            .store
            .update_recipe(recipe.id, &patch)
            .await
            .map_err(unknown_part)?
            .ok_or_else(|| ServiceError::not_found("No recipe exists with specified id"))?;

        log::info!("Recipe {} updated", recipe.id);
        Ok(updated)
    }

    pub async fn delete_recipe(&self, recipe: &Recipe) -> Result<(), ServiceError> {
        if !self.store.delete_recipe(recipe.id).await? {
            return Err(ServiceError::not_found("No recipe exists with specified id"));
        }

        log::info!("Recipe {} deleted", recipe.id);
        Ok(())
    }

    pub async fn get_recipe(&self, id: Id) -> Result<Recipe, ServiceError> {
        self.store
            .get_recipe(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("No recipe exists with specified id"))
    }

    pub async fn get_recipe_mut(
        &self,
        id: Id,
        requester: &Requester,
    ) -> Result<Recipe, ServiceError> {
        let recipe = self.get_recipe(id).await?;
        authorize_recipe_mutation(requester, &recipe)?;

        Ok(recipe)
    }
}
