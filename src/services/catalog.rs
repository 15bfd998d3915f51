use crate::{
    constants::{MAX_LENGTH_COLOR, MAX_LENGTH_TEXT_RECIPES, SLUG_SYMBOLS},
    database::store::Store,
    error::{QueryErrorKind, ServiceError},
    jwt::Requester,
    permissions::ActionType,
    schema::{Id, Ingredient, NewTag, Tag},
};

fn check_name(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > MAX_LENGTH_TEXT_RECIPES {
        return Err(ServiceError::Validation(format!(
            "{field} must be at most {MAX_LENGTH_TEXT_RECIPES} characters"
        )));
    }
    Ok(())
}

// `#RRGGBB`
fn is_hex_color(value: &str) -> bool {
    value.len() == MAX_LENGTH_COLOR
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SLUG_SYMBOLS.contains(&c))
}

pub async fn create_ingredient<S: Store>(
    store: &S,
    requester: &Requester,
    name: &str,
    measurement_unit: &str,
) -> Result<Ingredient, ServiceError> {
    requester.authenticate(ActionType::ManageCatalog)?;
    check_name("name", name)?;
    check_name("measurement_unit", measurement_unit)?;

    let ingredient = store
        .insert_ingredient(name, measurement_unit)
        .await
        .map_err(|e| match e.kind() {
            QueryErrorKind::UniqueViolation => ServiceError::Duplicate(format!(
                "Ingredient {name} ({measurement_unit}) already exists"
            )),
            _ => e.into(),
        })?;

    log::info!("Created ingredient {} ({})", ingredient.name, ingredient.id);
    Ok(ingredient)
}

pub async fn search_ingredients<S: Store>(
    store: &S,
    prefix: &str,
) -> Result<Vec<Ingredient>, ServiceError> {
    log::trace!("Searching ingredients by {prefix:?}");
    Ok(store.search_ingredients(prefix).await?)
}

pub async fn create_tag<S: Store>(
    store: &S,
    requester: &Requester,
    tag: NewTag,
) -> Result<Tag, ServiceError> {
    requester.authenticate(ActionType::ManageCatalog)?;
    check_name("name", &tag.name)?;
    if !is_hex_color(&tag.color) {
        return Err(ServiceError::validation("color must be in #RRGGBB format"));
    }
    if !is_slug(&tag.slug) {
        return Err(ServiceError::validation(
            "slug may only contain letters, digits, - and _",
        ));
    }

    let tag = store.insert_tag(tag).await.map_err(|e| match e.kind() {
        QueryErrorKind::UniqueViolation => ServiceError::Duplicate(
            "A tag with that name, color or slug already exists".to_string(),
        ),
        _ => e.into(),
    })?;

    log::info!("Created tag {} ({})", tag.slug, tag.id);
    Ok(tag)
}

pub async fn list_tags<S: Store>(store: &S) -> Result<Vec<Tag>, ServiceError> {
    Ok(store.list_tags().await?)
}

pub async fn get_tag<S: Store>(store: &S, id: Id) -> Result<Tag, ServiceError> {
    store
        .get_tag(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("No tag exists with specified id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn new_tag(name: &str, color: &str, slug: &str) -> NewTag {
        NewTag {
            name: name.to_string(),
            color: color.to_string(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn only_admin_creates_ingredients() {
        let fixture = testing::seeded().await;

        let error = create_ingredient(&fixture.store, &testing::requester(&fixture.alice), "Milk", "ml")
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::Authorization(_)));

        let milk = create_ingredient(&fixture.store, &testing::requester(&fixture.admin), "Milk", "ml")
            .await
            .unwrap();
        assert_eq!(milk.measurement_unit, "ml");
    }

    #[tokio::test]
    async fn same_name_different_unit_is_another_ingredient() {
        let fixture = testing::seeded().await;
        let admin = testing::requester(&fixture.admin);

        create_ingredient(&fixture.store, &admin, "Flour", "kg").await.unwrap();
        let error = create_ingredient(&fixture.store, &admin, "Flour", "g")
            .await
            .unwrap_err();

        assert!(matches!(error, ServiceError::Duplicate(_)));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_prefix() {
        let fixture = testing::seeded().await;

        let found = search_ingredients(&fixture.store, "fl").await.unwrap();
        assert_eq!(found, vec![fixture.flour.clone()]);

        assert!(search_ingredients(&fixture.store, "our").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tag_fields_are_validated() {
        let fixture = testing::seeded().await;
        let admin = testing::requester(&fixture.admin);

        for tag in [
            new_tag("Lunch", "green", "lunch"),
            new_tag("Lunch", "#12345G", "lunch"),
            new_tag("Lunch", "#49B64E", "late lunch"),
            new_tag("", "#49B64E", "lunch"),
        ] {
            let error = create_tag(&fixture.store, &admin, tag).await.unwrap_err();
            assert!(matches!(error, ServiceError::Validation(_)));
        }

        let lunch = create_tag(&fixture.store, &admin, new_tag("Lunch", "#49B64E", "lunch"))
            .await
            .unwrap();
        assert_eq!(get_tag(&fixture.store, lunch.id).await.unwrap(), lunch);
    }

    #[tokio::test]
    async fn tags_list_by_name_and_stay_unique() {
        let fixture = testing::seeded().await;
        let admin = testing::requester(&fixture.admin);

        let error = create_tag(&fixture.store, &admin, new_tag("Brunch", "#E26C2D", "brunch"))
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::Duplicate(_)));

        let names: Vec<String> = list_tags(&fixture.store)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Breakfast", "Dinner"]);

        assert!(matches!(
            get_tag(&fixture.store, 4242).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
