use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    constants::SHOPPING_LIST_FILENAME, database::store::Store, error::ServiceError, schema::Id,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

pub async fn aggregate_cart<S: Store>(
    store: &S,
    user_id: Id,
) -> Result<Vec<ShoppingListItem>, ServiceError> {
    let lines = store.list_cart_lines(user_id).await?;
    log::trace!("Aggregating {} cart lines for user {user_id}", lines.len());

    let mut groups: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *groups
            .entry((line.name, line.measurement_unit))
            .or_insert(0) += line.amount;
    }

    Ok(groups
        .into_iter()
        .map(|((name, measurement_unit), amount)| ShoppingListItem {
            name,
            measurement_unit,
            amount,
        })
        .collect())
}

pub trait ShoppingListFormatter {
    fn filename(&self) -> &str;
    fn content_type(&self) -> &str;
    fn render(&self, items: &[ShoppingListItem]) -> Vec<u8>;
}

pub struct PlainTextFormatter;

impl ShoppingListFormatter for PlainTextFormatter {
    fn filename(&self) -> &str {
        SHOPPING_LIST_FILENAME
    }

    fn content_type(&self) -> &str {
        "text/plain; charset=utf-8"
    }

    fn render(&self, items: &[ShoppingListItem]) -> Vec<u8> {
        let mut out = String::from("Shopping list:\n");
        for item in items {
            out.push_str(&format!(
                "{} ({}) — {}\n",
                item.name, item.measurement_unit, item.amount
            ));
        }
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema::RelationKind, testing};

    fn item(name: &str, unit: &str, amount: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[tokio::test]
    async fn sums_amounts_per_name_and_unit() {
        let fixture = testing::seeded().await;
        let pancakes = fixture
            .recipe(&fixture.alice, "Pancakes", &[(&fixture.flour, 200), (&fixture.sugar, 50)])
            .await;
        let bread = fixture.recipe(&fixture.alice, "Bread", &[(&fixture.flour, 300)]).await;

        for recipe in [&pancakes, &bread] {
            fixture
                .store
                .insert_relation(RelationKind::ShoppingCart, fixture.bob.id, recipe.id)
                .await
                .unwrap();
        }

        let items = aggregate_cart(&fixture.store, fixture.bob.id).await.unwrap();

        assert_eq!(items, vec![item("Flour", "g", 500), item("Sugar", "g", 50)]);
    }

    #[tokio::test]
    async fn different_units_stay_apart() {
        let fixture = testing::seeded().await;
        let flour_kg = fixture.store.insert_ingredient("Flour", "kg").await.unwrap();
        let pancakes = fixture.recipe(&fixture.alice, "Pancakes", &[(&fixture.flour, 200)]).await;
        let bread = fixture.recipe(&fixture.alice, "Bread", &[(&flour_kg, 1)]).await;

        for recipe in [&pancakes, &bread] {
            fixture
                .store
                .insert_relation(RelationKind::ShoppingCart, fixture.bob.id, recipe.id)
                .await
                .unwrap();
        }

        let items = aggregate_cart(&fixture.store, fixture.bob.id).await.unwrap();

        assert_eq!(items, vec![item("Flour", "g", 200), item("Flour", "kg", 1)]);
    }

    #[tokio::test]
    async fn removing_a_recipe_shrinks_the_list() {
        let fixture = testing::seeded().await;
        let pancakes = fixture
            .recipe(&fixture.alice, "Pancakes", &[(&fixture.flour, 200), (&fixture.sugar, 50)])
            .await;
        let bread = fixture.recipe(&fixture.alice, "Bread", &[(&fixture.flour, 300)]).await;
        for recipe in [&pancakes, &bread] {
            fixture
                .store
                .insert_relation(RelationKind::ShoppingCart, fixture.bob.id, recipe.id)
                .await
                .unwrap();
        }

        fixture
            .store
            .delete_relation(RelationKind::ShoppingCart, fixture.bob.id, pancakes.id)
            .await
            .unwrap();

        let items = aggregate_cart(&fixture.store, fixture.bob.id).await.unwrap();
        assert_eq!(items, vec![item("Flour", "g", 300)]);
    }

    #[tokio::test]
    async fn empty_cart_is_an_empty_list() {
        let fixture = testing::seeded().await;
        fixture.recipe(&fixture.alice, "Pancakes", &[(&fixture.flour, 200)]).await;

        let items = aggregate_cart(&fixture.store, fixture.bob.id).await.unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn carts_are_per_user() {
        let fixture = testing::seeded().await;
        let pancakes = fixture.recipe(&fixture.alice, "Pancakes", &[(&fixture.flour, 200)]).await;
        fixture
            .store
            .insert_relation(RelationKind::ShoppingCart, fixture.alice.id, pancakes.id)
            .await
            .unwrap();

        assert!(aggregate_cart(&fixture.store, fixture.bob.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn plain_text_lists_one_line_per_item() {
        let formatter = PlainTextFormatter;
        let body = formatter.render(&[item("Flour", "g", 500), item("Sugar", "g", 50)]);

        assert_eq!(formatter.filename(), "ShoppingList.txt");
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "Shopping list:\nFlour (g) — 500\nSugar (g) — 50\n"
        );
    }
}
