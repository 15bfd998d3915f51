use crate::{error::ServiceError, jwt::SessionData, schema::Recipe, schema::UserRole};

use super::jwt::Requester;

const ACTION_TABLE: &[(UserRole, &[ActionType])] = &[
    (
        UserRole::User,
        &[
            ActionType::ManageOwnRelations,
            ActionType::CreateRecipes,
            ActionType::ManageOwnRecipes,
        ],
    ),
    (
        UserRole::Admin,
        &[
            ActionType::ManageOwnRelations,
            ActionType::CreateRecipes,
            ActionType::ManageOwnRecipes,
            ActionType::ManageAllRecipes,
            ActionType::ManageCatalog,
        ],
    ),
];

#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum ActionType {
    CreateRecipes,

    ManageOwnRelations,
    ManageOwnRecipes,

    ManageAllRecipes,
    ManageCatalog,
}

impl ActionType {
    pub fn authenticate(self, session: &SessionData) -> bool {
        let user_role = &session.user_role;

        ACTION_TABLE
            .iter()
            .find_map(|(role, actions)| {
                if user_role != role {
                    return None;
                }

                Some(actions.contains(&self))
            })
            .unwrap_or(false)
    }
}

pub fn authorize_recipe_mutation(requester: &Requester, recipe: &Recipe) -> Result<(), ServiceError> {
    let session = requester.authenticate(ActionType::ManageOwnRecipes)?;

    if ActionType::ManageAllRecipes.authenticate(session) || recipe.author_id == session.user_id {
        return Ok(());
    }

    log::warn!(
        "User {} denied mutation of recipe {} owned by {}",
        session.user_id,
        recipe.id,
        recipe.author_id
    );
    Err(ServiceError::Authorization(
        "Changing another author's content is forbidden".to_string(),
    ))
}
