use serde::Serialize;

use crate::{
    database::store::Store,
    error::ServiceError,
    jwt::Requester,
    pagination::{PageContext, Pagination},
    schema::{Id, RelationKind, User},
    services::relations::RelationService,
};

use super::recipes::RecipeSummaryView;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub email: String,
    pub id: Id,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserView,
    pub recipes: Vec<RecipeSummaryView>,
    pub recipes_count: i64,
}

pub async fn project_user<S: Store>(
    store: &S,
    user: &User,
    requester: &Requester,
) -> Result<UserView, ServiceError> {
    let is_subscribed = RelationService::new(store)
        .is_related(RelationKind::Subscription, requester, user.id)
        .await?;

    Ok(UserView {
        email: user.email.clone(),
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_subscribed,
    })
}

/// `recipes_limit` caps the preview only; `recipes_count` is always the
/// author's full count.
pub async fn project_subscription<S: Store>(
    store: &S,
    author: &User,
    requester: &Requester,
    recipes_limit: Option<i64>,
) -> Result<SubscriptionView, ServiceError> {
    let recipes = store
        .list_author_recipes(author.id, recipes_limit)
        .await?
        .into_iter()
        .map(RecipeSummaryView::from)
        .collect();

    Ok(SubscriptionView {
        author: project_user(store, author, requester).await?,
        recipes,
        recipes_count: store.count_author_recipes(author.id).await?,
    })
}

pub async fn list_users<S: Store>(
    store: &S,
    requester: &Requester,
    pagination: Pagination,
) -> Result<PageContext<UserView>, ServiceError> {
    let (users, total) = store.list_users(pagination).await?;

    let mut rows = Vec::with_capacity(users.len());
    for user in &users {
        rows.push(project_user(store, user, requester).await?);
    }

    Ok(PageContext::from_rows(rows, total, pagination))
}

pub async fn get_user<S: Store>(
    store: &S,
    id: Id,
    requester: &Requester,
) -> Result<UserView, ServiceError> {
    let user = store
        .get_user(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("No user exists with specified id"))?;

    project_user(store, &user, requester).await
}

pub async fn current_user<S: Store>(
    store: &S,
    requester: &Requester,
) -> Result<UserView, ServiceError> {
    let session = requester.session()?;
    get_user(store, session.user_id, requester).await
}

pub async fn list_subscriptions<S: Store>(
    store: &S,
    requester: &Requester,
    pagination: Pagination,
    recipes_limit: Option<i64>,
) -> Result<PageContext<SubscriptionView>, ServiceError> {
    let session = requester.session()?;
    let (authors, total) = store.list_subscriptions(session.user_id, pagination).await?;
    log::trace!("User {} has {total} subscriptions", session.user_id);

    let mut rows = Vec::with_capacity(authors.len());
    for author in &authors {
        rows.push(project_subscription(store, author, requester, recipes_limit).await?);
    }

    Ok(PageContext::from_rows(rows, total, pagination))
}
