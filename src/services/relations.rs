use crate::{
    database::store::Store,
    error::{QueryErrorKind, ServiceError},
    jwt::Requester,
    permissions::ActionType,
    schema::{Id, RelationKind, RelationRow},
};

pub struct RelationService<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> RelationService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    async fn ensure_target(&self, kind: RelationKind, target: Id) -> Result<(), ServiceError> {
        let exists = if kind.targets_user() {
            self.store.get_user(target).await?.is_some()
        } else {
            self.store.get_recipe(target).await?.is_some()
        };

        if !exists {
            return Err(ServiceError::not_found(if kind.targets_user() {
                "No user exists with specified id"
            } else {
                "No recipe exists with specified id"
            }));
        }
        Ok(())
    }

    pub async fn add_relation(
        &self,
        kind: RelationKind,
        actor: Id,
        target: Id,
    ) -> Result<RelationRow, ServiceError> {
        if kind == RelationKind::Subscription && actor == target {
            return Err(ServiceError::SelfReference(
                "You can't subscribe to yourself".to_string(),
            ));
        }

        self.ensure_target(kind, target).await?;

        if self.store.relation_exists(kind, actor, target).await? {
            return Err(ServiceError::Duplicate(kind.duplicate_message().to_string()));
        }

        match self.store.insert_relation(kind, actor, target).await {
            Ok(row) => {
                log::info!("User {actor} added {target} to {}", kind.table());
                Ok(row)
            }
            Err(e) if e.kind() == QueryErrorKind::UniqueViolation => {
                log::warn!(
                    "Concurrent insert of ({actor}, {target}) into {}",
                    kind.table()
                );
                Err(ServiceError::Duplicate(kind.duplicate_message().to_string()))
            }
            Err(e) if e.kind() == QueryErrorKind::MissingReference => {
                Err(ServiceError::not_found("Relation target no longer exists"))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove_relation(
        &self,
        kind: RelationKind,
        actor: Id,
        target: Id,
    ) -> Result<(), ServiceError> {
        let removed = self.store.delete_relation(kind, actor, target).await?;

        if removed == 0 {
            return Err(ServiceError::NotFound(kind.missing_message().to_string()));
        }

        log::info!("User {actor} removed {target} from {}", kind.table());
        Ok(())
    }

    pub async fn add_relation_as(
        &self,
        kind: RelationKind,
        requester: &Requester,
        target: Id,
    ) -> Result<RelationRow, ServiceError> {
        let session = requester.authenticate(ActionType::ManageOwnRelations)?;
        self.add_relation(kind, session.user_id, target).await
    }

    pub async fn remove_relation_as(
        &self,
        kind: RelationKind,
        requester: &Requester,
        target: Id,
    ) -> Result<(), ServiceError> {
        let session = requester.authenticate(ActionType::ManageOwnRelations)?;
        self.remove_relation(kind, session.user_id, target).await
    }

    pub async fn is_related(
        &self,
        kind: RelationKind,
        requester: &Requester,
        target: Id,
    ) -> Result<bool, ServiceError> {
        match requester.user_id() {
            Some(actor) => Ok(self.store.relation_exists(kind, actor, target).await?),
            None => Ok(false),
        }
    }
}
