use chrono::Duration;
use chrono::Local;
use hmac::{Hmac, Mac};
use jwt::VerifyWithKey;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use crate::constants::SESSION_LIFETIME_HOURS;
use crate::error::ServiceError;
use crate::schema::{Id, UserRole};

use super::permissions::ActionType;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtSessionData {
    pub user_id: Id,
    pub username: String,
    pub user_role: UserRole,
    iat: i64,
    exp: i64,
}

impl JwtSessionData {
    pub fn new(id: Id, username: String, role: UserRole) -> Self {
        let now = Local::now();
        let iat = now.timestamp();
        let exp = (now + Duration::hours(SESSION_LIFETIME_HOURS)).timestamp();

        Self {
            user_id: id,
            username,
            user_role: role,
            iat,
            exp,
        }
    }

    pub fn is_expired(&self) -> bool {
        (self.exp - Local::now().timestamp()).is_negative()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    pub user_id: Id,
    pub username: String,
    pub user_role: UserRole,
    pub is_admin: bool,
}

impl From<JwtSessionData> for SessionData {
    fn from(value: JwtSessionData) -> Self {
        SessionData {
            is_admin: value.user_role == UserRole::Admin,
            user_id: value.user_id,
            username: value.username,
            user_role: value.user_role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Requester {
    #[default]
    Anonymous,
    Authenticated(SessionData),
}

impl Requester {
    pub fn user_id(&self) -> Option<Id> {
        match self {
            Requester::Anonymous => None,
            Requester::Authenticated(session) => Some(session.user_id),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Requester::Authenticated(session) if session.is_admin)
    }

    pub fn session(&self) -> Result<&SessionData, ServiceError> {
        match self {
            Requester::Anonymous => Err(ServiceError::Authorization(
                "Authentication credentials were not provided".to_string(),
            )),
            Requester::Authenticated(session) => Ok(session),
        }
    }

    pub fn authenticate(&self, action: ActionType) -> Result<&SessionData, ServiceError> {
        let session = self.session()?;
        if !action.authenticate(session) {
            return Err(ServiceError::Authorization(
                "You don't have permission to perform this action".to_string(),
            ));
        }
        Ok(session)
    }
}

impl From<SessionData> for Requester {
    fn from(value: SessionData) -> Self {
        Requester::Authenticated(value)
    }
}

pub fn verify_jwt_session(token: &str, secret: &str) -> Result<JwtSessionData, ServiceError> {
    let key: Hmac<Sha256> = Hmac::new_from_slice(secret.as_bytes())
        .map_err(|_| ServiceError::Authorization("Invalid session key".to_string()))?;

    let session: JwtSessionData = token
        .verify_with_key(&key)
        .map_err(|_| ServiceError::Authorization("Invalid session; Invalid token".to_string()))?;

    if session.is_expired() {
        return Err(ServiceError::Authorization(
            "Invalid session; Token expired".to_string(),
        ));
    }

    Ok(session)
}

#[cfg(test)]
pub(crate) fn sign_session(claims: &JwtSessionData, secret: &str) -> String {
    use jwt::SignWithKey;

    let key: Hmac<Sha256> = Hmac::new_from_slice(secret.as_bytes()).unwrap();
    claims.sign_with_key(&key).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_token_round_trips_into_a_session() {
        let claims = JwtSessionData::new(7, "alice".to_string(), UserRole::Admin);
        let token = sign_session(&claims, "key");

        let session: SessionData = verify_jwt_session(&token, "key").unwrap().into();

        assert_eq!(session.user_id, 7);
        assert!(session.is_admin);
    }

    #[test]
    fn token_signed_with_another_key_is_rejected() {
        let claims = JwtSessionData::new(7, "alice".to_string(), UserRole::User);
        let token = sign_session(&claims, "key");

        assert!(matches!(
            verify_jwt_session(&token, "other"),
            Err(ServiceError::Authorization(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = JwtSessionData::new(7, "alice".to_string(), UserRole::User);
        claims.exp = Local::now().timestamp() - 60;
        let token = sign_session(&claims, "key");

        assert!(verify_jwt_session(&token, "key").is_err());
    }

    #[test]
    fn anonymous_requester_has_no_session() {
        let requester = Requester::Anonymous;

        assert_eq!(requester.user_id(), None);
        assert!(!requester.is_admin());
        assert!(requester.authenticate(ActionType::ManageOwnRelations).is_err());
    }
}
