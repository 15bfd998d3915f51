use std::sync::Arc;

use warp::{
    reject::{self, Rejection},
    Filter,
};

use crate::constants::SESSION_COOKIE;

use super::jwt::{verify_jwt_session, Requester};

#[derive(Debug)]
struct Unauthorized;

impl reject::Reject for Unauthorized {}

fn resolve(session: Option<String>, secret: &str) -> Requester {
    match session.map(|token| verify_jwt_session(&token, secret)) {
        Some(Ok(data)) => Requester::Authenticated(data.into()),
        Some(Err(e)) => {
            log::trace!("Treating request as anonymous: {e}");
            Requester::Anonymous
        }
        None => Requester::Anonymous,
    }
}

/// Extracts the requester from the `session` cookie. A missing, invalid or
/// expired token yields [`Requester::Anonymous`].
pub fn with_requester(
    secret: Arc<str>,
) -> impl Filter<Extract = (Requester,), Error = std::convert::Infallible> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE)
        .map(move |session: Option<String>| resolve(session, &secret))
}

pub fn with_session(
    secret: Arc<str>,
) -> impl Filter<Extract = (Requester,), Error = Rejection> + Clone {
    with_requester(secret).and_then(|requester: Requester| async move {
        match requester {
            Requester::Anonymous => Err(warp::reject::custom(Unauthorized)),
            requester => Ok(requester),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        jwt::{sign_session, JwtSessionData},
        schema::UserRole,
    };

    fn secret() -> Arc<str> {
        Arc::from("key")
    }

    #[tokio::test]
    async fn no_cookie_is_anonymous() {
        let requester = warp::test::request()
            .filter(&with_requester(secret()))
            .await
            .unwrap();

        assert_eq!(requester, Requester::Anonymous);
    }

    #[tokio::test]
    async fn valid_cookie_is_authenticated() {
        let token = sign_session(
            &JwtSessionData::new(5, "bob".to_string(), UserRole::User),
            "key",
        );

        let requester = warp::test::request()
            .header("cookie", format!("session={token}"))
            .filter(&with_requester(secret()))
            .await
            .unwrap();

        assert_eq!(requester.user_id(), Some(5));
    }

    #[tokio::test]
    async fn garbage_cookie_is_anonymous() {
        let requester = warp::test::request()
            .header("cookie", "session=not-a-token")
            .filter(&with_requester(secret()))
            .await
            .unwrap();

        assert_eq!(requester, Requester::Anonymous);
    }

    #[tokio::test]
    async fn session_filter_rejects_anonymous() {
        let result = warp::test::request()
            .filter(&with_session(secret()))
            .await;

        assert!(result.is_err());
    }
}
