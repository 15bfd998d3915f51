use serde::Deserialize;

use crate::{
    config::Config,
    constants::USERNAME_SYMBOLS,
    cryptography::hash_password,
    database::store::Store,
    error::{QueryError, QueryErrorKind, ServiceError},
    schema::{NewUser, User, UserRole},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(ServiceError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn validate(form: &Registration, config: &Config) -> Result<(), ServiceError> {
    check_length("username", &form.username, config.max_user_text_length)?;
    if !form
        .username
        .chars()
        .all(|c| c.is_alphanumeric() || USERNAME_SYMBOLS.contains(&c))
    {
        return Err(ServiceError::validation(
            "username may only contain letters, digits and @.+-_",
        ));
    }

    check_length("email", &form.email, config.max_email_length)?;
    if !is_email(&form.email) {
        return Err(ServiceError::validation("Enter a valid email address"));
    }

    check_length("first_name", &form.first_name, config.max_user_text_length)?;
    check_length("last_name", &form.last_name, config.max_user_text_length)?;

    if form.password.is_empty() {
        return Err(ServiceError::validation("password is required"));
    }
    if form.password.chars().count() > config.max_password_length {
        return Err(ServiceError::Validation(format!(
            "password must be at most {} characters",
            config.max_password_length
        )));
    }

    Ok(())
}

pub async fn register_user<S: Store>(
    store: &S,
    config: &Config,
    form: Registration,
) -> Result<User, ServiceError> {
    validate(&form, config)?;

    let password = hash_password(&form.password).map_err(|e| {
        ServiceError::Query(QueryError::new(format!("Failed to hash password: {e}")))
    })?;

    let user = store
        .insert_user(NewUser {
            email: form.email,
            username: form.username,
            first_name: form.first_name,
            last_name: form.last_name,
            password,
            role: UserRole::User,
        })
        .await
        .map_err(|e| match e.kind() {
            QueryErrorKind::UniqueViolation => ServiceError::Duplicate(
                "A user with that username or email already exists".to_string(),
            ),
            _ => e.into(),
        })?;

    log::info!("Registered user {} ({})", user.username, user.id);
    Ok(user)
}
