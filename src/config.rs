use std::env;

use crate::constants::{
    DEFAULT_SESSION_SECRET, MAX_LENGTH_EMAIL, MAX_LENGTH_PASSWORD, MAX_LENGTH_TEXT_RECIPES,
    MAX_LENGTH_TEXT_USERS, RECIPE_COUNT_PER_PAGE,
};

/// `FOODGRAM_PAGE_SIZE` and `FOODGRAM_SESSION_SECRET` override the defaults
/// when loaded through [`Config::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub page_size: i64,
    pub max_password_length: usize,
    pub max_user_text_length: usize,
    pub max_email_length: usize,
    pub max_recipe_text_length: usize,
    pub session_secret: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: RECIPE_COUNT_PER_PAGE,
            max_password_length: MAX_LENGTH_PASSWORD,
            max_user_text_length: MAX_LENGTH_TEXT_USERS,
            max_email_length: MAX_LENGTH_EMAIL,
            max_recipe_text_length: MAX_LENGTH_TEXT_RECIPES,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = env::var("FOODGRAM_PAGE_SIZE") {
            match value.parse::<i64>() {
                Ok(size) if size > 0 => config.page_size = size,
                _ => log::warn!("Ignoring invalid FOODGRAM_PAGE_SIZE {value:?}"),
            }
        }

        match env::var("FOODGRAM_SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => config.session_secret = secret,
            _ => log::warn!("FOODGRAM_SESSION_SECRET not set; using the default secret"),
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_constants() {
        let config = Config::default();

        assert_eq!(config.page_size, 6);
        assert_eq!(config.max_password_length, 150);
        assert_eq!(config.max_recipe_text_length, 200);
        assert_eq!(config.max_email_length, 254);
    }
}
