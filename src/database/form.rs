use std::{
    collections::{hash_map::Entry, HashMap},
    str::FromStr,
};

use serde_json::Value;

use super::{
    error::ServiceError,
    pagination::Pagination,
    schema::{Id, RecipeFilter},
};

pub type FormData = HashMap<String, Value>;

pub struct Form {
    inner: FormData,
}

impl Form {
    pub fn from_data(data: FormData) -> Self {
        Self { inner: data }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut inner = FormData::new();

        for (key, value) in pairs {
            let value = Value::String(value.into());
            match inner.entry(key.into()) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                Entry::Occupied(mut entry) => match entry.get_mut() {
                    Value::Array(values) => values.push(value),
                    existing => {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, value]);
                    }
                },
            }
        }

        Self { inner }
    }

    pub fn get_number<T>(&self, key: &str) -> Result<Option<T>, ServiceError>
    where
        T: FromStr,
    {
        match self.inner.get(key) {
            Some(Value::Number(n)) => n
                .to_string()
                .parse()
                .map(Some)
                .map_err(|_e| ServiceError::Validation(format!("Invalid number for {key}"))),
            Some(Value::String(v)) if v.is_empty() => Ok(None),
            Some(Value::String(v)) => v
                .parse()
                .map(Some)
                .map_err(|_e| ServiceError::Validation(format!("Invalid number for {key}"))),
            Some(_) => Err(ServiceError::Validation(format!("Invalid number for {key}"))),
            None => Ok(None),
        }
    }

    pub fn get_flag(&self, key: &str) -> Result<bool, ServiceError> {
        match self.inner.get(key) {
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(v)) => match v.as_str() {
                "1" | "true" | "True" => Ok(true),
                "0" | "false" | "False" | "" => Ok(false),
                _ => Err(ServiceError::Validation(format!("Invalid flag for {key}"))),
            },
            Some(Value::Number(n)) => Ok(n.as_i64().unwrap_or(0) != 0),
            Some(_) => Err(ServiceError::Validation(format!("Invalid flag for {key}"))),
            None => Ok(false),
        }
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.inner.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(v)) => vec![v.to_owned()],
            _ => vec![],
        }
    }

    pub fn pagination(&self, default_limit: i64) -> Result<Pagination, ServiceError> {
        let limit = self.get_number::<i64>("limit")?.unwrap_or(default_limit);
        let page = self.get_number::<i64>("page")?.unwrap_or(1);

        if limit < 1 {
            return Err(ServiceError::validation("limit must be a positive number"));
        }

        Pagination::from_page(page, limit)
            .ok_or_else(|| ServiceError::validation("page is out of range"))
    }

    pub fn recipe_filter(&self) -> Result<RecipeFilter, ServiceError> {
        Ok(RecipeFilter {
            author: self.get_number::<Id>("author")?,
            tags: self.get_list("tags"),
            is_favorited: self.get_flag("is_favorited")?,
            is_in_shopping_cart: self.get_flag("is_in_shopping_cart")?,
        })
    }

    pub fn recipes_limit(&self) -> Result<Option<i64>, ServiceError> {
        match self.get_number::<i64>("recipes_limit")? {
            Some(limit) if limit < 0 => Err(ServiceError::validation(
                "recipes_limit must not be negative",
            )),
            limit => Ok(limit),
        }
    }
}
