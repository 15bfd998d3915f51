use std::fmt::{self, Display};

use potion::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    UniqueViolation,
    MissingReference,
    Other,
}

#[derive(Debug, Clone)]
pub struct QueryError {
    info: String,
    kind: QueryErrorKind,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self {
            info,
            kind: QueryErrorKind::Other,
        }
    }

    pub fn unique_violation(info: String) -> Self {
        Self {
            info,
            kind: QueryErrorKind::UniqueViolation,
        }
    }

    pub fn missing_reference(info: String) -> Self {
        Self {
            info,
            kind: QueryErrorKind::MissingReference,
        }
    }

    pub fn kind(&self) -> QueryErrorKind {
        self.kind
    }

    pub fn info(&self) -> &str {
        &self.info
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Database(e) if e.is_unique_violation() => {
                Self::unique_violation(format!("{e}"))
            }
            sqlx::Error::Database(e) if e.is_foreign_key_violation() => {
                Self::missing_reference(format!("{e}"))
            }
            sqlx::Error::Database(e) => Self::new(format!("{e}")),
            sqlx::Error::RowNotFound => Self::new(format!("RowNotFound")),
            sqlx::Error::ColumnNotFound(e) => Self::new(format!("Column not found: {e}")),
            sqlx::Error::PoolTimedOut => Self::new(format!("Pool timed out")),
            sqlx::Error::PoolClosed => Self::new(format!("Pool closed")),
            e => Self::new(format!("{e}")),
        }
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for QueryError {}

impl Into<Error> for QueryError {
    fn into(self) -> Error {
        Error {
            code: 500,
            info: Some(self.info),
            redirect: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ServiceError {
    Duplicate(String),
    NotFound(String),
    SelfReference(String),
    Validation(String),
    Authorization(String),
    Query(QueryError),
}

impl ServiceError {
    pub fn validation(info: &str) -> Self {
        Self::Validation(info.to_string())
    }

    pub fn not_found(info: &str) -> Self {
        Self::NotFound(info.to_string())
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Duplicate(info)
            | ServiceError::NotFound(info)
            | ServiceError::SelfReference(info)
            | ServiceError::Validation(info)
            | ServiceError::Authorization(info) => write!(f, "{info}"),
            ServiceError::Query(e) => write!(f, "Query failed {e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<QueryError> for ServiceError {
    fn from(value: QueryError) -> Self {
        match value.kind() {
            QueryErrorKind::UniqueViolation => Self::Duplicate(value.info),
            QueryErrorKind::MissingReference => {
                Self::validation("Referenced ingredient, tag, recipe or user doesn't exist")
            }
            QueryErrorKind::Other => {
                log::error!("Query failed {value}");
                Self::Query(value)
            }
        }
    }
}

impl From<ServiceError> for Error {
    fn from(value: ServiceError) -> Self {
        let info = Some(value.to_string());
        match value {
            ServiceError::Query(e) => e.into(),
            ServiceError::Authorization(_) => Error {
                code: 403,
                info,
                redirect: None,
            },
            ServiceError::NotFound(_) => Error {
                code: 404,
                info,
                redirect: None,
            },
            _ => Error {
                code: 400,
                info,
                redirect: None,
            },
        }
    }
}
