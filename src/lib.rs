mod database {
    pub mod actions;
    pub mod error;
    pub mod form;
    pub mod memory;
    pub mod pagination;
    pub mod schema;
    pub mod store;
}
mod authentication {
    pub mod cryptography;
    pub mod jwt;
    pub mod middleware;
    pub mod permissions;
}
pub mod services {
    pub mod catalog;
    pub mod recipes;
    pub mod relations;
    pub mod shopping_list;
    pub mod users;
}
pub mod views {
    pub mod recipes;
    pub mod users;
}
pub mod config;
mod constants;

#[cfg(test)]
pub(crate) mod testing;

pub use authentication::*;
pub use constants::*;
pub use database::*;
