//! HTTP API.
//!
//! Handlers are stateless; everything lives in the database behind
//! [`AppState`].

mod handlers;
mod routes;
mod tables;
mod types;
mod votes;

use sea_orm::DatabaseConnection;

pub use routes::router;

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}
