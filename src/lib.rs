//! Bookshelf
//!
//! A small REST JSON server for managing book records, backed either by
//! an in-memory map or by PostgreSQL.

use std::sync::Arc;

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::BookRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub books: Arc<dyn BookRepository>,
}

impl AppState {
    pub fn new(config: AppConfig, books: Arc<dyn BookRepository>) -> Self {
        Self {
            config: Arc::new(config),
            books,
        }
    }
}
