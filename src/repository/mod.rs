//! Repository layer for book storage

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{error::AppResult, models::Book};

pub use memory::MemoryBookRepository;
pub use postgres::PostgresBookRepository;

/// Storage backend for books.
///
/// Implementations own the canonical records and hand out clones.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    /// Store a new book under a freshly generated id
    async fn create(&self, title: String, path: String) -> AppResult<Book>;

    /// Get a book, `None` if no record has this id
    async fn get(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// List all books, in no particular order
    async fn list(&self) -> AppResult<Vec<Book>>;

    /// Replace the supplied fields and return the updated book.
    ///
    /// Returns `None` if the book does not exist or neither field is given.
    async fn update(
        &self,
        id: Uuid,
        title: Option<String>,
        path: Option<String>,
    ) -> AppResult<Option<Book>>;

    /// Delete a book. Returns `true` if a record was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete every book
    async fn delete_all(&self) -> AppResult<()>;
}
