//! In-memory book repository

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::BookRepository;
use crate::{error::AppResult, models::Book};

/// Books kept in a map behind a single lock.
///
/// Every operation takes the lock once, so callers never observe a
/// half-applied update.
#[derive(Default)]
pub struct MemoryBookRepository {
    books: Mutex<HashMap<Uuid, Book>>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn create(&self, title: String, path: String) -> AppResult<Book> {
        let book = Book::new(title, path);
        self.books.lock().await.insert(book.id, book.clone());
        tracing::debug!(id = %book.id, "Created book");
        Ok(book)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.lock().await.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.lock().await.values().cloned().collect())
    }

    async fn update(
        &self,
        id: Uuid,
        title: Option<String>,
        path: Option<String>,
    ) -> AppResult<Option<Book>> {
        if title.is_none() && path.is_none() {
            return Ok(None);
        }

        let mut books = self.books.lock().await;
        let Some(book) = books.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = title {
            book.title = title;
        }
        if let Some(path) = path {
            book.path = path;
        }
        tracing::debug!(%id, "Updated book");

        Ok(Some(book.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let removed = self.books.lock().await.remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "Deleted book");
        }
        Ok(removed)
    }

    async fn delete_all(&self) -> AppResult<()> {
        self.books.lock().await.clear();
        Ok(())
    }
}
