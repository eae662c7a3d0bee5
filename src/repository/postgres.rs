//! PostgreSQL book repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::BookRepository;
use crate::{error::AppResult, models::Book};

#[derive(Clone)]
pub struct PostgresBookRepository {
    pool: Pool<Postgres>,
}

impl PostgresBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create the `books` table if it does not exist yet
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Pick the UPDATE statement for the supplied fields and the values to bind
/// before the trailing id. `None` when there is nothing to change.
fn update_statement(
    title: Option<String>,
    path: Option<String>,
) -> Option<(&'static str, Vec<String>)> {
    match (title, path) {
        (Some(title), Some(path)) => Some((
            "UPDATE books SET title = $1, path = $2 WHERE id = $3 RETURNING id, title, path",
            vec![title, path],
        )),
        (Some(title), None) => Some((
            "UPDATE books SET title = $1 WHERE id = $2 RETURNING id, title, path",
            vec![title],
        )),
        (None, Some(path)) => Some((
            "UPDATE books SET path = $1 WHERE id = $2 RETURNING id, title, path",
            vec![path],
        )),
        (None, None) => None,
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn create(&self, title: String, path: String) -> AppResult<Book> {
        let book = Book::new(title, path);
        sqlx::query("INSERT INTO books (id, title, path) VALUES ($1, $2, $3)")
            .bind(book.id)
            .bind(&book.title)
            .bind(&book.path)
            .execute(&self.pool)
            .await?;
        tracing::debug!(id = %book.id, "Created book");
        Ok(book)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, path FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT id, title, path FROM books")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(
        &self,
        id: Uuid,
        title: Option<String>,
        path: Option<String>,
    ) -> AppResult<Option<Book>> {
        let Some((sql, values)) = update_statement(title, path) else {
            return Ok(None);
        };

        let mut query = sqlx::query_as::<_, Book>(sql);
        for value in values {
            query = query.bind(value);
        }
        let book = query.bind(id).fetch_optional(&self.pool).await?;

        if book.is_some() {
            tracing::debug!(%id, "Updated book");
        }
        Ok(book)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        // Check and delete run as separate statements; two concurrent
        // deletes of one id may both report success.
        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(%id, "Deleted book");
        Ok(true)
    }

    async fn delete_all(&self) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books").execute(&self.pool).await?;
        tracing::debug!(removed = result.rows_affected(), "Deleted all books");
        Ok(())
    }
}
