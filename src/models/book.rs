//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Book record
///
/// The metadata fields are not written by any operation yet. They are
/// omitted from JSON when empty and are not stored in the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    /// Location of the book file
    pub path: String,

    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<i64>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl Book {
    /// Build a record with a freshly generated random id
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, path)
    }

    pub fn with_id(id: Uuid, title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            path: path.into(),
            author: None,
            publisher: None,
            description: None,
            isbn: None,
            doi: None,
        }
    }
}

/// Create book request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: String,
    pub path: String,
}

/// Update book request; omitted fields are left unchanged
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn basic_record_serializes_without_metadata() {
        let book = Book::new("Book 1", "/home/books");
        let value = serde_json::to_value(&book).unwrap();

        assert_eq!(
            value,
            json!({
                "id": book.id.to_string(),
                "title": "Book 1",
                "path": "/home/books",
            })
        );
    }

    #[test]
    fn metadata_round_trips_when_present() {
        let mut book = Book::new("Dune", "/books/dune.epub");
        book.author = Some("Frank Herbert".to_string());
        book.isbn = Some(9780441013593);

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["author"], "Frank Herbert");
        assert_eq!(value["isbn"], 9780441013593i64);
        assert!(value.get("doi").is_none());

        let decoded: Book = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, book);
    }

    #[test]
    fn new_books_get_distinct_ids() {
        let a = Book::new("A", "/a");
        let b = Book::new("A", "/a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn update_request_fields_are_optional() {
        let update: UpdateBook = serde_json::from_value(json!({ "title": "X" })).unwrap();
        assert_eq!(update.title.as_deref(), Some("X"));
        assert!(update.path.is_none());
    }
}
