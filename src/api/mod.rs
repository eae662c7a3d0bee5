//! API handlers for Bookshelf REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::AppError;

/// Extractor for the `:id` path segment of book routes.
///
/// Only the hyphenated 8-4-4-4-12 form is accepted; anything else,
/// including the simple, braced and URN spellings, is rejected with 400
/// before a handler runs.
#[derive(Debug, Clone, Copy)]
pub struct BookId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for BookId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;

        parse_hyphenated(&raw)
            .map(BookId)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid book id: {}", raw)))
    }
}

const HYPHENATED_LEN: usize = 36;

fn parse_hyphenated(raw: &str) -> Option<Uuid> {
    if raw.len() != HYPHENATED_LEN {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_hyphenated_ids_parse() {
        let id = Uuid::new_v4();

        assert_eq!(parse_hyphenated(&id.hyphenated().to_string()), Some(id));
        assert_eq!(parse_hyphenated(&id.simple().to_string()), None);
        assert_eq!(parse_hyphenated(&id.braced().to_string()), None);
        assert_eq!(parse_hyphenated(&id.urn().to_string()), None);
        assert_eq!(parse_hyphenated("invalid"), None);
    }
}
