//! Book API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
    AppState,
};

use super::BookId;

/// Book routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/books",
            get(list_books).post(create_book).delete(delete_all_books),
        )
        .route(
            "/books/:id",
            get(get_book).patch(update_book).delete(delete_book),
        )
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.books.list().await?;
    Ok(Json(books))
}

/// Get book by ID
///
/// An unknown id answers 200 with an empty body rather than 404.
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID (UUID)")),
    responses(
        (status = 200, description = "Book details, empty body if no such book", body = Book),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<Response> {
    let response = match state.books.get(id).await? {
        Some(book) => Json(book).into_response(),
        None => StatusCode::OK.into_response(),
    };
    Ok(response)
}

/// Create book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid body", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Json(data), _): WithRejection<Json<CreateBook>, AppError>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.books.create(data.title, data.path).await?;
    tracing::info!(id = %book.id, "Book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update book
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID (UUID)")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Malformed id, invalid body or no such book", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    BookId(id): BookId,
    WithRejection(Json(data), _): WithRejection<Json<UpdateBook>, AppError>,
) -> AppResult<Json<Book>> {
    state
        .books
        .update(id, data.title, data.path)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::BadRequest(format!("Book {} was not updated", id)))
}

/// Delete book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID (UUID)")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 400, description = "Malformed id or no such book", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<StatusCode> {
    if state.books.delete(id).await? {
        tracing::info!(%id, "Book deleted");
        Ok(StatusCode::OK)
    } else {
        Err(AppError::BadRequest(format!("Book {} does not exist", id)))
    }
}

/// Delete all books
#[utoipa::path(
    delete,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books deleted")
    )
)]
pub async fn delete_all_books(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.books.delete_all().await?;
    tracing::info!("All books deleted");
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Method, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        app::create_router,
        config::AppConfig,
        repository::{BookRepository, MemoryBookRepository, MockBookRepository},
    };

    use super::*;

    fn app(repository: impl BookRepository) -> Router {
        create_router(AppState::new(AppConfig::default(), Arc::new(repository)))
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn health_is_ok_and_empty() {
        let response = app(MockBookRepository::new())
            .oneshot(request(Method::GET, "/health", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_id_never_reaches_repository() {
        // The mock has no expectations, so any repository call panics.
        for method in [Method::GET, Method::DELETE] {
            let response = app(MockBookRepository::new())
                .oneshot(request(method, "/books/invalid", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = app(MockBookRepository::new())
            .oneshot(request(
                Method::PATCH,
                "/books/invalid",
                Some(json!({ "title": "Book 1", "path": "/home/books" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn alternate_uuid_spellings_are_rejected() {
        let id = Uuid::new_v4();
        let spellings = [
            id.simple().to_string(),
            format!("%7B{}%7D", id.hyphenated()),
            id.urn().to_string(),
        ];

        // The mock has no expectations, so any repository call panics.
        for spelling in &spellings {
            let uri = format!("/books/{}", spelling);
            for method in [Method::GET, Method::DELETE] {
                let response = app(MockBookRepository::new())
                    .oneshot(request(method, &uri, None))
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            }

            let response = app(MockBookRepository::new())
                .oneshot(request(Method::PATCH, &uri, Some(json!({ "title": "X" }))))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_bad_request() {
        let response = app(MockBookRepository::new())
            .oneshot(request(Method::POST, "/books", Some(json!({ "title": "No path" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app(MockBookRepository::new())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/books")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_absent_book_is_ok_with_empty_body() {
        let mut repository = MockBookRepository::new();
        repository.expect_get().times(1).returning(|_| Ok(None));

        let uri = format!("/books/{}", Uuid::new_v4());
        let response = app(repository)
            .oneshot(request(Method::GET, &uri, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn patch_absent_book_is_bad_request() {
        let mut repository = MockBookRepository::new();
        repository
            .expect_update()
            .times(1)
            .returning(|_, _, _| Ok(None));

        let uri = format!("/books/{}", Uuid::new_v4());
        let response = app(repository)
            .oneshot(request(Method::PATCH, &uri, Some(json!({ "title": "X" }))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_maps_result_to_status() {
        let mut repository = MockBookRepository::new();
        let mut seq = mockall::Sequence::new();
        repository
            .expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        repository
            .expect_delete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));

        let app = app(repository);
        let uri = format!("/books/{}", Uuid::new_v4());

        let response = app
            .clone()
            .oneshot(request(Method::DELETE, &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request(Method::DELETE, &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_fault_is_server_error() {
        let mut repository = MockBookRepository::new();
        repository
            .expect_list()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let response = app(repository)
            .oneshot(request(Method::GET, "/books", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["message"], "Database error");
    }

    #[tokio::test]
    async fn create_returns_created_book() {
        let response = app(MemoryBookRepository::new())
            .oneshot(request(
                Method::POST,
                "/books",
                Some(json!({ "title": "Book 1", "path": "/home/books" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let book: Book = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(book.title, "Book 1");
        assert_eq!(book.path, "/home/books");
    }
}
