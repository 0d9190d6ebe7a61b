//! Book collection and item endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{AppResult, ErrorResponse},
    models::book::{Book, BookInput},
    AppState,
};

use super::{BookId, BookPayload};

/// List all books
#[utoipa::path(
    get,
    path = "/",
    tag = "books",
    responses(
        (status = 200, description = "All books in insertion order", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Field errors keyed by field name"),
        (status = 415, description = "Body is not JSON", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: BookPayload,
) -> AppResult<(StatusCode, Json<Book>)> {
    let data = payload.into_json()?;
    let book = state.services.books.create(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/{id}/",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "No such book")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Replace a book's title and author
#[utoipa::path(
    put,
    path = "/{id}/",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Field errors keyed by field name"),
        (status = 404, description = "No such book")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    BookId(id): BookId,
    payload: BookPayload,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(id).await?;
    let data = payload.into_json()?;
    let updated = state.services.books.update(&book, &data).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/{id}/",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "No such book")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    BookId(id): BookId,
) -> AppResult<StatusCode> {
    let book = state.services.books.get(id).await?;
    state.services.books.delete(&book).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{config::AppConfig, error::AppError, repository::Repository};

    async fn seeded() -> (AppState, Book, Book) {
        let state = AppState::new(AppConfig::default(), Repository::in_memory());
        let books = &state.services.books;
        let book1 = books
            .create(&json!({"title": "Test Book 1", "author": "Test Author 1"}))
            .await
            .unwrap();
        let book2 = books
            .create(&json!({"title": "Test Book 2", "author": "Test Author 2"}))
            .await
            .unwrap();
        (state, book1, book2)
    }

    async fn count(state: &AppState) -> usize {
        state.services.books.list().await.unwrap().len()
    }

    #[tokio::test]
    async fn test_get_list() {
        let (state, _, _) = seeded().await;

        let Json(books) = list_books(State(state)).await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "Test Book 1");
        assert_eq!(books[1].title, "Test Book 2");
    }

    #[tokio::test]
    async fn test_get_detail() {
        let (state, book1, _) = seeded().await;

        let Json(book) = get_book(State(state), BookId(book1.id)).await.unwrap();
        assert_eq!(book.title, "Test Book 1");
        assert_eq!(book.author, "Test Author 1");
    }

    #[tokio::test]
    async fn test_post_create() {
        let (state, _, _) = seeded().await;
        let payload = BookPayload::json(json!({"title": "New Book", "author": "New Author"}));

        let (status, Json(created)) = create_book(State(state.clone()), payload).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(count(&state).await, 3);

        let stored = state.services.books.get(created.id).await.unwrap();
        assert_eq!(stored.title, "New Book");
        assert_eq!(stored.author, "New Author");
    }

    #[tokio::test]
    async fn test_post_invalid() {
        let (state, _, _) = seeded().await;
        let payload = BookPayload::json(json!({"title": "No Author"}));

        let result = create_book(State(state.clone()), payload).await;
        let Err(AppError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert!(errors.get("author").is_some());
        assert_eq!(count(&state).await, 2);
    }

    #[tokio::test]
    async fn test_put_update() {
        let (state, book1, book2) = seeded().await;
        let payload =
            BookPayload::json(json!({"title": "Updated Book", "author": "Updated Author"}));

        let Json(updated) = update_book(State(state.clone()), BookId(book1.id), payload)
            .await
            .unwrap();
        assert_eq!(updated.id, book1.id);

        let stored = state.services.books.get(book1.id).await.unwrap();
        assert_eq!(stored.title, "Updated Book");
        assert_eq!(stored.author, "Updated Author");
        assert_eq!(state.services.books.get(book2.id).await.unwrap(), book2);
    }

    #[tokio::test]
    async fn test_put_invalid_keeps_record() {
        let (state, book1, _) = seeded().await;
        let payload = BookPayload::json(json!({"title": "Updated Book", "author": null}));

        let result = update_book(State(state.clone()), BookId(book1.id), payload).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(state.services.books.get(book1.id).await.unwrap(), book1);
    }

    #[tokio::test]
    async fn test_delete_destroy() {
        let (state, book1, _) = seeded().await;

        let status = delete_book(State(state.clone()), BookId(book1.id)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(count(&state).await, 1);
        assert!(matches!(
            state.services.books.get(book1.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_id_short_circuits() {
        let (state, _, _) = seeded().await;

        let result = get_book(State(state.clone()), BookId(999)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // Body errors are not reported for a book that does not exist
        let payload = BookPayload(Err(AppError::BadRequest("JSON parse error".into())));
        let result = update_book(State(state.clone()), BookId(999), payload).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = delete_book(State(state.clone()), BookId(999)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let titles: Vec<_> = state
            .services
            .books
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|book| BookInput::from(book).title)
            .collect();
        assert_eq!(titles, vec!["Test Book 1", "Test Book 2"]);
    }
}
