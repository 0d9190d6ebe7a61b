//! Book catalog service

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Validate a request body and store it as a new book
    pub async fn create(&self, data: &Value) -> AppResult<Book> {
        let input = BookInput::from_json(data)?;
        let book = self.repository.books.create(&input).await?;
        tracing::info!("Created book id={} ({:?} by {:?})", book.id, book.title, book.author);
        Ok(book)
    }

    /// Validate a request body and overwrite an existing book with it
    pub async fn update(&self, book: &Book, data: &Value) -> AppResult<Book> {
        let input = BookInput::from_json(data)?;
        let updated = self
            .repository
            .books
            .update(book.id, &input)
            .await?
            .ok_or_else(|| not_found(book.id))?;
        tracing::info!("Updated book id={}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, book: &Book) -> AppResult<()> {
        if !self.repository.books.delete(book.id).await? {
            return Err(not_found(book.id));
        }
        tracing::info!("Deleted book id={}", book.id);
        Ok(())
    }

    /// Readiness probe for the underlying store
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.books.ping().await
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}
