//! Process-local book store

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::books::BookStore;
use crate::{
    error::AppResult,
    models::book::{Book, BookInput},
};

#[derive(Default)]
struct Shelf {
    books: BTreeMap<i64, Book>,
    last_id: i64,
}

/// Keeps books in a map ordered by id. Ids are never reused.
#[derive(Default)]
pub struct InMemoryBookStore {
    shelf: RwLock<Shelf>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let shelf = self.shelf.read().await;
        Ok(shelf.books.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> AppResult<Option<Book>> {
        let shelf = self.shelf.read().await;
        Ok(shelf.books.get(&id).cloned())
    }

    async fn create(&self, input: &BookInput) -> AppResult<Book> {
        let mut shelf = self.shelf.write().await;
        shelf.last_id += 1;
        let book = Book {
            id: shelf.last_id,
            title: input.title.clone(),
            author: input.author.clone(),
        };
        shelf.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i64, input: &BookInput) -> AppResult<Option<Book>> {
        let mut shelf = self.shelf.write().await;
        Ok(shelf.books.get_mut(&id).map(|book| {
            book.title = input.title.clone();
            book.author = input.author.clone();
            book.clone()
        }))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut shelf = self.shelf.write().await;
        Ok(shelf.books.remove(&id).is_some())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {
        let shelf = self.shelf.read().await;
        tracing::debug!("Dropping in-memory store with {} books", shelf.books.len());
    }
}
