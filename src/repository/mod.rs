//! Repository layer for book persistence

pub mod books;
pub mod memory;

use std::{sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;

use crate::{
    config::{AppConfig, StorageBackend},
    error::AppResult,
};

pub use books::{BookStore, PgBookStore};
pub use memory::InMemoryBookStore;

/// Handle to the configured book store, opened once at startup
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBookStore::new()))
    }

    /// Open the store selected by configuration, running migrations for Postgres
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        match config.storage.backend {
            StorageBackend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .min_connections(config.database.min_connections)
                    .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
                    .connect(&config.database.url)
                    .await?;

                tracing::info!("Connected to database");

                sqlx::migrate!("./migrations").run(&pool).await?;

                tracing::info!("Database migrations completed");

                Ok(Self::new(Arc::new(PgBookStore::new(pool))))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory book store, records are lost on restart");
                Ok(Self::in_memory())
            }
        }
    }

    pub async fn close(&self) {
        self.books.close().await;
    }
}
