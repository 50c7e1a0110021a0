//! # medialink-db
//!
//! PostgreSQL persistence layer for medialink.
//!
//! This crate provides:
//! - Connection pool management
//! - The media document repository
//! - Schema migrations (behind the `migrations` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use medialink_db::{Database, DocumentRepository, MediaType, NewDocument};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/medialink").await?;
//!
//!     let doc = db.documents.insert(NewDocument {
//!         title: "Field Interview".to_string(),
//!         description: None,
//!         media_url: "media/interview.mp3".to_string(),
//!         media_type: MediaType::Audio,
//!     }).await?;
//!
//!     println!("Created document: {}", doc.id);
//!     Ok(())
//! }
//! ```

pub mod documents;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use medialink_core::*;

pub use documents::PgDocumentRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

/// Combined database context.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::PgPool,
    /// Media document repository.
    pub documents: PgDocumentRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            documents: PgDocumentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
