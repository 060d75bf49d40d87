pub mod codec;
pub mod memory;

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sqlx::{migrate::MigrateDatabase, sqlite::{SqlitePool, SqlitePoolOptions}, Sqlite, Row};

use crate::error::StoreError;
use crate::models::{ItemId, VoteRecord};

pub use memory::MemoryVoteStore;

/// Per-item vote persistence.
///
/// `save` replaces the whole record in one step. Callers that need
/// read-modify-write atomicity serialize on the item themselves (see
/// `VotingEngine`).
#[async_trait]
pub trait VoteStore: Send + Sync {
    // Current record for the item, or an empty one if nobody voted yet
    async fn load(&self, item_id: ItemId) -> Result<VoteRecord, StoreError>;

    async fn save(&self, item_id: ItemId, record: &VoteRecord) -> Result<(), StoreError>;
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self, StoreError> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating vote database at {}", db_url);
            Sqlite::create_database(db_url).await?;
        }

        // Every connection to an in-memory database sees its own empty database
        let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    // Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS article_votes (
                item_id INTEGER PRIMARY KEY,
                record TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl VoteStore for Database {
    async fn load(&self, item_id: ItemId) -> Result<VoteRecord, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT record
            FROM article_votes
            WHERE item_id = ?
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => codec::decode(&row.try_get::<String, _>("record")?),
            None => Ok(VoteRecord::new()),
        }
    }

    async fn save(&self, item_id: ItemId, record: &VoteRecord) -> Result<(), StoreError> {
        let raw = codec::encode(record)?;

        // Single upsert: the stored record is either the old one or the new one
        sqlx::query(
            r#"
            INSERT INTO article_votes (item_id, record, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(item_id)
            DO UPDATE SET record = excluded.record, updated_at = excluded.updated_at
            "#,
        )
        .bind(item_id)
        .bind(raw)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
