//! SQLite store and session handle
//!
//! The pool is owned by [`Store`]; all statements go through a [`Session`],
//! which holds exactly one pooled connection and counts the round trips made
//! on it. Dropping the session returns the connection to the pool.

use std::str::FromStr;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::{Connection, Sqlite, Transaction};
use tracing::debug;

use crate::config::DemoConfig;
use crate::error::Result;

const SCHEMA: &str = include_str!("schema.sql");

/// SQLite-backed store for authors, books and categories
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database named by `config` and apply the schema.
    pub async fn open(config: &DemoConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        // Multi-statement schema needs raw execution
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        debug!(url = %config.database_url, "store opened");
        Ok(Self { pool })
    }

    /// Acquire a connection for a sequence of statements.
    pub async fn session(&self) -> Result<Session> {
        let conn = self.pool.acquire().await?;
        Ok(Session {
            conn,
            round_trips: 0,
        })
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// One pooled connection plus a round-trip counter
pub struct Session {
    conn: PoolConnection<Sqlite>,
    round_trips: u64,
}

impl Session {
    /// Connection for exactly one statement; each call counts as one round trip.
    pub fn executor(&mut self) -> &mut SqliteConnection {
        self.round_trips += 1;
        &mut self.conn
    }

    /// Statements sent through [`Session::executor`] so far
    pub fn round_trips(&self) -> u64 {
        self.round_trips
    }

    /// Start a transaction on this session's connection.
    ///
    /// Statements run inside the transaction are not counted as round trips.
    pub async fn begin(&mut self) -> Result<Transaction<'_, Sqlite>> {
        let conn: &mut SqliteConnection = &mut self.conn;
        Ok(conn.begin().await?)
    }

    pub async fn count_authors(&mut self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM authors").await
    }

    pub async fn count_books(&mut self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM books").await
    }

    pub async fn count_categories(&mut self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM categories").await
    }

    pub async fn count_book_categories(&mut self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM book_categories").await
    }

    async fn count(&mut self, sql: &'static str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(self.executor()).await?;
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tempfile::TempDir;

    /// Fresh on-disk store; keep the `TempDir` alive for the store's lifetime.
    pub(crate) async fn temp_store() -> (TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let store = Store::open(&DemoConfig::with_database_url(url)).await.unwrap();
        (dir, store)
    }
}
