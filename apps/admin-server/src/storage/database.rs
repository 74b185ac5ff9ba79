// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PostgreSQL connection pool and storage errors.

use std::future::Future;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Timeout for administrator queries.
pub const ADMIN_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Timeout for user and blocked-record queries.
pub const LIST_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Postgres SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return StorageError::NotFound("row".to_string());
        }
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StorageError::AlreadyExists(db.message().to_string());
            }
        }
        StorageError::Database(err)
    }
}

/// Open a connection pool and check the database answers.
pub async fn connect(database_url: &str, max_connections: u32) -> StorageResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;

    ping(&pool).await?;
    Ok(pool)
}

/// `SELECT 1` against the pool, bounded by the admin query timeout.
pub async fn ping(pool: &PgPool) -> StorageResult<()> {
    bounded(ADMIN_QUERY_TIMEOUT, sqlx::query("SELECT 1").execute(pool)).await?;
    Ok(())
}

/// Run a query with an upper bound on its duration.
pub(crate) async fn bounded<T, F>(limit: Duration, query: F) -> StorageResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result.map_err(StorageError::from),
        Err(_) => Err(StorageError::Timeout(limit)),
    }
}
