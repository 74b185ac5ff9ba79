// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blocked-record repository for the `blockeds` table.

use async_trait::async_trait;
use sqlx::PgPool;

use super::super::database::{bounded, LIST_QUERY_TIMEOUT};
use super::super::{BlockedStore, StorageError, StorageResult, UserStore};
use super::users::PgUserRepository;
use crate::models::{Blocked, BlockedPage, ListParams, PageMeta};

const BLOCKED_COLUMNS: &str = "id, user_id, reason, created_at";

/// PostgreSQL moderation store. Records are returned with their user loaded.
#[derive(Clone)]
pub struct PgBlockedRepository {
    pool: PgPool,
    users: PgUserRepository,
}

impl PgBlockedRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            pool,
        }
    }

    async fn with_user(&self, mut blocked: Blocked) -> StorageResult<Blocked> {
        blocked.user = match self.users.find_by_id(blocked.user_id).await {
            Ok(user) => Some(user),
            Err(StorageError::NotFound(_)) => None,
            Err(err) => return Err(err),
        };
        Ok(blocked)
    }
}

#[async_trait]
impl BlockedStore for PgBlockedRepository {
    async fn find_by_id(&self, id: i64) -> StorageResult<Blocked> {
        let query = format!("SELECT {BLOCKED_COLUMNS} FROM blockeds WHERE id = $1");
        let blocked = bounded(
            LIST_QUERY_TIMEOUT,
            sqlx::query_as::<_, Blocked>(&query)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("Blocked {id}")))?;

        self.with_user(blocked).await
    }

    async fn list(&self, params: &ListParams) -> StorageResult<BlockedPage> {
        let pattern = params.search_pattern();
        let order_by = format!("ORDER BY {} {}", params.sort, params.order.as_sql());

        let (total, rows) = match pattern.as_deref() {
            Some(pattern) => {
                let total = bounded(
                    LIST_QUERY_TIMEOUT,
                    sqlx::query_scalar::<_, i64>(
                        "SELECT COUNT(*) FROM blockeds WHERE LOWER(reason) LIKE $1",
                    )
                    .bind(pattern)
                    .fetch_one(&self.pool),
                )
                .await?;

                let query = format!(
                    "SELECT {BLOCKED_COLUMNS} FROM blockeds WHERE LOWER(reason) LIKE $1 {order_by} LIMIT $2 OFFSET $3"
                );
                let rows = bounded(
                    LIST_QUERY_TIMEOUT,
                    sqlx::query_as::<_, Blocked>(&query)
                        .bind(pattern)
                        .bind(params.page_size)
                        .bind(params.offset())
                        .fetch_all(&self.pool),
                )
                .await?;
                (total, rows)
            }
            None => {
                let total = bounded(
                    LIST_QUERY_TIMEOUT,
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blockeds")
                        .fetch_one(&self.pool),
                )
                .await?;

                let query = format!(
                    "SELECT {BLOCKED_COLUMNS} FROM blockeds {order_by} LIMIT $1 OFFSET $2"
                );
                let rows = bounded(
                    LIST_QUERY_TIMEOUT,
                    sqlx::query_as::<_, Blocked>(&query)
                        .bind(params.page_size)
                        .bind(params.offset())
                        .fetch_all(&self.pool),
                )
                .await?;
                (total, rows)
            }
        };

        let mut blockeds = Vec::with_capacity(rows.len());
        for blocked in rows {
            blockeds.push(self.with_user(blocked).await?);
        }

        Ok(BlockedPage {
            blockeds,
            meta: PageMeta::new(total, params),
        })
    }

    async fn create(&self, user_id: i64, reason: &str) -> StorageResult<Blocked> {
        let query = format!(
            "INSERT INTO blockeds (user_id, reason) VALUES ($1, $2) RETURNING {BLOCKED_COLUMNS}"
        );
        let blocked = bounded(
            LIST_QUERY_TIMEOUT,
            sqlx::query_as::<_, Blocked>(&query)
                .bind(user_id)
                .bind(reason)
                .fetch_one(&self.pool),
        )
        .await?;

        self.with_user(blocked).await
    }

    async fn count_for_user(&self, user_id: i64) -> StorageResult<i64> {
        bounded(
            LIST_QUERY_TIMEOUT,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blockeds WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn update_reason(&self, id: i64, reason: &str) -> StorageResult<Blocked> {
        let query = format!(
            "UPDATE blockeds SET reason = $1 WHERE id = $2 RETURNING {BLOCKED_COLUMNS}"
        );
        let blocked = bounded(
            LIST_QUERY_TIMEOUT,
            sqlx::query_as::<_, Blocked>(&query)
                .bind(reason)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("Blocked {id}")))?;

        self.with_user(blocked).await
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let result = bounded(
            LIST_QUERY_TIMEOUT,
            sqlx::query("DELETE FROM blockeds WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
