// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository for the `users` and `images` tables.
//!
//! Users are read-only from the admin service apart from the `blocked`
//! flag, which moderation flips when a blocked record is created or removed.

use async_trait::async_trait;
use sqlx::PgPool;

use super::super::database::{bounded, LIST_QUERY_TIMEOUT};
use super::super::{StorageError, StorageResult, UserStore};
use crate::models::{Image, ListParams, PageMeta, User, UserPage};

const USER_COLUMNS: &str = "id, username, birthday, aws_cognito_id, created_at, \
     verified, is_private, inbox_locked, swiper_mode, blocked, name, gender, country_name, \
     country_flag, country_iso_code, country_lat, country_lng, city_name, city_lat, city_lng, \
     bio, profile_image_id";

const USER_SEARCH: &str = "LOWER(username) LIKE $1 OR LOWER(COALESCE(name, '')) LIKE $1";

/// PostgreSQL user store.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach the profile image when the user has one.
    async fn with_profile_image(&self, mut user: User) -> StorageResult<User> {
        if let Some(image_id) = user.profile_image_id {
            user.profile_image = bounded(
                LIST_QUERY_TIMEOUT,
                sqlx::query_as::<_, Image>(
                    "SELECT id, user_id, url, created_at FROM images WHERE id = $1",
                )
                .bind(image_id)
                .fetch_optional(&self.pool),
            )
            .await?;
        }
        Ok(user)
    }

    async fn count(&self, pattern: Option<&str>) -> StorageResult<i64> {
        let total = match pattern {
            Some(pattern) => {
                let query = format!("SELECT COUNT(*) FROM users WHERE {USER_SEARCH}");
                bounded(
                    LIST_QUERY_TIMEOUT,
                    sqlx::query_scalar::<_, i64>(&query)
                        .bind(pattern)
                        .fetch_one(&self.pool),
                )
                .await?
            }
            None => {
                bounded(
                    LIST_QUERY_TIMEOUT,
                    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                        .fetch_one(&self.pool),
                )
                .await?
            }
        };
        Ok(total)
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> StorageResult<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = bounded(
            LIST_QUERY_TIMEOUT,
            sqlx::query_as::<_, User>(&query)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("User {id}")))?;

        self.with_profile_image(user).await
    }

    async fn find_by_username(&self, username: &str) -> StorageResult<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = bounded(
            LIST_QUERY_TIMEOUT,
            sqlx::query_as::<_, User>(&query)
                .bind(username)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("User {username}")))?;

        self.with_profile_image(user).await
    }

    async fn list(&self, params: &ListParams) -> StorageResult<UserPage> {
        let pattern = params.search_pattern();
        let total = self.count(pattern.as_deref()).await?;

        // Sort column and direction come from a whitelist, never from raw input.
        let order_by = format!("ORDER BY {} {}", params.sort, params.order.as_sql());
        let rows = match pattern.as_deref() {
            Some(pattern) => {
                let query = format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE {USER_SEARCH} {order_by} LIMIT $2 OFFSET $3"
                );
                bounded(
                    LIST_QUERY_TIMEOUT,
                    sqlx::query_as::<_, User>(&query)
                        .bind(pattern)
                        .bind(params.page_size)
                        .bind(params.offset())
                        .fetch_all(&self.pool),
                )
                .await?
            }
            None => {
                let query =
                    format!("SELECT {USER_COLUMNS} FROM users {order_by} LIMIT $1 OFFSET $2");
                bounded(
                    LIST_QUERY_TIMEOUT,
                    sqlx::query_as::<_, User>(&query)
                        .bind(params.page_size)
                        .bind(params.offset())
                        .fetch_all(&self.pool),
                )
                .await?
            }
        };

        let mut users = Vec::with_capacity(rows.len());
        for user in rows {
            users.push(self.with_profile_image(user).await?);
        }

        Ok(UserPage {
            users,
            meta: PageMeta::new(total, params),
        })
    }

    async fn set_blocked(&self, id: i64, blocked: bool) -> StorageResult<()> {
        let result = bounded(
            LIST_QUERY_TIMEOUT,
            sqlx::query("UPDATE users SET blocked = $1 WHERE id = $2")
                .bind(blocked)
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("User {id}")));
        }
        Ok(())
    }
}
