// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Administrator repository backed by the `admin_users` table.

use async_trait::async_trait;
use sqlx::PgPool;

use super::super::database::{bounded, ADMIN_QUERY_TIMEOUT};
use super::super::{AdminStore, StorageError, StorageResult};
use crate::models::{Admin, NewAdmin};

const ADMIN_COLUMNS: &str = "id, email, password, name, verified, created_at";

/// PostgreSQL credentials store.
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminRepository {
    async fn find_by_email(&self, email: &str) -> StorageResult<Admin> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM admin_users WHERE email = $1");
        bounded(
            ADMIN_QUERY_TIMEOUT,
            sqlx::query_as::<_, Admin>(&query)
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("Admin {email}")))
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Admin> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM admin_users WHERE id = $1");
        bounded(
            ADMIN_QUERY_TIMEOUT,
            sqlx::query_as::<_, Admin>(&query)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("Admin {id}")))
    }

    async fn insert(&self, admin: NewAdmin) -> StorageResult<Admin> {
        let query = format!(
            "INSERT INTO admin_users (email, password, name) VALUES ($1, $2, $3) RETURNING {ADMIN_COLUMNS}"
        );
        bounded(
            ADMIN_QUERY_TIMEOUT,
            sqlx::query_as::<_, Admin>(&query)
                .bind(&admin.email)
                .bind(&admin.password_hash)
                .bind(&admin.name)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn update(&self, admin: &Admin) -> StorageResult<()> {
        let result = bounded(
            ADMIN_QUERY_TIMEOUT,
            sqlx::query(
                "UPDATE admin_users SET email = $1, password = $2, name = $3, verified = $4 WHERE id = $5",
            )
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(&admin.name)
            .bind(admin.verified)
            .bind(admin.id)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Admin {}", admin.id)));
        }
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<Admin>> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM admin_users ORDER BY id");
        bounded(
            ADMIN_QUERY_TIMEOUT,
            sqlx::query_as::<_, Admin>(&query).fetch_all(&self.pool),
        )
        .await
    }
}
