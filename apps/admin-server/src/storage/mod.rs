// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistence for administrators, users and blocked records.
//!
//! Each entity is reached through a capability trait with one PostgreSQL
//! implementation (see [`repository`]). [`memory::InMemoryStore`]
//! implements all three traits for development mode and tests.
//!
//! ## Tables
//!
//! ```text
//! admin_users (id, email, password, name, verified, created_at)
//! users       (id, username, birthday, aws_cognito_id, created_at, ..., blocked)
//! images      (id, user_id, url, created_at)
//! blockeds    (id, user_id, reason, created_at)
//! ```
//!
//! ## Timeouts
//!
//! Every query is bounded: a stalled database fails the call with
//! [`StorageError::Timeout`] instead of hanging the request.

use async_trait::async_trait;

use crate::models::{
    Admin, Blocked, BlockedPage, ListParams, NewAdmin, User, UserPage,
};

pub mod database;
pub mod memory;
pub mod repository;

pub use database::{connect, StorageError, StorageResult};
pub use memory::InMemoryStore;
pub use repository::{PgAdminRepository, PgBlockedRepository, PgUserRepository};

/// Columns admins may sort users by. The first entry is the fallback.
pub const USER_SORT_COLUMNS: &[&str] = &["id", "username", "created_at"];

/// Columns admins may sort blocked records by. The first entry is the fallback.
pub const BLOCKED_SORT_COLUMNS: &[&str] = &["id", "user_id", "created_at"];

/// Credentials store for administrators.
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StorageResult<Admin>;

    async fn find_by_id(&self, id: i64) -> StorageResult<Admin>;

    /// Insert a new, unverified administrator.
    async fn insert(&self, admin: NewAdmin) -> StorageResult<Admin>;

    /// Persist email, password hash, name and verification flag.
    async fn update(&self, admin: &Admin) -> StorageResult<()>;

    async fn list(&self) -> StorageResult<Vec<Admin>>;
}

/// Read access to end-users, plus the blocked flag.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StorageResult<User>;

    async fn find_by_username(&self, username: &str) -> StorageResult<User>;

    /// Page through users; search matches username or name.
    async fn list(&self, params: &ListParams) -> StorageResult<UserPage>;

    async fn set_blocked(&self, id: i64, blocked: bool) -> StorageResult<()>;
}

/// Moderation records.
#[async_trait]
pub trait BlockedStore: Send + Sync {
    /// Fetch a record together with its user.
    async fn find_by_id(&self, id: i64) -> StorageResult<Blocked>;

    /// Page through records; search matches the reason.
    async fn list(&self, params: &ListParams) -> StorageResult<BlockedPage>;

    async fn create(&self, user_id: i64, reason: &str) -> StorageResult<Blocked>;

    /// Number of records held against a user.
    async fn count_for_user(&self, user_id: i64) -> StorageResult<i64>;

    async fn update_reason(&self, id: i64, reason: &str) -> StorageResult<Blocked>;

    /// Returns `false` when no record was deleted.
    async fn delete(&self, id: i64) -> StorageResult<bool>;
}
