// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenManager;
use crate::services::{AdminService, AuthService, BlockedService, UserService};
use crate::storage::{
    AdminStore, BlockedStore, InMemoryStore, PgAdminRepository, PgBlockedRepository,
    PgUserRepository, UserStore,
};

/// Shared, immutable application state. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenManager>,
    pub auth: AuthService,
    pub admins: AdminService,
    pub users: UserService,
    pub blocked: BlockedService,
    /// `None` when running against the in-memory store.
    pub pool: Option<PgPool>,
}

impl AppState {
    fn from_stores(
        tokens: Arc<TokenManager>,
        admins: Arc<dyn AdminStore>,
        users: Arc<dyn UserStore>,
        blocked: Arc<dyn BlockedStore>,
        pool: Option<PgPool>,
    ) -> Self {
        Self {
            auth: AuthService::new(admins.clone(), tokens.clone()),
            admins: AdminService::new(admins),
            users: UserService::new(users.clone()),
            blocked: BlockedService::new(blocked, users),
            tokens,
            pool,
        }
    }

    /// State backed by PostgreSQL repositories.
    pub fn postgres(pool: PgPool, tokens: Arc<TokenManager>) -> Self {
        Self::from_stores(
            tokens,
            Arc::new(PgAdminRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgBlockedRepository::new(pool.clone())),
            Some(pool),
        )
    }

    /// State backed by a single in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>, tokens: Arc<TokenManager>) -> Self {
        Self::from_stores(tokens, store.clone(), store.clone(), store, None)
    }
}
