// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin API Server - administrative REST backend
//!
//! Administrators log in with email and password and receive encrypted,
//! short-lived bearer tokens. Authenticated administrators can look up
//! end-users and manage blocked-user records.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token codec, token manager, middleware and password hashing
//! - `services` - Login, admin, user and moderation business rules
//! - `storage` - PostgreSQL repositories and the in-memory store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
