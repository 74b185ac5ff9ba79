// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PostgreSQL repositories.
//!
//! Each repository owns a clone of the connection pool and implements one
//! of the store traits from the parent module.

pub mod admins;
pub mod blocked;
pub mod users;

pub use admins::PgAdminRepository;
pub use blocked::PgBlockedRepository;
pub use users::PgUserRepository;
