// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Services
//!
//! Business rules between the HTTP handlers and the stores. Services take
//! and return domain types, and translate every lower-level failure
//! (storage, password, token) into an [`ApiError`] before it reaches the
//! transport layer.

use crate::error::ApiError;
use crate::storage::StorageError;

pub mod admins;
pub mod auth;
pub mod blocked;
pub mod users;

pub use admins::AdminService;
pub use auth::AuthService;
pub use blocked::BlockedService;
pub use users::UserService;

/// Translate a storage failure. `NotFound` becomes a 404 with `not_found`
/// as its message; everything else is an internal error.
pub(crate) fn storage_error(err: StorageError, not_found: &str) -> ApiError {
    match err {
        StorageError::NotFound(_) => ApiError::not_found(not_found),
        other => ApiError::internal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::time::Duration;

    #[test]
    fn storage_errors_map_to_api_kinds() {
        let err = storage_error(StorageError::NotFound("User 4".into()), "user not found");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "user not found");

        let err = storage_error(StorageError::Timeout(Duration::from_secs(5)), "user not found");
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
