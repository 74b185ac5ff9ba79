// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, token refresh and session lookup.

use std::sync::Arc;

use tracing::{debug, info};

use super::storage_error;
use crate::auth::{verify_password, TokenKind, TokenManager, TokenPair};
use crate::error::ApiError;
use crate::models::AdminProfile;
use crate::storage::AdminStore;

#[derive(Clone)]
pub struct AuthService {
    admins: Arc<dyn AdminStore>,
    tokens: Arc<TokenManager>,
}

impl AuthService {
    pub fn new(admins: Arc<dyn AdminStore>, tokens: Arc<TokenManager>) -> Self {
        Self { admins, tokens }
    }

    /// Check credentials and issue a fresh token pair.
    ///
    /// The email is trimmed as at registration. Empty fields are rejected
    /// before the store is consulted. Unverified accounts cannot log in even
    /// with the right password.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(TokenPair, AdminProfile), ApiError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::validation("email and password are required"));
        }

        let admin = self
            .admins
            .find_by_email(email)
            .await
            .map_err(|err| storage_error(err, "admin not found"))?;

        if !admin.verified {
            return Err(ApiError::validation("admin is not verified"));
        }

        if let Err(reason) = verify_password(password, &admin.password_hash) {
            debug!(admin_id = admin.id, %reason, "Login rejected");
            return Err(ApiError::validation("password is incorrect"));
        }

        let tokens = self.issue(admin.id)?;
        info!(admin_id = admin.id, "Admin logged in");
        Ok((tokens, admin.into()))
    }

    /// Exchange a refresh token for a new pair for the same subject.
    ///
    /// The presented refresh token is not revoked.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let subject_id = self
            .tokens
            .validate_token(refresh_token, TokenKind::Refresh)
            .map_err(|_| ApiError::authentication("invalid refresh token"))?;

        self.issue(subject_id)
    }

    /// Profile of the administrator behind an authenticated request.
    pub async fn get_session(&self, subject_id: i64) -> Result<AdminProfile, ApiError> {
        self.admins
            .find_by_id(subject_id)
            .await
            .map(AdminProfile::from)
            .map_err(|err| storage_error(err, "admin not found"))
    }

    fn issue(&self, subject_id: i64) -> Result<TokenPair, ApiError> {
        self.tokens
            .issue_pair(subject_id)
            .map_err(|e| ApiError::internal(format!("failed to generate tokens: {e}")))
    }
}
