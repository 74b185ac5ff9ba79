// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and validation.
//!
//! Tokens are stateless: nothing is stored server-side, so a token stays
//! valid until its natural expiry. Rotating a refresh token does not revoke
//! the previous one.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::claims::{build_claims, check_claims, TokenKind};
use super::codec::{CodecError, TokenCodec};

/// Access token lifetime (60 minutes).
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 60;

/// Refresh token lifetime (7 days).
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Returned for every validation failure, whatever the cause.
    #[error("invalid token")]
    InvalidToken,

    #[error("failed to create token: {0}")]
    Creation(String),
}

/// Access/refresh token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expiry: DateTime<Utc>,
    pub refresh_token_expiry: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenManager {
    codec: TokenCodec,
}

impl TokenManager {
    pub fn new(secret: &str) -> Self {
        Self {
            codec: TokenCodec::new(secret),
        }
    }

    pub fn create_token(
        &self,
        subject_id: i64,
        expires_at: DateTime<Utc>,
        kind: TokenKind,
    ) -> Result<String, TokenError> {
        let claims = build_claims(subject_id, expires_at, kind);
        self.codec.encrypt(&claims).map_err(|e| match e {
            CodecError::Encryption(msg) => TokenError::Creation(msg),
            CodecError::InvalidToken => TokenError::Creation(e.to_string()),
        })
    }

    /// Validate a token against the expected kind and return its subject id.
    pub fn validate_token(&self, token: &str, expected: TokenKind) -> Result<i64, TokenError> {
        self.validate_token_at(token, expected, Utc::now())
    }

    /// Validate a token as of `now`.
    pub fn validate_token_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<i64, TokenError> {
        let claims = self.codec.decrypt(token).map_err(|_| {
            tracing::debug!(kind = %expected, "Token rejected: decryption failed");
            TokenError::InvalidToken
        })?;

        check_claims(&claims, expected, now).map_err(|reason| {
            tracing::debug!(kind = %expected, ?reason, "Token rejected");
            TokenError::InvalidToken
        })
    }

    /// Issue a fresh access/refresh pair for a subject.
    pub fn issue_pair(&self, subject_id: i64) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        let access_token_expiry = now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES);
        let refresh_token_expiry = now + Duration::days(REFRESH_TOKEN_TTL_DAYS);

        Ok(TokenPair {
            access_token: self.create_token(subject_id, access_token_expiry, TokenKind::Access)?,
            refresh_token: self.create_token(
                subject_id,
                refresh_token_expiry,
                TokenKind::Refresh,
            )?,
            access_token_expiry,
            refresh_token_expiry,
        })
    }
}
