// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Rejections produced by the authentication middleware and the
/// authorization gate. All of them answer 401 with the common error
/// envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Authorization header is not `Bearer <token>` or the token is empty
    #[error("Invalid authentication token")]
    InvalidAuthHeader,
    /// Token failed decryption, kind, expiry or subject checks
    #[error("Invalid authentication token")]
    InvalidToken,
    /// Protected route reached without a resolved principal
    #[error("Authentication required")]
    AuthenticationRequired,
    /// Principal could not be parsed into an admin id
    #[error("invalid user id")]
    InvalidPrincipal,
}

impl AuthError {
    /// Short code used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::AuthenticationRequired => "authentication_required",
            AuthError::InvalidPrincipal => "invalid_principal",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::authentication(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(code = self.error_code(), "Request rejected");
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};

    #[tokio::test]
    async fn every_variant_returns_401_envelope() {
        for err in [
            AuthError::InvalidAuthHeader,
            AuthError::InvalidToken,
            AuthError::AuthenticationRequired,
            AuthError::InvalidPrincipal,
        ] {
            let message = err.to_string();
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
            assert_eq!(body["error"]["type"], "AUTHENTICATION_ERROR");
            assert_eq!(body["error"]["message"], message);
        }
    }

    #[test]
    fn token_failures_share_one_message() {
        assert_eq!(
            AuthError::InvalidAuthHeader.to_string(),
            AuthError::InvalidToken.to_string()
        );
    }
}
