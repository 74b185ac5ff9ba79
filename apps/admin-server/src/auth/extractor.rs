// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated principal.
//!
//! Use the `Auth` extractor in handlers behind the authorization gate:
//!
//! ```rust,ignore
//! async fn session(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal was attached by the authentication middleware
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Principal};

/// Extractor for the principal attached by the authentication middleware.
///
/// Rejects with 401 when the request carries no principal.
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .filter(|principal| !principal.is_empty())
            .cloned()
            .map(Auth)
            .ok_or(AuthError::AuthenticationRequired)
    }
}

impl Auth {
    /// Administrator id carried by the principal.
    pub fn admin_id(&self) -> Result<i64, AuthError> {
        self.0.admin_id().ok_or(AuthError::InvalidPrincipal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn auth_extractor_requires_principal() {
        let mut parts = parts();
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::AuthenticationRequired)));
    }

    #[tokio::test]
    async fn auth_extractor_reads_extensions() {
        let mut parts = parts();
        parts.extensions.insert(Principal::new(31));

        let auth = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth.0.as_str(), "31");
        assert_eq!(auth.admin_id(), Ok(31));
    }

    #[tokio::test]
    async fn unparsable_principal_is_rejected() {
        let mut parts = parts();
        parts.extensions.insert(Principal::from("admin".to_string()));

        let auth = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(auth.admin_id(), Err(AuthError::InvalidPrincipal));
    }
}
