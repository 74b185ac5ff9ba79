// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware and authorization gate.
//!
//! Two stages:
//!
//! 1. [`authenticate`] runs on every API request. It resolves a bearer
//!    token into a [`Principal`] when one is supplied, and lets anonymous
//!    requests through untouched.
//! 2. [`require_principal`] is layered on protected route groups only and
//!    rejects requests that reached it without a principal.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/users", get(list_users))
//!     .route_layer(axum::middleware::from_fn(require_principal));
//!
//! let app = Router::new()
//!     .merge(protected)
//!     .layer(axum::middleware::from_fn_with_state(tokens, authenticate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, Principal, TokenKind, TokenManager};

/// Outcome of reading the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum BearerToken<'a> {
    /// No header, or an empty one
    Absent,
    Present(&'a str),
}

/// Extract the bearer token from request headers.
///
/// The header must be exactly two space-separated parts, the first one
/// literally `Bearer`, and the token part must not be empty.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<BearerToken<'_>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(BearerToken::Absent);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
    if value.is_empty() {
        return Ok(BearerToken::Absent);
    }

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(BearerToken::Present(token)),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

/// Best-effort authentication for every request.
pub async fn authenticate(
    State(tokens): State<Arc<TokenManager>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(BearerToken::Absent) => return next.run(request).await,
        Ok(BearerToken::Present(token)) => token,
        Err(e) => return e.into_response(),
    };

    match tokens.validate_token(token, TokenKind::Access) {
        Ok(subject_id) => {
            request.extensions_mut().insert(Principal::new(subject_id));
            next.run(request).await
        }
        Err(_) => AuthError::InvalidToken.into_response(),
    }
}

/// Authorization gate for protected route groups.
pub async fn require_principal(request: Request, next: Next) -> Response {
    let authenticated = request
        .extensions()
        .get::<Principal>()
        .is_some_and(|principal| !principal.is_empty());

    if !authenticated {
        return AuthError::AuthenticationRequired.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{HeaderValue, StatusCode},
        routing::get,
        Extension, Router,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&HeaderMap::new()), Ok(BearerToken::Absent));
        assert_eq!(bearer_token(&headers("")), Ok(BearerToken::Absent));
        assert_eq!(
            bearer_token(&headers("Bearer abc")),
            Ok(BearerToken::Present("abc"))
        );

        for bad in ["Bearer ", "Bearer", "Token abc", "bearer abc", "Bearer  abc", "Bearer a b"] {
            assert_eq!(
                bearer_token(&headers(bad)),
                Err(AuthError::InvalidAuthHeader),
                "header {bad:?}"
            );
        }
    }

    fn app(tokens: Arc<TokenManager>) -> Router {
        async fn whoami(principal: Option<Extension<Principal>>) -> String {
            principal
                .map(|Extension(p)| p.as_str().to_string())
                .unwrap_or_else(|| "anonymous".to_string())
        }

        let protected = Router::new()
            .route("/protected", get(whoami))
            .route_layer(axum::middleware::from_fn(require_principal));

        Router::new()
            .route("/open", get(whoami))
            .merge(protected)
            .layer(axum::middleware::from_fn_with_state(tokens, authenticate))
    }

    async fn call(app: Router, uri: &str, auth: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn anonymous_request_reaches_open_route() {
        let tokens = Arc::new(TokenManager::new("secret"));
        let (status, body) = call(app(tokens), "/open", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn anonymous_request_is_stopped_by_gate() {
        let tokens = Arc::new(TokenManager::new("secret"));
        let (status, body) = call(app(tokens), "/protected", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Authentication required"));
    }

    #[tokio::test]
    async fn malformed_header_is_rejected_even_on_open_route() {
        let tokens = Arc::new(TokenManager::new("secret"));
        for header in ["Bearer ", "Token abc"] {
            let (status, _) = call(app(tokens.clone()), "/open", Some(header.to_string())).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "header {header:?}");
        }
    }

    #[tokio::test]
    async fn valid_access_token_attaches_principal() {
        let tokens = Arc::new(TokenManager::new("secret"));
        let token = tokens
            .create_token(17, Utc::now() + Duration::minutes(5), TokenKind::Access)
            .unwrap();

        let (status, body) = call(app(tokens), "/protected", Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "17");
    }

    #[tokio::test]
    async fn refresh_token_is_not_accepted_as_bearer() {
        let tokens = Arc::new(TokenManager::new("secret"));
        let token = tokens
            .create_token(17, Utc::now() + Duration::minutes(5), TokenKind::Refresh)
            .unwrap();

        let (status, _) = call(app(tokens), "/protected", Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_principal_does_not_pass_gate() {
        async fn ok() -> &'static str {
            "ok"
        }
        let app = Router::new()
            .route("/protected", get(ok))
            .route_layer(axum::middleware::from_fn(require_principal));

        let mut request = axum::http::Request::builder()
            .uri("/protected")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(Principal::from(String::new()));

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
