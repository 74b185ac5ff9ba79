// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # HTTP API
//!
//! Routes are grouped by access:
//!
//! - **public**: login, refresh and admin registration
//! - **protected**: everything else under `/v1`, behind [`require_principal`]
//! - **operational**: health probes and the Swagger UI, outside `/v1`
//!
//! [`authenticate`] runs on every `/v1` request, so a bad `Authorization`
//! header is rejected even on public routes.

use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authenticate, require_principal, TokenPair},
    error::{ErrorBody, ErrorDetail, ErrorKind},
    models::{
        AdminProfile, Blocked, BlockedPage, CreateAdminRequest, CreateBlockedRequest,
        DeleteBlockedResponse, Image, LoginRequest, LoginResponse, PageMeta, RefreshResponse,
        SessionResponse, SortOrder, UpdateBlockedRequest, User, UserPage,
    },
    state::AppState,
};

pub mod admins;
pub mod auth;
pub mod blocked;
pub mod health;
pub mod users;

/// Upper bound on the time spent serving one request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/admin/create", post(admins::create_admin));

    let protected = Router::new()
        .route("/auth/", get(auth::session))
        .route("/admin", get(admins::list_admins))
        .route("/admin/{id}", get(admins::get_admin))
        .route("/admin/{id}/verify", patch(admins::verify_admin))
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        .route(
            "/users/username/{username}",
            get(users::get_user_by_username),
        )
        .route(
            "/blocked",
            get(blocked::list_blocked).post(blocked::create_blocked),
        )
        .route(
            "/blocked/{id}",
            get(blocked::get_blocked)
                .patch(blocked::update_blocked)
                .delete(blocked::delete_blocked),
        )
        .route_layer(middleware::from_fn(require_principal));

    let v1_routes = public
        .merge(protected)
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            authenticate,
        ))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::refresh_token,
        auth::session,
        admins::create_admin,
        admins::list_admins,
        admins::get_admin,
        admins::verify_admin,
        users::list_users,
        users::get_user,
        users::get_user_by_username,
        blocked::list_blocked,
        blocked::create_blocked,
        blocked::get_blocked,
        blocked::update_blocked,
        blocked::delete_blocked,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            AdminProfile,
            CreateAdminRequest,
            LoginRequest,
            LoginResponse,
            RefreshResponse,
            SessionResponse,
            TokenPair,
            User,
            Image,
            UserPage,
            Blocked,
            BlockedPage,
            CreateBlockedRequest,
            UpdateBlockedRequest,
            DeleteBlockedResponse,
            PageMeta,
            SortOrder,
            ErrorBody,
            ErrorDetail,
            ErrorKind,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Auth", description = "Login, token refresh and session"),
        (name = "Admins", description = "Administrator accounts"),
        (name = "Users", description = "End-user lookup"),
        (name = "Blocked", description = "User moderation"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
