// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};

use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{LoginRequest, LoginResponse, RefreshResponse, SessionResponse},
    state::AppState,
};

/// Header carrying the refresh token on `POST /v1/auth/refresh-token`.
pub const REFRESH_TOKEN_HEADER: &str = "Refresh-Token-X";

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, body = LoginResponse),
        (status = 400, description = "Missing fields, unverified account or wrong password", body = ErrorBody),
        (status = 404, description = "No admin with this email", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let (tokens, admin) = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(LoginResponse { tokens, admin }))
}

#[utoipa::path(
    post,
    path = "/v1/auth/refresh-token",
    params(
        ("Refresh-Token-X" = String, Header, description = "Refresh token issued at login")
    ),
    tag = "Auth",
    responses(
        (status = 200, body = RefreshResponse),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, ApiError> {
    let token = headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::authentication("refresh token is required"))?;

    let tokens = state.auth.refresh(token)?;
    Ok(Json(RefreshResponse { tokens }))
}

#[utoipa::path(
    get,
    path = "/v1/auth/",
    tag = "Auth",
    responses(
        (status = 200, body = SessionResponse),
        (status = 401, body = ErrorBody),
        (status = 404, description = "Admin no longer exists", body = ErrorBody)
    )
)]
pub async fn session(
    State(state): State<AppState>,
    auth: Auth,
) -> Result<Json<SessionResponse>, ApiError> {
    let admin = state.auth.get_session(auth.admin_id()?).await?;
    Ok(Json(SessionResponse { admin }))
}
