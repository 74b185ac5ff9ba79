// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{AdminProfile, CreateAdminRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/admin/create",
    request_body = CreateAdminRequest,
    tag = "Admins",
    responses(
        (status = 201, body = AdminProfile),
        (status = 400, description = "Missing fields or email already registered", body = ErrorBody)
    )
)]
pub async fn create_admin(
    State(state): State<AppState>,
    payload: Result<Json<CreateAdminRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AdminProfile>), ApiError> {
    let Json(request) = payload?;
    let admin = state.admins.create_admin(request).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

#[utoipa::path(
    get,
    path = "/v1/admin",
    tag = "Admins",
    responses((status = 200, body = [AdminProfile]), (status = 401, body = ErrorBody))
)]
pub async fn list_admins(State(state): State<AppState>) -> Result<Json<Vec<AdminProfile>>, ApiError> {
    Ok(Json(state.admins.list_admins().await?))
}

#[utoipa::path(
    get,
    path = "/v1/admin/{id}",
    params(("id" = i64, Path, description = "Admin id")),
    tag = "Admins",
    responses(
        (status = 200, body = AdminProfile),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_admin(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<AdminProfile>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.admins.get_admin(id).await?))
}

#[utoipa::path(
    patch,
    path = "/v1/admin/{id}/verify",
    params(("id" = i64, Path, description = "Admin id")),
    tag = "Admins",
    responses(
        (status = 200, body = AdminProfile),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn verify_admin(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<AdminProfile>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.admins.verify_admin(id).await?))
}
