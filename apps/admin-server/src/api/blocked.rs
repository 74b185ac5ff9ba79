// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{
        Blocked, BlockedPage, CreateBlockedRequest, DeleteBlockedResponse, PageQuery,
        UpdateBlockedRequest,
    },
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/blocked",
    params(PageQuery),
    tag = "Blocked",
    responses(
        (status = 200, body = BlockedPage),
        (status = 400, description = "Invalid paging", body = ErrorBody),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn list_blocked(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<BlockedPage>, ApiError> {
    let Query(query) = query?;
    Ok(Json(state.blocked.list_blocked(query).await?))
}

#[utoipa::path(
    post,
    path = "/v1/blocked",
    request_body = CreateBlockedRequest,
    tag = "Blocked",
    responses(
        (status = 201, body = Blocked),
        (status = 400, description = "Missing reason", body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, description = "User does not exist", body = ErrorBody)
    )
)]
pub async fn create_blocked(
    State(state): State<AppState>,
    payload: Result<Json<CreateBlockedRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Blocked>), ApiError> {
    let Json(request) = payload?;
    let blocked = state
        .blocked
        .create_blocked(request.user_id, &request.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(blocked)))
}

#[utoipa::path(
    get,
    path = "/v1/blocked/{id}",
    params(("id" = i64, Path, description = "Blocked record id")),
    tag = "Blocked",
    responses(
        (status = 200, body = Blocked),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_blocked(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Blocked>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.blocked.get_blocked(id).await?))
}

#[utoipa::path(
    patch,
    path = "/v1/blocked/{id}",
    params(("id" = i64, Path, description = "Blocked record id")),
    request_body = UpdateBlockedRequest,
    tag = "Blocked",
    responses(
        (status = 200, body = Blocked),
        (status = 400, description = "Missing reason", body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn update_blocked(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateBlockedRequest>, JsonRejection>,
) -> Result<Json<Blocked>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    Ok(Json(state.blocked.update_blocked(id, &request.reason).await?))
}

/// Delete a record and unblock its user. Deleting a missing record is
/// not an error: the response reports `deleted: false`.
#[utoipa::path(
    delete,
    path = "/v1/blocked/{id}",
    params(("id" = i64, Path, description = "Blocked record id")),
    tag = "Blocked",
    responses(
        (status = 200, body = DeleteBlockedResponse),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn delete_blocked(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteBlockedResponse>, ApiError> {
    let Path(id) = id?;
    let deleted = state.blocked.delete_blocked(id).await?;
    Ok(Json(DeleteBlockedResponse { deleted }))
}
