// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{PageQuery, User, UserPage},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/users",
    params(PageQuery),
    tag = "Users",
    responses(
        (status = 200, body = UserPage),
        (status = 400, description = "Invalid paging", body = ErrorBody),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<UserPage>, ApiError> {
    let Query(query) = query?;
    Ok(Json(state.users.list_users(query).await?))
}

#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    tag = "Users",
    responses(
        (status = 200, body = User),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.users.get_user_by_id(id).await?))
}

#[utoipa::path(
    get,
    path = "/v1/users/username/{username}",
    params(("username" = String, Path, description = "Exact username")),
    tag = "Users",
    responses(
        (status = 200, body = User),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    username: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let Path(username) = username?;
    Ok(Json(state.users.get_user_by_username(&username).await?))
}
