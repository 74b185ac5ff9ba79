// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Records read from the database and the request/response types used by
//! the REST API.
//!
//! ## Model Categories
//!
//! - **Admins**: dashboard operators; the only principals that can log in
//! - **Users**: end-users of the product, read only from this service
//! - **Blocked**: moderation records that block a user, with a reason
//! - **Pagination**: list query parameters and page metadata

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::auth::TokenPair;
use crate::error::ApiError;

// =============================================================================
// Admin Models
// =============================================================================

/// Administrator record as stored, including the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i64,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub name: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Administrator as exposed by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct AdminProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Admin> for AdminProfile {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            name: admin.name,
            verified: admin.verified,
            created_at: admin.created_at,
        }
    }
}

/// Values needed to insert an administrator. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Request body for `POST /v1/admin/create`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAdminRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request body for `POST /v1/auth/login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub tokens: TokenPair,
    pub admin: AdminProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub admin: AdminProfile,
}

// =============================================================================
// User Models
// =============================================================================

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct Image {
    pub id: i64,
    pub user_id: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// End-user profile.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub birthday: Option<NaiveDate>,
    pub aws_cognito_id: String,
    pub created_at: DateTime<Utc>,
    pub verified: bool,
    pub is_private: bool,
    pub inbox_locked: bool,
    pub swiper_mode: bool,
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_flag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_iso_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_id: Option<i64>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<Image>,
}

// =============================================================================
// Blocked Models
// =============================================================================

/// A moderation record blocking a user.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct Blocked {
    pub id: i64,
    pub user_id: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    /// The blocked user, when loaded.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Request body for `POST /v1/blocked`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBlockedRequest {
    pub user_id: i64,
    #[serde(default)]
    pub reason: String,
}

/// Request body for `PATCH /v1/blocked/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateBlockedRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteBlockedResponse {
    pub deleted: bool,
}

// =============================================================================
// Pagination
// =============================================================================

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw list query parameters as sent by the dashboard.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Items per page (default 10, at most 100).
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    /// Sort column; unknown columns fall back to `id`.
    pub sort: Option<String>,
    /// `asc` or `desc` (default `asc`); anything else sorts descending.
    pub order: Option<String>,
    /// Case-insensitive search term.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Validated list parameters handed to the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: i64,
    pub page_size: i64,
    /// Always one of the columns allowed for the listed entity.
    pub sort: &'static str,
    pub order: SortOrder,
    /// Lowercased search term, `None` when empty.
    pub search: Option<String>,
}

impl PageQuery {
    /// Validate the query against the sortable columns of an entity.
    ///
    /// The first entry of `sortable` is the fallback column.
    pub fn validate(self, sortable: &[&'static str]) -> Result<ListParams, ApiError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::validation("invalid page"));
        }

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ApiError::validation("invalid limit"));
        }
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(ApiError::validation("invalid page"));
        }

        let requested = self.sort.as_deref().unwrap_or("id");
        let sort = sortable
            .iter()
            .copied()
            .find(|column| *column == requested)
            .or_else(|| sortable.first().copied())
            .unwrap_or("id");

        let order = match self.order.as_deref().unwrap_or("asc") {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        let search = self
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Ok(ListParams {
            page,
            page_size,
            sort,
            order,
            search,
        })
    }
}

impl ListParams {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// SQL `LIKE` pattern for the search term.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| format!("%{s}%"))
    }
}

/// Page metadata shared by all list responses.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct PageMeta {
    pub total: i64,
    pub has_more: bool,
    pub total_pages: i64,
    pub page: i64,
    pub sort: String,
    pub order: SortOrder,
}

impl PageMeta {
    pub fn new(total: i64, params: &ListParams) -> Self {
        let total_pages = (total + params.page_size - 1) / params.page_size;
        Self {
            total,
            has_more: params.page < total_pages,
            total_pages,
            page: params.page,
            sort: params.sort.to_string(),
            order: params.order,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserPage {
    pub users: Vec<User>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BlockedPage {
    pub blockeds: Vec<Blocked>,
    #[serde(flatten)]
    pub meta: PageMeta,
}
