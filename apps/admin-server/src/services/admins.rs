// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Administrator accounts.

use std::sync::Arc;

use tracing::info;

use super::storage_error;
use crate::auth::hash_password;
use crate::error::ApiError;
use crate::models::{Admin, AdminProfile, CreateAdminRequest, NewAdmin};
use crate::storage::{AdminStore, StorageError};

#[derive(Clone)]
pub struct AdminService {
    admins: Arc<dyn AdminStore>,
}

impl AdminService {
    pub fn new(admins: Arc<dyn AdminStore>) -> Self {
        Self { admins }
    }

    /// Register a new administrator. Accounts start unverified and cannot
    /// log in until [`AdminService::verify_admin`] runs.
    pub async fn create_admin(&self, request: CreateAdminRequest) -> Result<AdminProfile, ApiError> {
        let email = request.email.trim();
        if email.is_empty() {
            return Err(ApiError::validation("email is required"));
        }
        if request.password.is_empty() {
            return Err(ApiError::validation("password is required"));
        }
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("name is required"));
        }

        match self.admins.find_by_email(email).await {
            Ok(_) => return Err(ApiError::validation("email already exists")),
            Err(StorageError::NotFound(_)) => {}
            Err(err) => return Err(storage_error(err, "admin not found")),
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| ApiError::internal(format!("password not hashed: {e}")))?;

        let admin = self
            .admins
            .insert(NewAdmin {
                email: email.to_string(),
                password_hash,
                name: name.to_string(),
            })
            .await
            .map_err(|err| match err {
                // Lost a race with a concurrent registration.
                StorageError::AlreadyExists(_) => ApiError::validation("email already exists"),
                other => ApiError::internal(format!("admin not inserted: {other}")),
            })?;

        info!(admin_id = admin.id, "Admin created");
        Ok(admin.into())
    }

    /// Full record, including the password hash. Internal use only.
    pub async fn find_by_email(&self, email: &str) -> Result<Admin, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::validation("email is required"));
        }
        self.admins
            .find_by_email(email)
            .await
            .map_err(|err| storage_error(err, "admin not found"))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Admin, ApiError> {
        if id <= 0 {
            return Err(ApiError::validation("id is required"));
        }
        self.admins
            .find_by_id(id)
            .await
            .map_err(|err| storage_error(err, "admin not found"))
    }

    pub async fn get_admin(&self, id: i64) -> Result<AdminProfile, ApiError> {
        self.find_by_id(id).await.map(AdminProfile::from)
    }

    pub async fn list_admins(&self) -> Result<Vec<AdminProfile>, ApiError> {
        let admins = self
            .admins
            .list()
            .await
            .map_err(|err| storage_error(err, "admins not found"))?;
        Ok(admins.into_iter().map(AdminProfile::from).collect())
    }

    /// Mark an administrator as verified. Idempotent.
    pub async fn verify_admin(&self, id: i64) -> Result<AdminProfile, ApiError> {
        let mut admin = self.find_by_id(id).await?;
        if !admin.verified {
            admin.verified = true;
            self.admins
                .update(&admin)
                .await
                .map_err(|err| storage_error(err, "admin not found"))?;
            info!(admin_id = admin.id, "Admin verified");
        }
        Ok(admin.into())
    }
}
