// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only access to end-users.

use std::sync::Arc;

use super::storage_error;
use crate::error::ApiError;
use crate::models::{PageQuery, User, UserPage};
use crate::storage::{UserStore, USER_SORT_COLUMNS};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<User, ApiError> {
        if id <= 0 {
            return Err(ApiError::validation("invalid user id"));
        }
        self.users
            .find_by_id(id)
            .await
            .map_err(|err| storage_error(err, "user not found"))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User, ApiError> {
        if username.trim().is_empty() {
            return Err(ApiError::validation("username is required"));
        }
        self.users
            .find_by_username(username)
            .await
            .map_err(|err| storage_error(err, "user not found"))
    }

    pub async fn list_users(&self, query: PageQuery) -> Result<UserPage, ApiError> {
        let params = query.validate(USER_SORT_COLUMNS)?;
        self.users
            .list(&params)
            .await
            .map_err(|err| storage_error(err, "users not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::SortOrder;
    use crate::storage::memory::test_user;
    use crate::storage::InMemoryStore;

    async fn service() -> UserService {
        let store = InMemoryStore::new();
        for (id, name) in [(1, "zoe"), (2, "adam"), (3, "mia")] {
            store.insert_user(test_user(id, name)).await;
        }
        UserService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn lookups() {
        let service = service().await;
        assert_eq!(service.get_user_by_id(2).await.unwrap().username, "adam");
        assert_eq!(service.get_user_by_username("mia").await.unwrap().id, 3);

        assert_eq!(service.get_user_by_id(0).await.unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(service.get_user_by_id(9).await.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(
            service.get_user_by_username("").await.unwrap_err().kind,
            ErrorKind::Validation
        );
    }

    #[tokio::test]
    async fn list_applies_defaults_and_sorting() {
        let service = service().await;

        let page = service.list_users(PageQuery::default()).await.unwrap();
        assert_eq!(page.meta.total, 3);
        assert_eq!(page.meta.sort, "id");
        assert_eq!(page.meta.order, SortOrder::Asc);

        let page = service
            .list_users(PageQuery {
                sort: Some("username".into()),
                order: Some("desc".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = page.users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["zoe", "mia", "adam"]);
    }

    #[tokio::test]
    async fn list_rejects_bad_paging() {
        let service = service().await;
        let err = service
            .list_users(PageQuery {
                page_size: Some(500),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
