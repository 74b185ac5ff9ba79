// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Moderation: blocking and unblocking users.
//!
//! A blocked record and the user's `blocked` flag move together. A user
//! holds at most one record through this service. Creating it sets the flag
//! and the flag is cleared once no record for the user remains.

use std::sync::Arc;

use tracing::{info, warn};

use super::storage_error;
use crate::error::ApiError;
use crate::models::{Blocked, BlockedPage, PageQuery};
use crate::storage::{BlockedStore, StorageError, UserStore, BLOCKED_SORT_COLUMNS};

#[derive(Clone)]
pub struct BlockedService {
    blockeds: Arc<dyn BlockedStore>,
    users: Arc<dyn UserStore>,
}

fn require_reason(reason: &str) -> Result<&str, ApiError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ApiError::validation("reason is required"));
    }
    Ok(reason)
}

fn require_id(id: i64) -> Result<i64, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation("invalid id"));
    }
    Ok(id)
}

impl BlockedService {
    pub fn new(blockeds: Arc<dyn BlockedStore>, users: Arc<dyn UserStore>) -> Self {
        Self { blockeds, users }
    }

    pub async fn list_blocked(&self, query: PageQuery) -> Result<BlockedPage, ApiError> {
        let params = query.validate(BLOCKED_SORT_COLUMNS)?;
        self.blockeds
            .list(&params)
            .await
            .map_err(|err| storage_error(err, "blocked records not found"))
    }

    pub async fn get_blocked(&self, id: i64) -> Result<Blocked, ApiError> {
        self.blockeds
            .find_by_id(require_id(id)?)
            .await
            .map_err(|err| storage_error(err, "blocked not found"))
    }

    /// Block a user. The user must exist and hold no record yet.
    pub async fn create_blocked(&self, user_id: i64, reason: &str) -> Result<Blocked, ApiError> {
        let reason = require_reason(reason)?;
        let user_id = require_id(user_id)?;

        self.users
            .find_by_id(user_id)
            .await
            .map_err(|err| storage_error(err, "user not found"))?;

        let existing = self
            .blockeds
            .count_for_user(user_id)
            .await
            .map_err(|err| storage_error(err, "user not found"))?;
        if existing > 0 {
            return Err(ApiError::validation("user already blocked"));
        }

        let blocked = self
            .blockeds
            .create(user_id, reason)
            .await
            .map_err(|err| storage_error(err, "user not found"))?;

        if let Err(err) = self.users.set_blocked(user_id, true).await {
            // Roll the record back so it never exists without the flag.
            if let Err(cleanup) = self.blockeds.delete(blocked.id).await {
                warn!(
                    blocked_id = blocked.id,
                    error = %cleanup,
                    "Failed to remove orphaned blocked record"
                );
            }
            return Err(storage_error(err, "user not found"));
        }

        info!(blocked_id = blocked.id, user_id, "User blocked");
        // Reload so the embedded user reflects the new flag.
        self.get_blocked(blocked.id).await
    }

    pub async fn update_blocked(&self, id: i64, reason: &str) -> Result<Blocked, ApiError> {
        let reason = require_reason(reason)?;
        self.blockeds
            .update_reason(require_id(id)?, reason)
            .await
            .map_err(|err| storage_error(err, "blocked not found"))
    }

    /// Remove a record. The user is unblocked once no record for them
    /// remains. Returns `false` when the record did not exist.
    pub async fn delete_blocked(&self, id: i64) -> Result<bool, ApiError> {
        let blocked = match self.blockeds.find_by_id(require_id(id)?).await {
            Ok(blocked) => blocked,
            Err(StorageError::NotFound(_)) => return Ok(false),
            Err(err) => return Err(storage_error(err, "blocked not found")),
        };

        let deleted = self
            .blockeds
            .delete(blocked.id)
            .await
            .map_err(|err| storage_error(err, "blocked not found"))?;
        if !deleted {
            return Ok(false);
        }

        let remaining = self
            .blockeds
            .count_for_user(blocked.user_id)
            .await
            .map_err(|err| storage_error(err, "blocked not found"))?;
        if remaining > 0 {
            info!(
                blocked_id = blocked.id,
                user_id = blocked.user_id,
                remaining,
                "Blocked record removed, user stays blocked"
            );
            return Ok(true);
        }

        match self.users.set_blocked(blocked.user_id, false).await {
            Ok(()) => {}
            Err(StorageError::NotFound(_)) => {
                warn!(user_id = blocked.user_id, "Blocked record referenced a missing user");
            }
            Err(err) => return Err(storage_error(err, "user not found")),
        }
        info!(blocked_id = blocked.id, user_id = blocked.user_id, "User unblocked");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::ErrorKind;
    use crate::models::{ListParams, User, UserPage};
    use crate::storage::memory::test_user;
    use crate::storage::{InMemoryStore, StorageResult};

    async fn service() -> (BlockedService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        store.insert_user(test_user(10, "spammer")).await;
        store.insert_user(test_user(11, "troll")).await;
        (BlockedService::new(store.clone(), store.clone()), store)
    }

    async fn is_blocked(store: &InMemoryStore, id: i64) -> bool {
        UserStore::find_by_id(store, id).await.unwrap().blocked
    }

    #[tokio::test]
    async fn create_blocks_the_user() {
        let (service, store) = service().await;
        let blocked = service.create_blocked(10, "  spam  ").await.unwrap();
        assert_eq!(blocked.reason, "spam");
        assert_eq!(blocked.user.as_ref().map(|u| u.blocked), Some(true));
        assert!(is_blocked(&store, 10).await);
        assert!(!is_blocked(&store, 11).await);
    }

    #[tokio::test]
    async fn create_validates_input() {
        let (service, _) = service().await;
        let err = service.create_blocked(10, " ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = service.create_blocked(404, "spam").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "user not found");
    }

    #[tokio::test]
    async fn update_changes_reason() {
        let (service, _) = service().await;
        let blocked = service.create_blocked(11, "spam").await.unwrap();
        let updated = service.update_blocked(blocked.id, "abuse").await.unwrap();
        assert_eq!(updated.reason, "abuse");

        assert_eq!(
            service.update_blocked(blocked.id, "").await.unwrap_err().kind,
            ErrorKind::Validation
        );
        assert_eq!(
            service.update_blocked(999, "abuse").await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn delete_unblocks_the_records_user() {
        let (service, store) = service().await;
        // Make record ids and user ids diverge.
        service.create_blocked(11, "first").await.unwrap();
        let blocked = service.create_blocked(10, "second").await.unwrap();
        assert_ne!(blocked.id, blocked.user_id);

        assert!(service.delete_blocked(blocked.id).await.unwrap());
        assert!(!is_blocked(&store, 10).await);
        assert!(is_blocked(&store, 11).await);

        assert!(!service.delete_blocked(blocked.id).await.unwrap());
        assert_eq!(
            service.get_blocked(blocked.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn user_cannot_be_blocked_twice() {
        let (service, store) = service().await;
        service.create_blocked(10, "spam").await.unwrap();

        let err = service.create_blocked(10, "more spam").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "user already blocked");
        assert_eq!(store.count_for_user(10).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn flag_stays_while_other_records_remain() {
        let (service, store) = service().await;
        let first = service.create_blocked(10, "spam").await.unwrap();
        // A second record written straight to the store, as older data may hold.
        let second = store.create(10, "more spam").await.unwrap();

        assert!(service.delete_blocked(first.id).await.unwrap());
        assert!(is_blocked(&store, 10).await);

        assert!(service.delete_blocked(second.id).await.unwrap());
        assert!(!is_blocked(&store, 10).await);
    }

    /// User store whose flag updates always time out.
    struct StuckFlags(Arc<InMemoryStore>);

    #[async_trait]
    impl UserStore for StuckFlags {
        async fn find_by_id(&self, id: i64) -> StorageResult<User> {
            UserStore::find_by_id(self.0.as_ref(), id).await
        }

        async fn find_by_username(&self, username: &str) -> StorageResult<User> {
            self.0.find_by_username(username).await
        }

        async fn list(&self, params: &ListParams) -> StorageResult<UserPage> {
            UserStore::list(self.0.as_ref(), params).await
        }

        async fn set_blocked(&self, _id: i64, _blocked: bool) -> StorageResult<()> {
            Err(StorageError::Timeout(Duration::from_secs(5)))
        }
    }

    #[tokio::test]
    async fn failed_flag_update_removes_the_record() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_user(test_user(10, "spammer")).await;
        let service = BlockedService::new(store.clone(), Arc::new(StuckFlags(store.clone())));

        let err = service.create_blocked(10, "spam").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(store.count_for_user(10).await.unwrap(), 0);
        assert!(!is_blocked(&store, 10).await);
    }

    #[tokio::test]
    async fn list_searches_reason() {
        let (service, _) = service().await;
        service.create_blocked(10, "Spam links").await.unwrap();
        service.create_blocked(11, "Harassment").await.unwrap();

        let page = service
            .list_blocked(PageQuery {
                search: Some("SPAM".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.blockeds[0].user_id, 10);
    }
}
