// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for development mode and tests.
//!
//! Implements every store trait over plain maps guarded by a single
//! [`RwLock`]. Ids are assigned sequentially per table, starting at 1.
//! Nothing is persisted across restarts.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AdminStore, BlockedStore, StorageError, StorageResult, UserStore};
use crate::models::{
    Admin, Blocked, BlockedPage, Image, ListParams, NewAdmin, PageMeta, SortOrder, User, UserPage,
};

#[derive(Default)]
struct Tables {
    admins: BTreeMap<i64, Admin>,
    users: BTreeMap<i64, User>,
    images: BTreeMap<i64, Image>,
    blockeds: BTreeMap<i64, Blocked>,
    next_admin_id: i64,
    next_blocked_id: i64,
}

impl Tables {
    fn user_with_image(&self, user: &User) -> User {
        let mut user = user.clone();
        user.profile_image = user
            .profile_image_id
            .and_then(|id| self.images.get(&id).cloned());
        user
    }

    fn blocked_with_user(&self, blocked: &Blocked) -> Blocked {
        let mut blocked = blocked.clone();
        blocked.user = self
            .users
            .get(&blocked.user_id)
            .map(|user| self.user_with_image(user));
        blocked
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an administrator with the given verification state.
    pub async fn seed_admin(&self, admin: NewAdmin, verified: bool) -> StorageResult<Admin> {
        let mut created = self.insert(admin).await?;
        if verified {
            created.verified = true;
            self.update(&created).await?;
        }
        Ok(created)
    }

    /// Insert or replace a user. Users are owned by another service, so the
    /// caller picks the id.
    pub async fn insert_user(&self, user: User) -> User {
        let mut tables = self.tables.write().await;
        tables.users.insert(user.id, user.clone());
        user
    }

    pub async fn insert_image(&self, image: Image) -> Image {
        let mut tables = self.tables.write().await;
        tables.images.insert(image.id, image.clone());
        image
    }
}

fn paginate<T: Clone>(rows: Vec<T>, params: &ListParams) -> (i64, Vec<T>) {
    let total = rows.len() as i64;
    let page = rows
        .into_iter()
        .skip(params.offset().max(0) as usize)
        .take(params.page_size.max(0) as usize)
        .collect();
    (total, page)
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

fn user_matches(user: &User, term: &str) -> bool {
    user.username.to_lowercase().contains(term)
        || user
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(term))
}

#[async_trait]
impl AdminStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> StorageResult<Admin> {
        let tables = self.tables.read().await;
        tables
            .admins
            .values()
            .find(|admin| admin.email == email)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Admin {email}")))
    }

    async fn find_by_id(&self, id: i64) -> StorageResult<Admin> {
        let tables = self.tables.read().await;
        tables
            .admins
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Admin {id}")))
    }

    async fn insert(&self, admin: NewAdmin) -> StorageResult<Admin> {
        let mut tables = self.tables.write().await;
        if tables.admins.values().any(|a| a.email == admin.email) {
            return Err(StorageError::AlreadyExists(format!("Admin {}", admin.email)));
        }

        tables.next_admin_id += 1;
        let created = Admin {
            id: tables.next_admin_id,
            email: admin.email,
            password_hash: admin.password_hash,
            name: admin.name,
            verified: false,
            created_at: Utc::now(),
        };
        tables.admins.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, admin: &Admin) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        match tables.admins.get_mut(&admin.id) {
            Some(stored) => {
                *stored = admin.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("Admin {}", admin.id))),
        }
    }

    async fn list(&self) -> StorageResult<Vec<Admin>> {
        let tables = self.tables.read().await;
        Ok(tables.admins.values().cloned().collect())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> StorageResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&id)
            .map(|user| tables.user_with_image(user))
            .ok_or_else(|| StorageError::NotFound(format!("User {id}")))
    }

    async fn find_by_username(&self, username: &str) -> StorageResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|user| user.username == username)
            .map(|user| tables.user_with_image(user))
            .ok_or_else(|| StorageError::NotFound(format!("User {username}")))
    }

    async fn list(&self, params: &ListParams) -> StorageResult<UserPage> {
        let tables = self.tables.read().await;
        let mut rows: Vec<User> = tables
            .users
            .values()
            .filter(|user| params.search.as_deref().is_none_or(|term| user_matches(user, term)))
            .map(|user| tables.user_with_image(user))
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match params.sort {
                "username" => a.username.cmp(&b.username),
                "created_at" => a.created_at.cmp(&b.created_at),
                _ => a.id.cmp(&b.id),
            };
            directed(ordering, params.order)
        });

        let (total, users) = paginate(rows, params);
        Ok(UserPage {
            users,
            meta: PageMeta::new(total, params),
        })
    }

    async fn set_blocked(&self, id: i64, blocked: bool) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.blocked = blocked;
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("User {id}"))),
        }
    }
}

#[async_trait]
impl BlockedStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> StorageResult<Blocked> {
        let tables = self.tables.read().await;
        tables
            .blockeds
            .get(&id)
            .map(|blocked| tables.blocked_with_user(blocked))
            .ok_or_else(|| StorageError::NotFound(format!("Blocked {id}")))
    }

    async fn list(&self, params: &ListParams) -> StorageResult<BlockedPage> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Blocked> = tables
            .blockeds
            .values()
            .filter(|blocked| {
                params
                    .search
                    .as_deref()
                    .is_none_or(|term| blocked.reason.to_lowercase().contains(term))
            })
            .map(|blocked| tables.blocked_with_user(blocked))
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match params.sort {
                "user_id" => a.user_id.cmp(&b.user_id),
                "created_at" => a.created_at.cmp(&b.created_at),
                _ => a.id.cmp(&b.id),
            };
            directed(ordering, params.order)
        });

        let (total, blockeds) = paginate(rows, params);
        Ok(BlockedPage {
            blockeds,
            meta: PageMeta::new(total, params),
        })
    }

    async fn create(&self, user_id: i64, reason: &str) -> StorageResult<Blocked> {
        let mut tables = self.tables.write().await;
        tables.next_blocked_id += 1;
        let blocked = Blocked {
            id: tables.next_blocked_id,
            user_id,
            reason: reason.to_string(),
            created_at: Utc::now(),
            user: None,
        };
        tables.blockeds.insert(blocked.id, blocked.clone());
        Ok(tables.blocked_with_user(&blocked))
    }

    async fn count_for_user(&self, user_id: i64) -> StorageResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .blockeds
            .values()
            .filter(|blocked| blocked.user_id == user_id)
            .count() as i64)
    }

    async fn update_reason(&self, id: i64, reason: &str) -> StorageResult<Blocked> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.blockeds.get_mut(&id) else {
            return Err(StorageError::NotFound(format!("Blocked {id}")));
        };
        stored.reason = reason.to_string();
        let updated = stored.clone();
        Ok(tables.blocked_with_user(&updated))
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.blockeds.remove(&id).is_some())
    }
}

/// A minimal user for tests.
#[cfg(test)]
pub(crate) fn test_user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        birthday: None,
        aws_cognito_id: format!("cognito-{id}"),
        created_at: Utc::now(),
        verified: true,
        is_private: false,
        inbox_locked: false,
        swiper_mode: false,
        blocked: false,
        name: None,
        gender: None,
        country_name: None,
        country_flag: None,
        country_iso_code: None,
        country_lat: None,
        country_lng: None,
        city_name: None,
        city_lat: None,
        city_lng: None,
        bio: None,
        profile_image_id: None,
        profile_image: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageQuery;
    use crate::storage::{BLOCKED_SORT_COLUMNS, USER_SORT_COLUMNS};

    fn new_admin(email: &str) -> NewAdmin {
        NewAdmin {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "Admin".to_string(),
        }
    }

    #[tokio::test]
    async fn admins_get_sequential_ids_and_unique_emails() {
        let store = InMemoryStore::new();
        let first = store.insert(new_admin("a@example.com")).await.unwrap();
        let second = store.insert(new_admin("b@example.com")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert!(!first.verified);

        let dup = store.insert(new_admin("a@example.com")).await;
        assert!(matches!(dup, Err(StorageError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn seed_admin_can_verify() {
        let store = InMemoryStore::new();
        let admin = store
            .seed_admin(new_admin("root@example.com"), true)
            .await
            .unwrap();
        let stored = AdminStore::find_by_email(&store, "root@example.com")
            .await
            .unwrap();
        assert_eq!(stored.id, admin.id);
        assert!(stored.verified);
    }

    #[tokio::test]
    async fn user_lookup_attaches_profile_image() {
        let store = InMemoryStore::new();
        let mut user = test_user(7, "alice");
        user.profile_image_id = Some(3);
        store.insert_user(user).await;
        store
            .insert_image(Image {
                id: 3,
                user_id: 7,
                url: "https://cdn.example.com/3.png".into(),
                created_at: Utc::now(),
            })
            .await;

        let found = UserStore::find_by_username(&store, "alice").await.unwrap();
        assert_eq!(found.profile_image.map(|i| i.id), Some(3));

        let missing = UserStore::find_by_id(&store, 99).await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn user_list_searches_sorts_and_pages() {
        let store = InMemoryStore::new();
        for (id, name) in [(1, "carol"), (2, "alice"), (3, "bob"), (4, "alicia")] {
            store.insert_user(test_user(id, name)).await;
        }

        let params = PageQuery {
            sort: Some("username".into()),
            search: Some("ALI".into()),
            ..Default::default()
        }
        .validate(USER_SORT_COLUMNS)
        .unwrap();
        let page = UserStore::list(&store, &params).await.unwrap();
        let names: Vec<_> = page.users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["alice", "alicia"]);
        assert_eq!(page.meta.total, 2);

        let params = PageQuery {
            page: Some(2),
            page_size: Some(3),
            order: Some("desc".into()),
            ..Default::default()
        }
        .validate(USER_SORT_COLUMNS)
        .unwrap();
        let page = UserStore::list(&store, &params).await.unwrap();
        assert_eq!(page.users.len(), 1);
        assert_eq!(page.users[0].id, 1);
        assert_eq!(page.meta.total_pages, 2);
        assert!(!page.meta.has_more);
    }

    #[tokio::test]
    async fn blocked_records_carry_their_user() {
        let store = InMemoryStore::new();
        store.insert_user(test_user(5, "mallory")).await;

        let blocked = store.create(5, "Spam links").await.unwrap();
        assert_eq!(blocked.user.as_ref().map(|u| u.id), Some(5));
        assert_eq!(store.count_for_user(5).await.unwrap(), 1);
        assert_eq!(store.count_for_user(6).await.unwrap(), 0);

        let updated = store.update_reason(blocked.id, "Harassment").await.unwrap();
        assert_eq!(updated.reason, "Harassment");

        let params = PageQuery {
            search: Some("harass".into()),
            ..Default::default()
        }
        .validate(BLOCKED_SORT_COLUMNS)
        .unwrap();
        let page = BlockedStore::list(&store, &params).await.unwrap();
        assert_eq!(page.blockeds.len(), 1);

        assert!(store.delete(blocked.id).await.unwrap());
        assert!(!store.delete(blocked.id).await.unwrap());
        assert!(matches!(
            BlockedStore::find_by_id(&store, blocked.id).await,
            Err(StorageError::NotFound(_))
        ));
    }
}
