use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{StoreError, UserStore};
use crate::models::User;

#[derive(Default)]
struct Inner {
    next_id: i32,
    // email -> User
    users: HashMap<String, User>,
}

/// プロセス内メモリ実装のユーザーストア
///
/// テスト専用（サーバー本体は常に PostgreSQL を使う）。
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(email) {
            return Err(StoreError::EmailTaken);
        }

        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
            reset_token: None,
            reset_token_expires_at: None,
        };
        inner.users.insert(email.to_string(), user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(email).cloned())
    }

    async fn update_reset_token(
        &self,
        email: &str,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(email) {
            Some(user) => {
                user.reset_token = Some(token_hash.to_string());
                user.reset_token_expires_at = Some(expires_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_password(&self, user_id: i32, password_hash: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(user) = inner.users.values_mut().find(|u| u.id == user_id) {
            user.password_hash = password_hash.to_string();
            user.reset_token = None;
            user.reset_token_expires_at = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryUserStore::new();
        let created = store.create_user("a@x.com", "hash").await.unwrap();
        assert_eq!(created.id, 1);

        let found = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, "hash");
        assert!(found.reset_token.is_none());
        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryUserStore::new();
        store.create_user("a@x.com", "hash").await.unwrap();
        let result = store.create_user("a@x.com", "other").await;
        assert!(matches!(result, Err(StoreError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_update_reset_token_unknown_email() {
        let store = MemoryUserStore::new();
        let updated = store
            .update_reset_token("ghost@x.com", "digest", OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_update_password_clears_token() {
        let store = MemoryUserStore::new();
        let user = store.create_user("a@x.com", "old").await.unwrap();
        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(15);
        assert!(
            store
                .update_reset_token("a@x.com", "digest", expires_at)
                .await
                .unwrap()
        );

        store.update_password(user.id, "new").await.unwrap();

        let found = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "new");
        assert!(found.reset_token.is_none());
        assert!(found.reset_token_expires_at.is_none());
    }
}
