use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::store::LockStore;
use crate::LockError;

struct StoredLock {
    value: String,
    expires_at: Instant,
}

impl StoredLock {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// プロセス内 HashMap によるロックストア。
///
/// テスト用途および単一プロセス構成のフォールバック。期限切れエントリは
/// アクセス時に遅延破棄される。
pub struct InMemoryLockStore {
    locks: tokio::sync::Mutex<HashMap<String, StoredLock>>,
}

impl InMemoryLockStore {
    pub fn new() -> Self {
        Self {
            locks: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// キーが現在保持されているかを返す（トレイト外の診断用プローブ）。
    pub async fn is_locked(&self, key: &str) -> bool {
        let locks = self.locks.lock().await;
        locks.get(key).is_some_and(|e| !e.is_expired())
    }

    /// 保持中エントリのマーカー値を返す。期限切れ・不在なら None。
    pub async fn held_value(&self, key: &str) -> Option<String> {
        let locks = self.locks.lock().await;
        locks
            .get(key)
            .filter(|e| !e.is_expired())
            .map(|e| e.value.clone())
    }
}

impl Default for InMemoryLockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn try_acquire(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, LockError> {
        let mut locks = self.locks.lock().await;
        if let Some(entry) = locks.get(key) {
            if !entry.is_expired() {
                return Ok(false);
            }
        }
        locks.insert(
            key.to_string(),
            StoredLock {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(true)
    }

    async fn release(&self, key: &str) -> Result<(), LockError> {
        let mut locks = self.locks.lock().await;
        locks.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_and_release() {
        let store = InMemoryLockStore::new();
        let acquired = store
            .try_acquire("key1", "v", Duration::from_secs(10))
            .await
            .unwrap();
        assert!(acquired);
        assert!(store.is_locked("key1").await);

        store.release("key1").await.unwrap();
        assert!(!store.is_locked("key1").await);
    }

    #[tokio::test]
    async fn test_second_acquire_fails_while_held() {
        let store = InMemoryLockStore::new();
        assert!(store
            .try_acquire("key1", "v", Duration::from_secs(10))
            .await
            .unwrap());
        assert!(!store
            .try_acquire("key1", "v", Duration::from_secs(10))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_acquire_after_expiry() {
        let store = InMemoryLockStore::new();
        assert!(store
            .try_acquire("key1", "v", Duration::from_millis(1))
            .await
            .unwrap());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!store.is_locked("key1").await);
        assert!(store
            .try_acquire("key1", "v", Duration::from_secs(10))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_release_absent_key_is_noop() {
        let store = InMemoryLockStore::new();
        store.release("missing").await.unwrap();
    }
}
