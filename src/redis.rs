use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};

use crate::store::LockStore;
use crate::LockError;

/// Redis-backed lock store.
///
/// Uses atomic `SET key value NX PX millis` for acquisition and plain `DEL`
/// for release, over a multiplexed connection cloned per call.
#[derive(Clone)]
pub struct RedisLockStore {
    conn: MultiplexedConnection,
}

impl RedisLockStore {
    /// Create a new RedisLockStore from a Redis URL.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub async fn new(url: &str) -> Result<Self, LockError> {
        let client = Client::open(url).map_err(map_redis_error)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }

    /// Create a new RedisLockStore from an existing multiplexed connection.
    pub fn from_connection(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl LockStore for RedisLockStore {
    async fn try_acquire(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, LockError> {
        let mut conn = self.conn.clone();
        let millis = ttl.as_millis() as u64;

        // Atomic SET key value NX PX milliseconds
        let result: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(millis)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(result.is_some())
    }

    async fn release(&self, key: &str) -> Result<(), LockError> {
        let mut conn = self.conn.clone();
        // DEL on an absent key returns 0; idempotent either way.
        let _removed: i64 = conn.del(key).await.map_err(map_redis_error)?;
        Ok(())
    }
}

fn map_redis_error(err: RedisError) -> LockError {
    LockError::StoreUnavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_redis_error_to_store_unavailable() {
        let err = map_redis_error(RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        )));
        match err {
            LockError::StoreUnavailable(msg) => {
                assert!(msg.contains("connection refused"));
            }
            _ => panic!("StoreUnavailable が期待される"),
        }
    }
}
