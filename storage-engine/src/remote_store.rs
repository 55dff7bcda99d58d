use async_trait::async_trait;
use shared::{Error, Result, TtlSeconds};
use stash::ports::{CacheStore, RemoteClient};
use std::sync::Arc;

/// Adapter exposing a remote key-value client as a cache backend.
///
/// TTL enforcement lives in the remote service (zero means persist
/// indefinitely), so the `ttl` handed to `read` is not consulted here.
/// Client failures surface as errors, which the facade renders as a miss or
/// a failed write - never a crash.
pub struct RemoteStore {
    client: Arc<dyn RemoteClient>,
}

impl RemoteStore {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheStore for RemoteStore {
    async fn write(&self, key: &str, value: Vec<u8>, ttl: TtlSeconds) -> Result<()> {
        self.client.set(key, &value, ttl).await
    }

    async fn read(&self, key: &str, _ttl: TtlSeconds) -> Result<Vec<u8>> {
        match self.client.get(key).await? {
            Some(payload) => Ok(payload),
            None => Err(Error::NotFound),
        }
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Err(Error::Unsupported("remote backend has no explicit expiry"))
    }
}
