use async_trait::async_trait;
use dashmap::DashMap;
use shared::{Result, TtlSeconds};
use stash::ports::RemoteClient;
use std::time::Instant;

/// In-memory stand-in for the remote key-value service.
///
/// Honors the same contract as the Redis-backed client, including TTL
/// enforcement (checked lazily on `get`), so it can back tests and embedded
/// deployments without a running server.
#[derive(Default)]
pub struct MemoryRemote {
    entries: DashMap<String, StoredValue>,
}

struct StoredValue {
    payload: Vec<u8>,
    expires_at: Option<Instant>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RemoteClient for MemoryRemote {
    async fn set(&self, key: &str, value: &[u8], ttl: TtlSeconds) -> Result<()> {
        let expires_at = (!ttl.is_unbounded()).then(|| Instant::now() + ttl.as_duration());

        self.entries.insert(
            key.to_string(),
            StoredValue {
                payload: value.to_vec(),
                expires_at,
            },
        );

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // the shard guard must be released before removing the entry
        let expired = match self.entries.get(key) {
            Some(entry) => match entry.expires_at {
                Some(deadline) => Instant::now() >= deadline,
                None => false,
            },
            None => return Ok(None),
        };

        if expired {
            self.entries.remove(key);
            return Ok(None);
        }

        Ok(self.entries.get(key).map(|entry| entry.payload.clone()))
    }
}
