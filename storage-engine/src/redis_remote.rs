use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use shared::{Error, Result, TtlSeconds};
use stash::ports::RemoteClient;

/// Redis-backed remote client.
///
/// Connection handling and reconnects are delegated to the redis crate's
/// `ConnectionManager`; this type only marshals arguments. A bounded TTL
/// maps to `SETEX`, zero maps to a plain `SET` (persist indefinitely).
pub struct RedisRemote {
    conn: ConnectionManager,
}

impl RedisRemote {
    /// Connect to the server at `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| Error::Internal(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| Error::Internal(format!("redis connection failed: {e}")))?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl RemoteClient for RedisRemote {
    async fn set(&self, key: &str, value: &[u8], ttl: TtlSeconds) -> Result<()> {
        let mut conn = self.conn.clone();
        let outcome = if ttl.is_unbounded() {
            conn.set::<_, _, ()>(key, value).await
        } else {
            conn.set_ex::<_, _, ()>(key, value, ttl.0).await
        };

        outcome.map_err(|e| Error::Internal(format!("redis SET failed: {e}")))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(|e| Error::Internal(format!("redis GET failed: {e}")))
    }
}
