#![deny(clippy::all)]

use crate::identity::PrincipalId;
use async_trait::async_trait;
use shared::{Result, TtlSeconds};

// Ports are the pluggable extension points for underlying storage backends
// and the external collaborators the facade depends on.

/// Port for a storage backend holding serialized cache payloads.
///
/// A miss (absent or expired key) is reported as `Error::NotFound`; backends
/// without explicit expiry report `Error::Unsupported` from `delete`.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Store `value` under `key`, replacing any existing entry.
    ///
    /// Backends with native TTL support honor `ttl` at write time; the disk
    /// backend records nothing and evaluates the TTL passed to `read`.
    async fn write(&self, key: &str, value: Vec<u8>, ttl: TtlSeconds) -> Result<()>;

    /// Fetch the payload stored under `key`.
    ///
    /// For backends without native TTL support, an entry whose age exceeds a
    /// bounded `ttl` is deleted as part of this read and reported as a miss.
    async fn read(&self, key: &str, ttl: TtlSeconds) -> Result<Vec<u8>>;

    /// Remove the entry under `key`. `Ok(true)` if something was removed.
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// Port for the external remote key-value client (Redis-like).
///
/// The client is assumed to be connected and configured elsewhere; a TTL of
/// zero means the entry persists indefinitely.
#[async_trait]
pub trait RemoteClient: Send + Sync + 'static {
    async fn set(&self, key: &str, value: &[u8], ttl: TtlSeconds) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Port for the identity collaborator supplying the active principal.
///
/// Implementations must return a usable id even when nobody is authenticated;
/// see `AnonymousSession` for the fallback used in that case.
pub trait IdentityProvider: Send + Sync + 'static {
    fn current_principal(&self) -> PrincipalId;
}
