use crate::domain::{BackendId, ExpireOutcome};
use crate::ports::{CacheStore, IdentityProvider};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{Error, Result, TtlSeconds};
use std::sync::Arc;
use tracing::{debug, warn};

/// TTL applied to scoped operations when the caller does not pass one.
pub const DEFAULT_SCOPED_TTL: TtlSeconds = TtlSeconds(3600);

/// Mapping from backend identifier to backend implementation.
///
/// The facade resolves every operation through this registry, so tests and
/// embedders can wire any combination of stores without global state.
#[derive(Clone)]
pub struct BackendRegistry {
    disk: Arc<dyn CacheStore>,
    remote: Arc<dyn CacheStore>,
}

impl BackendRegistry {
    pub fn new(disk: Arc<dyn CacheStore>, remote: Arc<dyn CacheStore>) -> Self {
        Self { disk, remote }
    }

    fn resolve(&self, id: BackendId) -> &Arc<dyn CacheStore> {
        match id {
            BackendId::Disk => &self.disk,
            BackendId::Remote => &self.remote,
        }
    }
}

/// Uniform cache surface over the registered backends.
///
/// Payloads are encoded with `serde_json` before they reach a store. Raw
/// operations use the caller's key verbatim; scoped operations derive a
/// per-principal key so the same keyname can be reused across users. Every
/// failure is rendered as a refusal (`false`) or a miss (`None`) - a broken
/// cache must never break the caller, only force a recomputation.
#[derive(Clone)]
pub struct CacheFacade {
    registry: BackendRegistry,
    default_backend: BackendId,
    identity: Arc<dyn IdentityProvider>,
}

impl CacheFacade {
    pub fn new(
        registry: BackendRegistry,
        default_backend: BackendId,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            registry,
            default_backend,
            identity,
        }
    }

    /// Store `data` under the raw `key`. No per-principal scoping.
    ///
    /// With `ttl` of `None` the entry is written unbounded; a bounded TTL is
    /// only meaningful to backends that record it at write time.
    pub async fn raw_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        backend: Option<&str>,
        ttl: Option<TtlSeconds>,
    ) -> bool {
        if key.is_empty() {
            debug!("refusing cache write for empty key");
            return false;
        }

        self.put(key, data, backend, ttl.unwrap_or(TtlSeconds::UNBOUNDED))
            .await
    }

    /// Fetch the value stored under the raw `key`.
    ///
    /// `ttl` is passed through to the backend for read-time expiry
    /// evaluation; `None` disables the check.
    pub async fn raw_get<T: DeserializeOwned>(
        &self,
        key: &str,
        backend: Option<&str>,
        ttl: Option<TtlSeconds>,
    ) -> Option<T> {
        if key.is_empty() {
            debug!("cache read refused for empty key");
            return None;
        }

        self.fetch(key, backend, ttl.unwrap_or(TtlSeconds::UNBOUNDED))
            .await
    }

    /// Store `data` under a key scoped to the current principal.
    ///
    /// Defaults to a one hour TTL so per-user entries do not outlive a
    /// typical session unless the caller asks for it.
    pub async fn store<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        backend: Option<&str>,
        ttl: Option<TtlSeconds>,
    ) -> bool {
        if key.is_empty() {
            debug!("refusing cache write for empty key");
            return false;
        }

        let scoped = self.scoped_key(key);
        self.put(&scoped, data, backend, ttl.unwrap_or(DEFAULT_SCOPED_TTL))
            .await
    }

    /// Fetch the value stored under `key` for the current principal.
    pub async fn retrieve<T: DeserializeOwned>(
        &self,
        key: &str,
        backend: Option<&str>,
        ttl: Option<TtlSeconds>,
    ) -> Option<T> {
        if key.is_empty() {
            debug!("cache read refused for empty key");
            return None;
        }

        let scoped = self.scoped_key(key);
        self.fetch(&scoped, backend, ttl.unwrap_or(DEFAULT_SCOPED_TTL))
            .await
    }

    /// Delete the entry stored under the raw `key`, regardless of age.
    ///
    /// Backends without explicit expiry (the remote adapter) and unrecognized
    /// backend identifiers report `ExpireOutcome::Unsupported`.
    pub async fn expire_key(&self, key: &str, backend: Option<&str>) -> ExpireOutcome {
        if key.is_empty() {
            return ExpireOutcome::Missing;
        }

        let store = match self.select(backend) {
            Ok(store) => store,
            Err(e) => {
                warn!("expire refused: {}", e);
                return ExpireOutcome::Unsupported;
            }
        };

        match store.delete(key).await {
            Ok(true) => ExpireOutcome::Removed,
            Ok(false) => ExpireOutcome::Missing,
            Err(Error::Unsupported(_)) => ExpireOutcome::Unsupported,
            Err(e) => {
                debug!("expire for key '{}' failed: {}", key, e);
                ExpireOutcome::Missing
            }
        }
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}:{}", key, self.identity.current_principal())
    }

    fn select(&self, backend: Option<&str>) -> Result<&Arc<dyn CacheStore>> {
        let id = match backend {
            Some(name) => name.parse::<BackendId>()?,
            None => self.default_backend,
        };

        Ok(self.registry.resolve(id))
    }

    async fn put<T: Serialize + ?Sized>(
        &self,
        storage_key: &str,
        data: &T,
        backend: Option<&str>,
        ttl: TtlSeconds,
    ) -> bool {
        let payload = match encode(data) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("refusing cache write for key '{}': {}", storage_key, e);
                return false;
            }
        };

        let store = match self.select(backend) {
            Ok(store) => store,
            Err(e) => {
                warn!("cache write refused: {}", e);
                return false;
            }
        };

        match store.write(storage_key, payload, ttl).await {
            Ok(()) => true,
            Err(e) => {
                warn!("cache write for key '{}' failed: {}", storage_key, e);
                false
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        storage_key: &str,
        backend: Option<&str>,
        ttl: TtlSeconds,
    ) -> Option<T> {
        let store = match self.select(backend) {
            Ok(store) => store,
            Err(e) => {
                warn!("cache read refused: {}", e);
                return None;
            }
        };

        let payload = match store.read(storage_key, ttl).await {
            Ok(payload) => payload,
            Err(Error::NotFound) => return None,
            Err(e) => {
                debug!("cache read for key '{}' failed: {}", storage_key, e);
                return None;
            }
        };

        match decode(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("evicting undecodable entry for key '{}': {}", storage_key, e);
                // best-effort: a second reader may have evicted it already
                let _ = store.delete(storage_key).await;
                None
            }
        }
    }
}

fn encode<T: Serialize + ?Sized>(data: &T) -> Result<Vec<u8>> {
    let payload = serde_json::to_vec(data)
        .map_err(|e| Error::InvalidArgument(format!("unencodable payload: {e}")))?;

    if payload.is_empty() || payload == b"null" {
        return Err(Error::InvalidArgument("empty payload".to_string()));
    }

    Ok(payload)
}

fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|e| Error::Corrupt(e.to_string()))
}
