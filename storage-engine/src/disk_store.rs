use async_trait::async_trait;
use sha2::{Digest, Sha256};
use shared::{Error, Result, TtlSeconds};
use stash::ports::CacheStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

const ENTRY_SUFFIX: &str = "cache";

// Keys above this length always take the digest path to stay clear of
// filesystem name limits.
const MAX_VERBATIM_KEY: usize = 120;

/// Filesystem-backed store: one entry per `<stem>.cache` file, with the
/// file's mtime doubling as the entry's write time.
///
/// Expiration is lazy. Nothing is recorded at write time; the TTL handed to
/// `read` is compared against the file's age, and an entry that outlived it
/// is removed as part of that read.
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Internal(format!("failed to create cache directory: {e}")))?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{ENTRY_SUFFIX}", file_stem(key)))
    }
}

/// Map a key to a filename stem that cannot escape the cache directory.
///
/// Well-behaved keys are used verbatim so entries stay recognizable on disk.
/// Anything else keeps a mapped prefix and is disambiguated with a digest of
/// the raw key, which preserves one-file-per-key injectivity.
fn file_stem(key: &str) -> String {
    let verbatim = key.len() <= MAX_VERBATIM_KEY
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if verbatim {
        return key.to_string();
    }

    let mapped: String = key
        .chars()
        .take(40)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let digest = hex::encode(Sha256::digest(key.as_bytes()));

    format!("{}-{}", mapped, &digest[..16])
}

#[async_trait]
impl CacheStore for DiskStore {
    async fn write(&self, key: &str, value: Vec<u8>, _ttl: TtlSeconds) -> Result<()> {
        let path = self.entry_path(key);
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", file_stem(key), Uuid::new_v4().simple()));

        fs::write(&tmp, &value)
            .await
            .map_err(|e| Error::Internal(format!("failed to write cache entry: {e}")))?;

        // rename is atomic within the directory, so a reader sees either the
        // old payload or the new one, never a partial file
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(Error::Internal(format!("failed to publish cache entry: {e}")));
        }

        Ok(())
    }

    async fn read(&self, key: &str, ttl: TtlSeconds) -> Result<Vec<u8>> {
        let path = self.entry_path(key);

        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::NotFound),
            Err(e) => return Err(Error::Internal(format!("failed to stat cache entry: {e}"))),
        };

        if !ttl.is_unbounded() {
            let modified = meta
                .modified()
                .map_err(|e| Error::Internal(format!("mtime unavailable: {e}")))?;
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or_default();

            if age > ttl.as_duration() {
                debug!("purging expired cache entry for key '{}'", key);
                let _ = fs::remove_file(&path).await;
                return Err(Error::NotFound);
            }
        }

        match fs::read(&path).await {
            Ok(payload) => Ok(payload),
            // lost a race with a concurrent expiry or explicit delete
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound),
            Err(e) => Err(Error::Internal(format!("failed to read cache entry: {e}"))),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Internal(format!("failed to delete cache entry: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn backdate(path: &Path, secs: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs))
            .unwrap();
    }

    #[tokio::test]
    async fn test_disk_store_write_read_and_overwrite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(temp_dir.path()).unwrap();

        store
            .write("greeting", b"\"hello\"".to_vec(), TtlSeconds::UNBOUNDED)
            .await
            .unwrap();
        let payload = store.read("greeting", TtlSeconds::UNBOUNDED).await.unwrap();
        assert_eq!(payload, b"\"hello\"");

        store
            .write("greeting", b"\"bye\"".to_vec(), TtlSeconds::UNBOUNDED)
            .await
            .unwrap();
        let payload = store.read("greeting", TtlSeconds::UNBOUNDED).await.unwrap();
        assert_eq!(payload, b"\"bye\"");
    }

    #[tokio::test]
    async fn test_disk_store_expired_entry_is_purged_on_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(temp_dir.path()).unwrap();

        store
            .write("stale", b"1".to_vec(), TtlSeconds::UNBOUNDED)
            .await
            .unwrap();
        let path = store.entry_path("stale");
        backdate(&path, 61);

        let result = store.read("stale", TtlSeconds(60)).await;
        assert!(matches!(result, Err(Error::NotFound)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_disk_store_fresh_entry_is_served_and_kept() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(temp_dir.path()).unwrap();

        store
            .write("fresh", b"2".to_vec(), TtlSeconds::UNBOUNDED)
            .await
            .unwrap();
        let path = store.entry_path("fresh");
        backdate(&path, 30);

        let payload = store.read("fresh", TtlSeconds(60)).await.unwrap();
        assert_eq!(payload, b"2");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_disk_store_unbounded_ttl_never_expires() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(temp_dir.path()).unwrap();

        store
            .write("old", b"3".to_vec(), TtlSeconds::UNBOUNDED)
            .await
            .unwrap();
        backdate(&store.entry_path("old"), 1_000_000);

        let payload = store.read("old", TtlSeconds::UNBOUNDED).await.unwrap();
        assert_eq!(payload, b"3");
    }

    #[tokio::test]
    async fn test_disk_store_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(temp_dir.path()).unwrap();

        store
            .write("gone", b"4".to_vec(), TtlSeconds::UNBOUNDED)
            .await
            .unwrap();

        assert!(store.delete("gone").await.unwrap());
        assert!(!store.delete("gone").await.unwrap());

        let result = store.read("gone", TtlSeconds::UNBOUNDED).await;
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_disk_store_missing_key_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(temp_dir.path()).unwrap();

        let result = store.read("never-written", TtlSeconds(60)).await;
        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_disk_store_traversal_keys_stay_inside_the_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(temp_dir.path().join("cache")).unwrap();

        for key in ["../escape", "../../etc/passwd", "a/b/c", "nul\0byte"] {
            assert!(store.entry_path(key).parent() == Some(store.dir()));

            store
                .write(key, b"5".to_vec(), TtlSeconds::UNBOUNDED)
                .await
                .unwrap();
            let payload = store.read(key, TtlSeconds::UNBOUNDED).await.unwrap();
            assert_eq!(payload, b"5");
        }

        // nothing landed next to the cache directory
        let siblings: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(siblings, vec![std::ffi::OsString::from("cache")]);
    }

    #[tokio::test]
    async fn test_disk_store_distinct_weird_keys_get_distinct_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(temp_dir.path()).unwrap();

        // both map to the same prefix, the digest keeps them apart
        store
            .write("a/b", b"6".to_vec(), TtlSeconds::UNBOUNDED)
            .await
            .unwrap();
        store
            .write("a:b", b"7".to_vec(), TtlSeconds::UNBOUNDED)
            .await
            .unwrap();

        assert_eq!(store.read("a/b", TtlSeconds::UNBOUNDED).await.unwrap(), b"6");
        assert_eq!(store.read("a:b", TtlSeconds::UNBOUNDED).await.unwrap(), b"7");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_disk_store_concurrent_writers_never_tear_the_payload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DiskStore::new(temp_dir.path()).unwrap());

        let first = vec![b'a'; 4096];
        let second = vec![b'b'; 4096];

        let mut handles = Vec::new();
        for worker in 0..8 {
            let store = store.clone();
            let payload = if worker % 2 == 0 {
                first.clone()
            } else {
                second.clone()
            };
            handles.push(tokio::spawn(async move {
                for _ in 0..25 {
                    store
                        .write("contended", payload.clone(), TtlSeconds::UNBOUNDED)
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let payload = store.read("contended", TtlSeconds::UNBOUNDED).await.unwrap();
        assert!(payload == first || payload == second);
    }
}
