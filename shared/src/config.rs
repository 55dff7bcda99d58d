use tracing::warn;

pub struct Config {
    pub default_backend: String,
    pub cache_dir: String,
    pub redis_url: String,
}

impl Config {
    const DEFAULT_BACKEND: &str = "disk";
    const DEFAULT_CACHE_DIR: &str = "./cache";
    const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

    pub fn from_env() -> Self {
        Self {
            default_backend: std::env::var("STASH_BACKEND")
                .unwrap_or_else(|_| Self::DEFAULT_BACKEND.to_string()),
            cache_dir: std::env::var("STASH_CACHE_DIR").unwrap_or_else(|_| {
                warn!(
                    "STASH_CACHE_DIR not set, using default directory '{}'",
                    Self::DEFAULT_CACHE_DIR
                );
                Self::DEFAULT_CACHE_DIR.to_string()
            }),
            redis_url: std::env::var("STASH_REDIS_URL")
                .unwrap_or_else(|_| Self::DEFAULT_REDIS_URL.to_string()),
        }
    }
}
