// shared/src/lib.rs

use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not found")]
    NotFound,
    #[error("unknown backend: {0}")]
    UnknownBackend(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("corrupt entry: {0}")]
    Corrupt(String),
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Entry lifetime in whole seconds. Zero disables expiration on every backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlSeconds(pub u64);

impl TtlSeconds {
    pub const UNBOUNDED: TtlSeconds = TtlSeconds(0);

    pub fn is_unbounded(&self) -> bool {
        self.0 == 0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

pub mod config;
