#![deny(clippy::all)]

// Public API
pub mod disk_store;
pub mod memory_remote;
pub mod redis_remote;
pub mod remote_store;

pub use disk_store::DiskStore;
pub use memory_remote::MemoryRemote;
pub use redis_remote::RedisRemote;
pub use remote_store::RemoteStore;
