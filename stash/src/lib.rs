#![deny(clippy::all)]

// Public API
pub mod domain;
pub mod facade;
pub mod identity;
pub mod ports;

// Re-export commonly used types
pub use domain::{BackendId, ExpireOutcome};
pub use facade::{BackendRegistry, CacheFacade, DEFAULT_SCOPED_TTL};
pub use identity::{AnonymousSession, PrincipalId, StaticPrincipal};
pub use ports::{CacheStore, IdentityProvider, RemoteClient};
