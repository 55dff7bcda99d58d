use crate::ports::IdentityProvider;
use uuid::Uuid;

/// Principal identifier type - supplied by the surrounding session layer
pub type PrincipalId = String;

/// Identity source wrapping a principal id that was already resolved
/// (e.g. by the authentication layer of the embedding application).
pub struct StaticPrincipal {
    id: PrincipalId,
}

impl StaticPrincipal {
    pub fn new(id: impl Into<PrincipalId>) -> Self {
        Self { id: id.into() }
    }
}

impl IdentityProvider for StaticPrincipal {
    fn current_principal(&self) -> PrincipalId {
        self.id.clone()
    }
}

/// Fallback identity for unauthenticated callers.
///
/// The id is generated once per instance, so all scoped operations within a
/// session agree on the same key derivation while distinct sessions never
/// collide with each other.
pub struct AnonymousSession {
    id: PrincipalId,
}

impl AnonymousSession {
    pub fn new() -> Self {
        Self {
            id: format!("anon-{}", Uuid::new_v4().simple()),
        }
    }
}

impl Default for AnonymousSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for AnonymousSession {
    fn current_principal(&self) -> PrincipalId {
        self.id.clone()
    }
}
