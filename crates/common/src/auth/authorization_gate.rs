use crate::domain::{DomainError, DomainResult, UserId};
use tracing::warn;

/// Single policy point for every ownership check.
///
/// All per-operation checks reduce to one call with the principal and the
/// resolved owner of the target resource.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AuthorizationGate: Send + Sync {
    /// Fail with `AccessDenied` unless `principal` is `owner`
    fn authorize(&self, principal: &UserId, owner: &UserId) -> DomainResult<()>;
}

/// Owner-only policy: a user may act on a resource iff they own its organization
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGate;

impl OwnershipGate {
    pub fn new() -> Self {
        Self
    }
}

impl AuthorizationGate for OwnershipGate {
    fn authorize(&self, principal: &UserId, owner: &UserId) -> DomainResult<()> {
        if principal == owner {
            return Ok(());
        }

        warn!(principal = %principal, "access denied: principal does not own resource");
        Err(DomainError::AccessDenied(format!(
            "user {} does not own the requested resource",
            principal
        )))
    }
}
