use crate::domain::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Display;

/// An entity persisted with soft-delete lifecycle semantics.
///
/// Implemented by `Organization`, `Room` and `Device`. The associated types tie
/// each entity to its id, the id of the parent it is listed under, and the
/// repository input used to create it.
pub trait StoredResource: Clone + Send + Sync + 'static {
    type Id: Clone + PartialEq + Display + Send + Sync;
    type ParentId: Clone + PartialEq + Display + Send + Sync;
    type Draft: Send + Sync;

    fn id(&self) -> &Self::Id;

    /// Parent this resource is listed under, `None` when detached
    fn parent_id(&self) -> Option<&Self::ParentId>;

    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Error reported when `id` does not match a live row
    fn not_found(id: &Self::Id) -> DomainError;

    /// Materialize a draft as a freshly created row (`created_at = updated_at = now`)
    fn from_draft(draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Replace the mutable columns of `self` with those of `incoming`.
    /// Identity, ownership anchors and `created_at` are kept.
    fn replace_with(&mut self, incoming: Self, now: DateTime<Utc>);

    fn mark_deleted(&mut self, now: DateTime<Utc>);

    /// Entity-local invariants checked before every write
    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }

    fn is_live(&self) -> bool {
        self.deleted_at().is_none()
    }
}

/// Generic persistence contract shared by every resource kind.
///
/// All reads and writes are scoped to rows that are not soft deleted.
#[async_trait]
pub trait ResourceStore<R: StoredResource>: Send + Sync {
    /// Persist a new resource, assigning timestamps
    async fn save(&self, draft: R::Draft) -> DomainResult<R>;

    /// Fetch a live resource, `not_found` otherwise
    async fn find_by_id(&self, id: &R::Id) -> DomainResult<R>;

    /// List live children of `parent_id`; empty when there are none
    async fn find_for_parent(&self, parent_id: &R::ParentId) -> DomainResult<Vec<R>>;

    /// Replace the mutable columns of a live resource and refresh `updated_at`
    async fn update(&self, resource: R) -> DomainResult<R>;

    /// Stamp `deleted_at` on a live resource. Deleting twice is `not_found`.
    async fn delete(&self, id: &R::Id) -> DomainResult<()>;
}
