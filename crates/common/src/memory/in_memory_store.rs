use crate::domain::{
    Device, DeviceId, DeviceRepository, DomainError, DomainResult, OrganizationId,
    ResourceStore, RoomId, StoredResource,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory implementation of `ResourceStore`, generic over the resource kind.
///
/// Rows are kept in insertion order and are never removed; soft deletes only
/// stamp `deleted_at`, exactly as the Postgres repositories do.
pub struct InMemoryStore<R: StoredResource> {
    rows: RwLock<Vec<R>>,
}

impl<R: StoredResource> InMemoryStore<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Number of rows including soft-deleted ones
    pub async fn raw_len(&self) -> usize {
        self.rows.read().await.len()
    }
}

impl<R: StoredResource> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: StoredResource> ResourceStore<R> for InMemoryStore<R> {
    async fn save(&self, draft: R::Draft) -> DomainResult<R> {
        let resource = R::from_draft(draft, Utc::now());
        resource.validate()?;

        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id() == resource.id()) {
            return Err(DomainError::PersistenceError(anyhow!(
                "duplicate id {}",
                resource.id()
            )));
        }
        rows.push(resource.clone());

        debug!(id = %resource.id(), "resource saved in memory");
        Ok(resource)
    }

    async fn find_by_id(&self, id: &R::Id) -> DomainResult<R> {
        let rows = self.rows.read().await;
        rows.iter()
            .find(|row| row.is_live() && row.id() == id)
            .cloned()
            .ok_or_else(|| R::not_found(id))
    }

    async fn find_for_parent(&self, parent_id: &R::ParentId) -> DomainResult<Vec<R>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| row.is_live() && row.parent_id() == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn update(&self, resource: R) -> DomainResult<R> {
        resource.validate()?;

        let mut rows = self.rows.write().await;
        let id = resource.id().clone();
        let row = rows
            .iter_mut()
            .find(|row| row.is_live() && *row.id() == id)
            .ok_or_else(|| R::not_found(&id))?;

        row.replace_with(resource, Utc::now());
        Ok(row.clone())
    }

    async fn delete(&self, id: &R::Id) -> DomainResult<()> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.is_live() && row.id() == id)
            .ok_or_else(|| R::not_found(id))?;

        row.mark_deleted(Utc::now());
        debug!(id = %id, "resource soft deleted in memory");
        Ok(())
    }
}

impl InMemoryStore<Device> {
    async fn set_room(&self, device_id: &DeviceId, room_id: Option<RoomId>) -> DomainResult<()> {
        let mut rows = self.rows.write().await;
        let device = rows
            .iter_mut()
            .find(|row| row.is_live() && row.id == *device_id)
            .ok_or_else(|| DomainError::DeviceNotFound(device_id.to_string()))?;

        device.room_id = room_id;
        device.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl DeviceRepository for InMemoryStore<Device> {
    async fn assign_to_room(&self, device_id: &DeviceId, room_id: &RoomId) -> DomainResult<()> {
        self.set_room(device_id, Some(room_id.clone())).await
    }

    async fn unassign_from_room(&self, device_id: &DeviceId) -> DomainResult<()> {
        self.set_room(device_id, None).await
    }

    async fn find_for_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> DomainResult<Vec<Device>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| row.is_live() && row.organization_id == *organization_id)
            .cloned()
            .collect())
    }
}
