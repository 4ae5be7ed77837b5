use crate::domain::{DomainError, OrganizationId, ResourceStore, RoomId, StoredResource};
use chrono::{DateTime, Utc};

/// Room domain entity, always nested under one organization
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Repository input for creating a room (id already generated)
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRoomRepoInput {
    pub id: RoomId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub description: String,
}

impl StoredResource for Room {
    type Id = RoomId;
    type ParentId = OrganizationId;
    type Draft = CreateRoomRepoInput;

    fn id(&self) -> &RoomId {
        &self.id
    }

    fn parent_id(&self) -> Option<&OrganizationId> {
        Some(&self.organization_id)
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn not_found(id: &RoomId) -> DomainError {
        DomainError::RoomNotFound(id.to_string())
    }

    fn from_draft(draft: CreateRoomRepoInput, now: DateTime<Utc>) -> Self {
        Room {
            id: draft.id,
            organization_id: draft.organization_id,
            name: draft.name,
            description: draft.description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn replace_with(&mut self, incoming: Self, now: DateTime<Utc>) {
        self.name = incoming.name;
        self.description = incoming.description;
        self.updated_at = now;
    }

    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

/// Store for rooms, listed per organization
pub type RoomRepository = dyn ResourceStore<Room>;
