use crate::domain::{DomainError, OrganizationId, ResourceStore, StoredResource, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical location of an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

/// Organization domain entity, the root of the ownership chain
#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    pub id: OrganizationId,
    /// Immutable after creation
    pub owner_user_id: UserId,
    pub name: String,
    pub description: String,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Repository input for creating an organization (id already generated)
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrganizationRepoInput {
    pub id: OrganizationId,
    pub owner_user_id: UserId,
    pub name: String,
    pub description: String,
    pub location: Location,
}

impl StoredResource for Organization {
    type Id = OrganizationId;
    type ParentId = UserId;
    type Draft = CreateOrganizationRepoInput;

    fn id(&self) -> &OrganizationId {
        &self.id
    }

    fn parent_id(&self) -> Option<&UserId> {
        Some(&self.owner_user_id)
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn not_found(id: &OrganizationId) -> DomainError {
        DomainError::OrganizationNotFound(id.to_string())
    }

    fn from_draft(draft: CreateOrganizationRepoInput, now: DateTime<Utc>) -> Self {
        Organization {
            id: draft.id,
            owner_user_id: draft.owner_user_id,
            name: draft.name,
            description: draft.description,
            location: draft.location,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn replace_with(&mut self, incoming: Self, now: DateTime<Utc>) {
        self.name = incoming.name;
        self.description = incoming.description;
        self.location = incoming.location;
        self.updated_at = now;
    }

    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

/// Store for organizations, listed per owning user
pub type OrganizationRepository = dyn ResourceStore<Organization>;
