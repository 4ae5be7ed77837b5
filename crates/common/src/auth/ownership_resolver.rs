use crate::domain::{
    Device, DeviceId, DeviceRepository, DomainResult, Organization, OrganizationId,
    OrganizationRepository, ResourceStore, Room, RoomId, RoomRepository, UserId,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A loaded resource together with the user its ownership chain resolves to
#[derive(Debug, Clone, PartialEq)]
pub struct Owned<T> {
    pub resource: T,
    pub owner: UserId,
}

/// Walks the Organization → Room → Device chain to find the accountable user.
///
/// Each hop loads through the store, so a miss surfaces as the not-found
/// variant of the hop that failed (room vs. organization).
pub struct OwnershipResolver {
    organization_repository: Arc<OrganizationRepository>,
    room_repository: Arc<RoomRepository>,
    device_repository: Arc<dyn DeviceRepository>,
}

impl OwnershipResolver {
    pub fn new(
        organization_repository: Arc<OrganizationRepository>,
        room_repository: Arc<RoomRepository>,
        device_repository: Arc<dyn DeviceRepository>,
    ) -> Self {
        Self {
            organization_repository,
            room_repository,
            device_repository,
        }
    }

    #[instrument(skip(self), fields(organization_id = %organization_id))]
    pub async fn resolve_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> DomainResult<Owned<Organization>> {
        let organization = self
            .organization_repository
            .find_by_id(organization_id)
            .await?;
        let owner = organization.owner_user_id.clone();

        Ok(Owned {
            resource: organization,
            owner,
        })
    }

    #[instrument(skip(self), fields(room_id = %room_id))]
    pub async fn resolve_room(&self, room_id: &RoomId) -> DomainResult<Owned<Room>> {
        let room = self.room_repository.find_by_id(room_id).await?;

        debug!(organization_id = %room.organization_id, "resolving room owner through organization");
        let owner = self
            .resolve_organization_owner(&room.organization_id)
            .await?;

        Ok(Owned {
            resource: room,
            owner,
        })
    }

    /// The device's organization anchor is authoritative; its room is never consulted
    #[instrument(skip(self), fields(device_id = %device_id))]
    pub async fn resolve_device(&self, device_id: &DeviceId) -> DomainResult<Owned<Device>> {
        let device = self.device_repository.find_by_id(device_id).await?;

        debug!(organization_id = %device.organization_id, "resolving device owner through organization");
        let owner = self
            .resolve_organization_owner(&device.organization_id)
            .await?;

        Ok(Owned {
            resource: device,
            owner,
        })
    }

    pub async fn resolve_organization_owner(
        &self,
        organization_id: &OrganizationId,
    ) -> DomainResult<UserId> {
        Ok(self.resolve_organization(organization_id).await?.owner)
    }

    pub async fn resolve_room_owner(&self, room_id: &RoomId) -> DomainResult<UserId> {
        Ok(self.resolve_room(room_id).await?.owner)
    }

    pub async fn resolve_device_owner(&self, device_id: &DeviceId) -> DomainResult<UserId> {
        Ok(self.resolve_device(device_id).await?.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CreateDeviceRepoInput, CreateOrganizationRepoInput, CreateRoomRepoInput, DeviceCategory,
        DomainError, Location,
    };
    use crate::memory::InMemoryStore;
    use uuid::Uuid;

    struct Fixture {
        organizations: Arc<InMemoryStore<Organization>>,
        rooms: Arc<InMemoryStore<Room>>,
        devices: Arc<InMemoryStore<Device>>,
        resolver: OwnershipResolver,
    }

    fn fixture() -> Fixture {
        let organizations = Arc::new(InMemoryStore::<Organization>::new());
        let rooms = Arc::new(InMemoryStore::<Room>::new());
        let devices = Arc::new(InMemoryStore::<Device>::new());
        let resolver =
            OwnershipResolver::new(organizations.clone(), rooms.clone(), devices.clone());
        Fixture {
            organizations,
            rooms,
            devices,
            resolver,
        }
    }

    async fn seed_organization(f: &Fixture, id: &str, owner: &str) -> Organization {
        f.organizations
            .save(CreateOrganizationRepoInput {
                id: OrganizationId::new(id),
                owner_user_id: UserId::new(owner),
                name: format!("{} name", id),
                description: String::new(),
                location: Location {
                    city: "Lviv".to_string(),
                    address: "Rynok 1".to_string(),
                    lat: 49.84,
                    lon: 24.03,
                },
            })
            .await
            .unwrap()
    }

    async fn seed_room(f: &Fixture, id: &str, organization_id: &str) -> Room {
        f.rooms
            .save(CreateRoomRepoInput {
                id: RoomId::new(id),
                organization_id: OrganizationId::new(organization_id),
                name: format!("{} name", id),
                description: String::new(),
            })
            .await
            .unwrap()
    }

    async fn seed_device(
        f: &Fixture,
        id: &str,
        organization_id: &str,
        room: Option<&str>,
    ) -> Device {
        f.devices
            .save(CreateDeviceRepoInput {
                id: DeviceId::new(id),
                organization_id: OrganizationId::new(organization_id),
                room_id: room.map(RoomId::new),
                guid: Uuid::new_v4(),
                inventory_number: "INV".to_string(),
                serial_number: "SN".to_string(),
                characteristics: String::new(),
                category: DeviceCategory::Actuator,
                units: None,
                power_consumption: Some(7.5),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_room_owner_matches_organization_owner() {
        let f = fixture();
        seed_organization(&f, "org-1", "alice").await;
        let room = seed_room(&f, "room-1", "org-1").await;

        let room_owner = f.resolver.resolve_room_owner(&room.id).await.unwrap();
        let org_owner = f
            .resolver
            .resolve_organization_owner(&room.organization_id)
            .await
            .unwrap();

        assert_eq!(room_owner, org_owner);
        assert_eq!(room_owner, UserId::new("alice"));
    }

    #[tokio::test]
    async fn test_device_owner_independent_of_room() {
        let f = fixture();
        seed_organization(&f, "org-1", "alice").await;
        seed_organization(&f, "org-2", "bob").await;
        seed_room(&f, "room-b", "org-2").await;
        // Inconsistent placement on purpose: the organization anchor must win
        let device = seed_device(&f, "dev-1", "org-1", Some("room-b")).await;

        let with_room = f.resolver.resolve_device_owner(&device.id).await.unwrap();
        f.devices.unassign_from_room(&device.id).await.unwrap();
        let without_room = f.resolver.resolve_device_owner(&device.id).await.unwrap();

        assert_eq!(with_room, UserId::new("alice"));
        assert_eq!(with_room, without_room);
    }

    #[tokio::test]
    async fn test_missing_room_reports_room_hop() {
        let f = fixture();
        let result = f.resolver.resolve_room(&RoomId::new("ghost")).await;
        assert!(matches!(result, Err(DomainError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn test_deleted_organization_reports_organization_hop() {
        let f = fixture();
        let org = seed_organization(&f, "org-1", "alice").await;
        let room = seed_room(&f, "room-1", "org-1").await;
        f.organizations.delete(&org.id).await.unwrap();

        let result = f.resolver.resolve_room(&room.id).await;
        assert!(matches!(result, Err(DomainError::OrganizationNotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_device_returns_loaded_device() {
        let f = fixture();
        seed_organization(&f, "org-1", "alice").await;
        let device = seed_device(&f, "dev-1", "org-1", None).await;

        let owned = f.resolver.resolve_device(&device.id).await.unwrap();
        assert_eq!(owned.resource, device);
        assert_eq!(owned.owner, UserId::new("alice"));
    }
}
