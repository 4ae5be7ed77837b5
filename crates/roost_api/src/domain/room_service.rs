use common::auth::{AuthorizationGate, Owned, OwnershipResolver};
use common::domain::{
    CreateRoomRepoInput, DeviceRepository, DomainResult, OrganizationId, ResourceStore, Room,
    RoomId, RoomRepository, UserId,
};
use garde::Validate;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Request to create a room inside an organization
#[derive(Debug, Clone, Validate)]
pub struct CreateRoomRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub organization_id: String,
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(max = 2000))]
    pub description: String,
}

#[derive(Debug, Clone, Validate)]
pub struct GetRoomRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub room_id: String,
}

#[derive(Debug, Clone, Validate)]
pub struct UpdateRoomRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub room_id: String,
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(max = 2000))]
    pub description: String,
}

#[derive(Debug, Clone, Validate)]
pub struct DeleteRoomRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub room_id: String,
}

#[derive(Debug, Clone, Validate)]
pub struct ListRoomsRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub organization_id: String,
}

/// Domain service for room business logic
pub struct RoomService {
    room_repository: Arc<RoomRepository>,
    device_repository: Arc<dyn DeviceRepository>,
    ownership_resolver: Arc<OwnershipResolver>,
    authorization_gate: Arc<dyn AuthorizationGate>,
}

impl RoomService {
    pub fn new(
        room_repository: Arc<RoomRepository>,
        device_repository: Arc<dyn DeviceRepository>,
        ownership_resolver: Arc<OwnershipResolver>,
        authorization_gate: Arc<dyn AuthorizationGate>,
    ) -> Self {
        Self {
            room_repository,
            device_repository,
            ownership_resolver,
            authorization_gate,
        }
    }

    async fn load_owned(&self, user_id: &UserId, room_id: &str) -> DomainResult<Room> {
        let Owned { resource, owner } = self
            .ownership_resolver
            .resolve_room(&RoomId::new(room_id))
            .await?;
        self.authorization_gate.authorize(user_id, &owner)?;
        Ok(resource)
    }

    /// Ensure the parent organization is live and owned by `user_id`
    async fn authorize_organization(
        &self,
        user_id: &UserId,
        organization_id: &str,
    ) -> DomainResult<OrganizationId> {
        let organization_id = OrganizationId::new(organization_id);
        let owner = self
            .ownership_resolver
            .resolve_organization_owner(&organization_id)
            .await?;
        self.authorization_gate.authorize(user_id, &owner)?;
        Ok(organization_id)
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, organization_id = %request.organization_id))]
    pub async fn create_room(&self, request: CreateRoomRequest) -> DomainResult<Room> {
        common::garde::validate_struct(&request)?;

        let organization_id = self
            .authorize_organization(&request.user_id, &request.organization_id)
            .await?;

        let repo_input = CreateRoomRepoInput {
            id: RoomId::generate(),
            organization_id,
            name: request.name,
            description: request.description,
        };

        let room = self.room_repository.save(repo_input).await?;

        debug!(room_id = %room.id, "room created");
        Ok(room)
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, room_id = %request.room_id))]
    pub async fn get_room(&self, request: GetRoomRequest) -> DomainResult<Room> {
        common::garde::validate_struct(&request)?;
        self.load_owned(&request.user_id, &request.room_id).await
    }

    /// Rooms of an organization in creation order; empty when it has none
    #[instrument(skip(self, request), fields(user_id = %request.user_id, organization_id = %request.organization_id))]
    pub async fn list_rooms(&self, request: ListRoomsRequest) -> DomainResult<Vec<Room>> {
        common::garde::validate_struct(&request)?;

        let organization_id = self
            .authorize_organization(&request.user_id, &request.organization_id)
            .await?;

        self.room_repository.find_for_parent(&organization_id).await
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, room_id = %request.room_id))]
    pub async fn update_room(&self, request: UpdateRoomRequest) -> DomainResult<Room> {
        common::garde::validate_struct(&request)?;

        let mut room = self.load_owned(&request.user_id, &request.room_id).await?;
        room.name = request.name;
        room.description = request.description;

        let room = self.room_repository.update(room).await?;

        debug!(room_id = %room.id, "room updated");
        Ok(room)
    }

    /// Soft delete. Live devices in the room stay in the organization, unassigned.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, room_id = %request.room_id))]
    pub async fn delete_room(&self, request: DeleteRoomRequest) -> DomainResult<()> {
        common::garde::validate_struct(&request)?;

        let room = self.load_owned(&request.user_id, &request.room_id).await?;

        let devices = self.device_repository.find_for_parent(&room.id).await?;
        for device in &devices {
            self.device_repository.unassign_from_room(&device.id).await?;
        }
        debug!(room_id = %room.id, detached = devices.len(), "devices detached from room");

        self.room_repository.delete(&room.id).await?;

        debug!(room_id = %room.id, "room deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::Fixture;
    use common::auth::MockAuthorizationGate;
    use common::domain::DomainError;

    #[tokio::test]
    async fn test_create_room_success() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let service = fixture.room_service();

        let room = service
            .create_room(CreateRoomRequest {
                user_id: UserId::new("alice"),
                organization_id: org.id.to_string(),
                name: "Boiler room".to_string(),
                description: "Ground floor".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(room.organization_id, org.id);
        assert_eq!(room.name, "Boiler room");
        assert_eq!(room.created_at, room.updated_at);
    }

    #[tokio::test]
    async fn test_create_room_in_foreign_organization_denied() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let service = fixture.room_service();

        let result = service
            .create_room(CreateRoomRequest {
                user_id: UserId::new("bob"),
                organization_id: org.id.to_string(),
                name: "Sneaky".to_string(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::AccessDenied(_))));
        assert_eq!(fixture.rooms.raw_len().await, 0);
    }

    #[tokio::test]
    async fn test_create_room_in_deleted_organization() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        fixture.organizations.delete(&org.id).await.unwrap();
        let service = fixture.room_service();

        let result = service
            .create_room(CreateRoomRequest {
                user_id: UserId::new("alice"),
                organization_id: org.id.to_string(),
                name: "Late".to_string(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::OrganizationNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_room_by_other_user_denied() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let room = fixture.seed_room(&org.id).await;
        let service = fixture.room_service();

        let result = service
            .update_room(UpdateRoomRequest {
                user_id: UserId::new("bob"),
                room_id: room.id.to_string(),
                name: "Mine now".to_string(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::AccessDenied(_))));
        let stored = fixture.rooms.find_by_id(&room.id).await.unwrap();
        assert_eq!(stored.name, room.name);
    }

    #[tokio::test]
    async fn test_update_room_success() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let room = fixture.seed_room(&org.id).await;
        let service = fixture.room_service();

        let updated = service
            .update_room(UpdateRoomRequest {
                user_id: UserId::new("alice"),
                room_id: room.id.to_string(),
                name: "Archive".to_string(),
                description: "Keep dry".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Archive");
        assert_eq!(updated.organization_id, org.id);
    }

    #[tokio::test]
    async fn test_room_of_deleted_organization_is_unreachable() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let room = fixture.seed_room(&org.id).await;
        fixture.organizations.delete(&org.id).await.unwrap();
        let service = fixture.room_service();

        let result = service
            .get_room(GetRoomRequest {
                user_id: UserId::new("alice"),
                room_id: room.id.to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::OrganizationNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_rooms_empty() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let service = fixture.room_service();

        let rooms = service
            .list_rooms(ListRoomsRequest {
                user_id: UserId::new("alice"),
                organization_id: org.id.to_string(),
            })
            .await
            .unwrap();

        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_delete_room_then_get_is_not_found() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let room = fixture.seed_room(&org.id).await;
        let service = fixture.room_service();

        service
            .delete_room(DeleteRoomRequest {
                user_id: UserId::new("alice"),
                room_id: room.id.to_string(),
            })
            .await
            .unwrap();

        let result = service
            .get_room(GetRoomRequest {
                user_id: UserId::new("alice"),
                room_id: room.id.to_string(),
            })
            .await;
        assert!(matches!(result, Err(DomainError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_room_detaches_its_devices() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let room = fixture.seed_room(&org.id).await;
        let other_room = fixture.seed_room(&org.id).await;
        let inside = fixture.seed_sensor(&org.id, Some(&room.id)).await;
        let elsewhere = fixture.seed_sensor(&org.id, Some(&other_room.id)).await;
        let service = fixture.room_service();

        service
            .delete_room(DeleteRoomRequest {
                user_id: UserId::new("alice"),
                room_id: room.id.to_string(),
            })
            .await
            .unwrap();

        let detached = fixture.devices.find_by_id(&inside.id).await.unwrap();
        assert!(detached.room_id.is_none());
        assert_eq!(detached.organization_id, org.id);

        let untouched = fixture.devices.find_by_id(&elsewhere.id).await.unwrap();
        assert_eq!(untouched.room_id, Some(other_room.id.clone()));

        let live = fixture.devices.find_for_organization(&org.id).await.unwrap();
        assert_eq!(live.len(), 2);
        assert!(fixture.devices.find_for_parent(&room.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_room_denied_leaves_devices_assigned() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let room = fixture.seed_room(&org.id).await;
        let device = fixture.seed_sensor(&org.id, Some(&room.id)).await;
        let service = fixture.room_service();

        let result = service
            .delete_room(DeleteRoomRequest {
                user_id: UserId::new("bob"),
                room_id: room.id.to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::AccessDenied(_))));
        let stored = fixture.devices.find_by_id(&device.id).await.unwrap();
        assert_eq!(stored.room_id, Some(room.id.clone()));
    }

    #[tokio::test]
    async fn test_gate_receives_organization_owner() {
        let fixture = Fixture::new();
        let org = fixture.seed_organization("alice").await;
        let room = fixture.seed_room(&org.id).await;

        let mut gate = MockAuthorizationGate::new();
        gate.expect_authorize()
            .withf(|principal, owner| {
                principal == &UserId::new("carol") && owner == &UserId::new("alice")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = fixture.room_service_with_gate(Arc::new(gate));
        let fetched = service
            .get_room(GetRoomRequest {
                user_id: UserId::new("carol"),
                room_id: room.id.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(fetched.id, room.id);
    }
}
