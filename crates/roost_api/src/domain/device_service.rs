use common::auth::{AuthorizationGate, Owned, OwnershipResolver};
use common::domain::{
    CreateDeviceRepoInput, Device, DeviceCategory, DeviceId, DeviceRepository, DomainError,
    DomainResult, OrganizationId, Room, RoomId, UserId,
};
use garde::Validate;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

// ============================================================================
// Service Request Types
// ============================================================================

/// Request to register a device under an organization, optionally placed in a room
#[derive(Debug, Clone, Validate)]
pub struct CreateDeviceRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub organization_id: String,
    #[garde(skip)]
    pub room_id: Option<String>,
    /// Generated when absent
    #[garde(skip)]
    pub guid: Option<Uuid>,
    #[garde(length(min = 1, max = 255))]
    pub inventory_number: String,
    #[garde(length(min = 1, max = 255))]
    pub serial_number: String,
    #[garde(length(max = 2000))]
    pub characteristics: String,
    #[garde(skip)]
    pub category: DeviceCategory,
    #[garde(skip)]
    pub units: Option<String>,
    #[garde(skip)]
    pub power_consumption: Option<f64>,
}

#[derive(Debug, Clone, Validate)]
pub struct GetDeviceRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub device_id: String,
}

/// Full replacement of the descriptive device fields.
/// Room placement is changed through assign/unassign only.
#[derive(Debug, Clone, Validate)]
pub struct UpdateDeviceRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub device_id: String,
    /// Existing guid is kept when absent
    #[garde(skip)]
    pub guid: Option<Uuid>,
    #[garde(length(min = 1, max = 255))]
    pub inventory_number: String,
    #[garde(length(min = 1, max = 255))]
    pub serial_number: String,
    #[garde(length(max = 2000))]
    pub characteristics: String,
    #[garde(skip)]
    pub category: DeviceCategory,
    #[garde(skip)]
    pub units: Option<String>,
    #[garde(skip)]
    pub power_consumption: Option<f64>,
}

#[derive(Debug, Clone, Validate)]
pub struct DeleteDeviceRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub device_id: String,
}

#[derive(Debug, Clone, Validate)]
pub struct ListRoomDevicesRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub room_id: String,
}

/// Inventory view: every live device of the organization, assigned or not
#[derive(Debug, Clone, Validate)]
pub struct ListOrganizationDevicesRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub organization_id: String,
}

#[derive(Debug, Clone, Validate)]
pub struct AssignDeviceRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub device_id: String,
    #[garde(length(min = 1))]
    pub room_id: String,
}

#[derive(Debug, Clone, Validate)]
pub struct UnassignDeviceRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub device_id: String,
}

/// Domain service for device business logic
pub struct DeviceService {
    device_repository: Arc<dyn DeviceRepository>,
    ownership_resolver: Arc<OwnershipResolver>,
    authorization_gate: Arc<dyn AuthorizationGate>,
}

impl DeviceService {
    pub fn new(
        device_repository: Arc<dyn DeviceRepository>,
        ownership_resolver: Arc<OwnershipResolver>,
        authorization_gate: Arc<dyn AuthorizationGate>,
    ) -> Self {
        Self {
            device_repository,
            ownership_resolver,
            authorization_gate,
        }
    }

    async fn load_owned(&self, user_id: &UserId, device_id: &str) -> DomainResult<Device> {
        let Owned { resource, owner } = self
            .ownership_resolver
            .resolve_device(&DeviceId::new(device_id))
            .await?;
        self.authorization_gate.authorize(user_id, &owner)?;
        Ok(resource)
    }

    /// Load a destination room and authorize against its organization's owner
    async fn load_destination_room(&self, user_id: &UserId, room_id: &str) -> DomainResult<Room> {
        let Owned { resource, owner } = self
            .ownership_resolver
            .resolve_room(&RoomId::new(room_id))
            .await?;
        self.authorization_gate.authorize(user_id, &owner)?;
        Ok(resource)
    }

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

    fn ensure_same_organization(device_org: &OrganizationId, room: &Room) -> DomainResult<()> {
        if room.organization_id != *device_org {
            return Err(DomainError::ValidationError(format!(
                "room {} belongs to a different organization than the device",
                room.id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, organization_id = %request.organization_id, category = %request.category))]
    pub async fn create_device(&self, request: CreateDeviceRequest) -> DomainResult<Device> {
        common::garde::validate_struct(&request)?;

        let organization_id = self
            .authorize_organization(&request.user_id, &request.organization_id)
            .await?;

        let room_id = match request.room_id.as_deref() {
            Some(room_id) => {
                let room = self
                    .load_destination_room(&request.user_id, room_id)
                    .await?;
                Self::ensure_same_organization(&organization_id, &room)?;
                Some(room.id)
            }
            None => None,
        };

        let repo_input = CreateDeviceRepoInput {
            id: DeviceId::generate(),
            organization_id,
            room_id,
            guid: request.guid.unwrap_or_else(Uuid::new_v4),
            inventory_number: request.inventory_number,
            serial_number: request.serial_number,
            characteristics: request.characteristics,
            category: request.category,
            units: request.units,
            power_consumption: request.power_consumption,
        };
        repo_input.validate()?;

        let device = self.device_repository.save(repo_input).await?;

        debug!(device_id = %device.id, "device created");
        Ok(device)
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, device_id = %request.device_id))]
    pub async fn get_device(&self, request: GetDeviceRequest) -> DomainResult<Device> {
        common::garde::validate_struct(&request)?;
        self.load_owned(&request.user_id, &request.device_id).await
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, room_id = %request.room_id))]
    pub async fn list_room_devices(
        &self,
        request: ListRoomDevicesRequest,
    ) -> DomainResult<Vec<Device>> {
        common::garde::validate_struct(&request)?;

        let room = self
            .load_destination_room(&request.user_id, &request.room_id)
            .await?;
        self.device_repository.find_for_parent(&room.id).await
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, organization_id = %request.organization_id))]
    pub async fn list_organization_devices(
        &self,
        request: ListOrganizationDevicesRequest,
    ) -> DomainResult<Vec<Device>> {
        common::garde::validate_struct(&request)?;

        let organization_id = self
            .authorize_organization(&request.user_id, &request.organization_id)
            .await?;
        self.device_repository
            .find_for_organization(&organization_id)
            .await
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, device_id = %request.device_id, category = %request.category))]
    pub async fn update_device(&self, request: UpdateDeviceRequest) -> DomainResult<Device> {
        common::garde::validate_struct(&request)?;

        let mut device = self
            .load_owned(&request.user_id, &request.device_id)
            .await?;

        if let Some(guid) = request.guid {
            device.guid = guid;
        }
        device.inventory_number = request.inventory_number;
        device.serial_number = request.serial_number;
        device.characteristics = request.characteristics;
        device.category = request.category;
        device.units = request.units;
        device.power_consumption = request.power_consumption;
        device.validate()?;

        let device = self.device_repository.update(device).await?;

        debug!(device_id = %device.id, "device updated");
        Ok(device)
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, device_id = %request.device_id))]
    pub async fn delete_device(&self, request: DeleteDeviceRequest) -> DomainResult<()> {
        common::garde::validate_struct(&request)?;

        let device = self
            .load_owned(&request.user_id, &request.device_id)
            .await?;
        self.device_repository.delete(&device.id).await?;

        debug!(device_id = %device.id, "device deleted");
        Ok(())
    }

    /// Move a device into a room.
    ///
    /// The caller must own the device and the destination room, and the room
    /// must belong to the device's organization.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, device_id = %request.device_id, room_id = %request.room_id))]
    pub async fn assign_device_to_room(&self, request: AssignDeviceRequest) -> DomainResult<()> {
        common::garde::validate_struct(&request)?;

        let device = self
            .load_owned(&request.user_id, &request.device_id)
            .await?;
        let room = self
            .load_destination_room(&request.user_id, &request.room_id)
            .await?;
        Self::ensure_same_organization(&device.organization_id, &room)?;

        self.device_repository
            .assign_to_room(&device.id, &room.id)
            .await?;

        debug!(device_id = %device.id, room_id = %room.id, "device assigned to room");
        Ok(())
    }

    /// Detach a device from its room; it stays in its organization's inventory
    #[instrument(skip(self, request), fields(user_id = %request.user_id, device_id = %request.device_id))]
    pub async fn unassign_device_from_room(
        &self,
        request: UnassignDeviceRequest,
    ) -> DomainResult<()> {
        common::garde::validate_struct(&request)?;

        let device = self
            .load_owned(&request.user_id, &request.device_id)
            .await?;
        self.device_repository
            .unassign_from_room(&device.id)
            .await?;

        debug!(device_id = %device.id, "device unassigned from room");
        Ok(())
    }
}
