use crate::domain::{DeviceService, OrganizationService, RoomService};
use anyhow::anyhow;
use async_trait::async_trait;
use common::auth::{AuthorizationGate, OwnershipGate, OwnershipResolver};
use common::domain::{
    CreateDeviceRepoInput, CreateOrganizationRepoInput, CreateRoomRepoInput, Device,
    DeviceCategory, DeviceId, DomainError, DomainResult, Location, Organization, OrganizationId,
    ResourceStore, Room, RoomId, UserId,
};
use common::memory::InMemoryStore;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory stores shared by the services built from it
pub struct Fixture {
    pub organizations: Arc<InMemoryStore<Organization>>,
    pub rooms: Arc<InMemoryStore<Room>>,
    pub devices: Arc<InMemoryStore<Device>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            organizations: Arc::new(InMemoryStore::new()),
            rooms: Arc::new(InMemoryStore::new()),
            devices: Arc::new(InMemoryStore::new()),
        }
    }

    pub fn resolver(&self) -> Arc<OwnershipResolver> {
        Arc::new(OwnershipResolver::new(
            self.organizations.clone(),
            self.rooms.clone(),
            self.devices.clone(),
        ))
    }

    pub fn organization_service(&self) -> OrganizationService {
        self.organization_service_with_gate(Arc::new(OwnershipGate::new()))
    }

    pub fn organization_service_with_gate(
        &self,
        gate: Arc<dyn AuthorizationGate>,
    ) -> OrganizationService {
        OrganizationService::new(
            self.organizations.clone(),
            self.rooms.clone(),
            self.resolver(),
            gate,
        )
    }

    pub fn room_service(&self) -> RoomService {
        self.room_service_with_gate(Arc::new(OwnershipGate::new()))
    }

    pub fn room_service_with_gate(&self, gate: Arc<dyn AuthorizationGate>) -> RoomService {
        RoomService::new(
            self.rooms.clone(),
            self.devices.clone(),
            self.resolver(),
            gate,
        )
    }

    pub fn device_service(&self) -> DeviceService {
        self.device_service_with_gate(Arc::new(OwnershipGate::new()))
    }

    pub fn device_service_with_gate(&self, gate: Arc<dyn AuthorizationGate>) -> DeviceService {
        DeviceService::new(self.devices.clone(), self.resolver(), gate)
    }

    pub async fn seed_organization(&self, owner: &str) -> Organization {
        self.organizations
            .save(CreateOrganizationRepoInput {
                id: OrganizationId::generate(),
                owner_user_id: UserId::new(owner),
                name: format!("{}'s org", owner),
                description: String::new(),
                location: Location {
                    city: "Poltava".to_string(),
                    address: "Sobornosti 5".to_string(),
                    lat: 49.59,
                    lon: 34.55,
                },
            })
            .await
            .unwrap()
    }

    pub async fn seed_room(&self, organization_id: &OrganizationId) -> Room {
        self.rooms
            .save(CreateRoomRepoInput {
                id: RoomId::generate(),
                organization_id: organization_id.clone(),
                name: "Workshop".to_string(),
                description: String::new(),
            })
            .await
            .unwrap()
    }

    pub async fn seed_sensor(
        &self,
        organization_id: &OrganizationId,
        room_id: Option<&RoomId>,
    ) -> Device {
        self.devices
            .save(CreateDeviceRepoInput {
                id: DeviceId::generate(),
                organization_id: organization_id.clone(),
                room_id: room_id.cloned(),
                guid: Uuid::new_v4(),
                inventory_number: "INV-100".to_string(),
                serial_number: "SN-100".to_string(),
                characteristics: "0-50C".to_string(),
                category: DeviceCategory::Sensor,
                units: Some("C".to_string()),
                power_consumption: None,
            })
            .await
            .unwrap()
    }
}

/// Organization store whose every call fails at the storage layer
pub struct FailingOrganizationStore;

fn storage_down() -> DomainError {
    DomainError::PersistenceError(anyhow!("connection refused"))
}

#[async_trait]
impl ResourceStore<Organization> for FailingOrganizationStore {
    async fn save(&self, _draft: CreateOrganizationRepoInput) -> DomainResult<Organization> {
        Err(storage_down())
    }

    async fn find_by_id(&self, _id: &OrganizationId) -> DomainResult<Organization> {
        Err(storage_down())
    }

    async fn find_for_parent(&self, _owner: &UserId) -> DomainResult<Vec<Organization>> {
        Err(storage_down())
    }

    async fn update(&self, _organization: Organization) -> DomainResult<Organization> {
        Err(storage_down())
    }

    async fn delete(&self, _id: &OrganizationId) -> DomainResult<()> {
        Err(storage_down())
    }
}
