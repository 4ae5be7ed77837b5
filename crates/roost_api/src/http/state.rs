use crate::domain::{DeviceService, OrganizationService, RoomService};
use common::auth::{AuthTokenProvider, AuthorizationGate, OwnershipResolver};
use common::domain::{DeviceRepository, OrganizationRepository, RoomRepository};
use std::sync::Arc;

/// Shared handler state: the domain services plus the token validator
#[derive(Clone)]
pub struct RoostApiServices {
    pub organization_service: Arc<OrganizationService>,
    pub room_service: Arc<RoomService>,
    pub device_service: Arc<DeviceService>,
    pub auth_token_provider: Arc<dyn AuthTokenProvider>,
}

impl RoostApiServices {
    /// Wire the three services over one set of stores, one resolver and one gate
    pub fn from_stores(
        organization_repository: Arc<OrganizationRepository>,
        room_repository: Arc<RoomRepository>,
        device_repository: Arc<dyn DeviceRepository>,
        authorization_gate: Arc<dyn AuthorizationGate>,
        auth_token_provider: Arc<dyn AuthTokenProvider>,
    ) -> Self {
        let ownership_resolver = Arc::new(OwnershipResolver::new(
            organization_repository.clone(),
            room_repository.clone(),
            device_repository.clone(),
        ));

        Self {
            organization_service: Arc::new(OrganizationService::new(
                organization_repository,
                room_repository.clone(),
                ownership_resolver.clone(),
                authorization_gate.clone(),
            )),
            room_service: Arc::new(RoomService::new(
                room_repository,
                device_repository.clone(),
                ownership_resolver.clone(),
                authorization_gate.clone(),
            )),
            device_service: Arc::new(DeviceService::new(
                device_repository,
                ownership_resolver,
                authorization_gate,
            )),
            auth_token_provider,
        }
    }
}
