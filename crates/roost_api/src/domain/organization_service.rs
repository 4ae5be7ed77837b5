use common::auth::{AuthorizationGate, OwnershipResolver};
use common::domain::{
    CreateOrganizationRepoInput, DomainResult, Location, Organization, OrganizationId,
    OrganizationRepository, Room, RoomRepository, UserId,
};
use garde::Validate;
use std::sync::Arc;
use tracing::{debug, instrument};

// ============================================================================
// Service Request Types
// ============================================================================
// These types are used by the service layer and embed user_id for authorization

/// Request to create an organization owned by `user_id`
#[derive(Debug, Clone, Validate)]
pub struct CreateOrganizationRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(max = 2000))]
    pub description: String,
    #[garde(length(min = 1))]
    pub city: String,
    #[garde(length(min = 1))]
    pub address: String,
    #[garde(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[garde(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

#[derive(Debug, Clone, Validate)]
pub struct GetOrganizationRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub organization_id: String,
}

/// Request to replace the mutable fields of an organization
#[derive(Debug, Clone, Validate)]
pub struct UpdateOrganizationRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub organization_id: String,
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(max = 2000))]
    pub description: String,
    #[garde(length(min = 1))]
    pub city: String,
    #[garde(length(min = 1))]
    pub address: String,
    #[garde(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[garde(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

#[derive(Debug, Clone, Validate)]
pub struct DeleteOrganizationRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(length(min = 1))]
    pub organization_id: String,
}

/// Organizations are listed for the calling user only
#[derive(Debug, Clone, Validate)]
pub struct ListOrganizationsRequest {
    #[garde(skip)]
    pub user_id: UserId,
}

/// Organization together with its live rooms
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationDetails {
    pub organization: Organization,
    pub rooms: Vec<Room>,
}

/// Domain service for organization business logic
pub struct OrganizationService {
    organization_repository: Arc<OrganizationRepository>,
    room_repository: Arc<RoomRepository>,
    ownership_resolver: Arc<OwnershipResolver>,
    authorization_gate: Arc<dyn AuthorizationGate>,
}

impl OrganizationService {
    pub fn new(
        organization_repository: Arc<OrganizationRepository>,
        room_repository: Arc<RoomRepository>,
        ownership_resolver: Arc<OwnershipResolver>,
        authorization_gate: Arc<dyn AuthorizationGate>,
    ) -> Self {
        Self {
            organization_repository,
            room_repository,
            ownership_resolver,
            authorization_gate,
        }
    }

    /// Load an organization and make sure `user_id` owns it
    async fn load_owned(
        &self,
        user_id: &UserId,
        organization_id: &str,
    ) -> DomainResult<Organization> {
        let owned = self
            .ownership_resolver
            .resolve_organization(&OrganizationId::new(organization_id))
            .await?;
        self.authorization_gate.authorize(user_id, &owned.owner)?;
        Ok(owned.resource)
    }

    /// Create a new organization with a generated id. The caller becomes its owner.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, name = %request.name))]
    pub async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> DomainResult<Organization> {
        common::garde::validate_struct(&request)?;

        let repo_input = CreateOrganizationRepoInput {
            id: OrganizationId::generate(),
            owner_user_id: request.user_id,
            name: request.name,
            description: request.description,
            location: Location {
                city: request.city,
                address: request.address,
                lat: request.lat,
                lon: request.lon,
            },
        };

        let organization = self.organization_repository.save(repo_input).await?;

        debug!(organization_id = %organization.id, "organization created");
        Ok(organization)
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, organization_id = %request.organization_id))]
    pub async fn get_organization(
        &self,
        request: GetOrganizationRequest,
    ) -> DomainResult<Organization> {
        common::garde::validate_struct(&request)?;
        self.load_owned(&request.user_id, &request.organization_id)
            .await
    }

    /// Organization plus its rooms in creation order
    #[instrument(skip(self, request), fields(user_id = %request.user_id, organization_id = %request.organization_id))]
    pub async fn get_organization_details(
        &self,
        request: GetOrganizationRequest,
    ) -> DomainResult<OrganizationDetails> {
        common::garde::validate_struct(&request)?;

        let organization = self
            .load_owned(&request.user_id, &request.organization_id)
            .await?;
        let rooms = self
            .room_repository
            .find_for_parent(&organization.id)
            .await?;

        debug!(room_count = rooms.len(), "loaded organization details");
        Ok(OrganizationDetails {
            organization,
            rooms,
        })
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn list_organizations(
        &self,
        request: ListOrganizationsRequest,
    ) -> DomainResult<Vec<Organization>> {
        let organizations = self
            .organization_repository
            .find_for_parent(&request.user_id)
            .await?;

        debug!(count = organizations.len(), "listed organizations");
        Ok(organizations)
    }

    /// Replace name, description and location. The owner never changes.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, organization_id = %request.organization_id))]
    pub async fn update_organization(
        &self,
        request: UpdateOrganizationRequest,
    ) -> DomainResult<Organization> {
        common::garde::validate_struct(&request)?;

        let mut organization = self
            .load_owned(&request.user_id, &request.organization_id)
            .await?;

        organization.name = request.name;
        organization.description = request.description;
        organization.location = Location {
            city: request.city,
            address: request.address,
            lat: request.lat,
            lon: request.lon,
        };

        let organization = self.organization_repository.update(organization).await?;

        debug!(organization_id = %organization.id, "organization updated");
        Ok(organization)
    }

    /// Soft delete. Rooms and devices are left in place.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, organization_id = %request.organization_id))]
    pub async fn delete_organization(&self, request: DeleteOrganizationRequest) -> DomainResult<()> {
        common::garde::validate_struct(&request)?;

        let organization = self
            .load_owned(&request.user_id, &request.organization_id)
            .await?;
        self.organization_repository.delete(&organization.id).await?;

        debug!(organization_id = %organization.id, "organization deleted");
        Ok(())
    }
}
