use crate::domain::{
    CreateOrganizationRequest, DeleteOrganizationRequest, GetOrganizationRequest,
    ListOrganizationsRequest, UpdateOrganizationRequest,
};
use crate::http::conversions::{
    to_response_list, OrganizationBody, OrganizationDetailsResponse, OrganizationResponse,
};
use crate::http::{ApiResult, AuthUser, RoostApiServices, ValidJson};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, instrument};

#[instrument(name = "CreateOrganization", skip(services, body), fields(user_id = %user_id))]
pub async fn create_organization(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    ValidJson(body): ValidJson<OrganizationBody>,
) -> ApiResult<(StatusCode, Json<OrganizationResponse>)> {
    let organization = services
        .organization_service
        .create_organization(CreateOrganizationRequest {
            user_id,
            name: body.name,
            description: body.description,
            city: body.location.city,
            address: body.location.address,
            lat: body.location.lat,
            lon: body.location.lon,
        })
        .await?;

    debug!(organization_id = %organization.id, "organization created");
    Ok((StatusCode::CREATED, Json(organization.into())))
}

#[instrument(name = "ListOrganizations", skip(services), fields(user_id = %user_id))]
pub async fn list_organizations(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let organizations = services
        .organization_service
        .list_organizations(ListOrganizationsRequest { user_id })
        .await?;

    Ok(Json(to_response_list(organizations)))
}

/// Organization with its rooms
#[instrument(name = "GetOrganization", skip(services), fields(user_id = %user_id))]
pub async fn get_organization(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(organization_id): Path<String>,
) -> ApiResult<Json<OrganizationDetailsResponse>> {
    let details = services
        .organization_service
        .get_organization_details(GetOrganizationRequest {
            user_id,
            organization_id,
        })
        .await?;

    Ok(Json(details.into()))
}

#[instrument(name = "UpdateOrganization", skip(services, body), fields(user_id = %user_id))]
pub async fn update_organization(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(organization_id): Path<String>,
    ValidJson(body): ValidJson<OrganizationBody>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = services
        .organization_service
        .update_organization(UpdateOrganizationRequest {
            user_id,
            organization_id,
            name: body.name,
            description: body.description,
            city: body.location.city,
            address: body.location.address,
            lat: body.location.lat,
            lon: body.location.lon,
        })
        .await?;

    Ok(Json(organization.into()))
}

#[instrument(name = "DeleteOrganization", skip(services), fields(user_id = %user_id))]
pub async fn delete_organization(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(organization_id): Path<String>,
) -> ApiResult<StatusCode> {
    services
        .organization_service
        .delete_organization(DeleteOrganizationRequest {
            user_id,
            organization_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
