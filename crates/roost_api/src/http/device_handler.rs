use crate::domain::{
    AssignDeviceRequest, CreateDeviceRequest, DeleteDeviceRequest, GetDeviceRequest,
    ListOrganizationDevicesRequest, ListRoomDevicesRequest, UnassignDeviceRequest,
    UpdateDeviceRequest,
};
use crate::http::conversions::{
    to_response_list, AssignRoomBody, CreateDeviceBody, DeviceResponse, UpdateDeviceBody,
};
use crate::http::{ApiResult, AuthUser, RoostApiServices, ValidJson};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, instrument};

#[instrument(name = "CreateDevice", skip(services, body), fields(user_id = %user_id, category = %body.category))]
pub async fn create_device(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(organization_id): Path<String>,
    ValidJson(body): ValidJson<CreateDeviceBody>,
) -> ApiResult<(StatusCode, Json<DeviceResponse>)> {
    let device = services
        .device_service
        .create_device(CreateDeviceRequest {
            user_id,
            organization_id,
            room_id: body.room_id,
            guid: body.guid,
            inventory_number: body.inventory_number,
            serial_number: body.serial_number,
            characteristics: body.characteristics,
            category: body.category,
            units: body.units,
            power_consumption: body.power_consumption,
        })
        .await?;

    debug!(device_id = %device.id, "device created");
    Ok((StatusCode::CREATED, Json(device.into())))
}

/// Inventory of an organization, including devices not placed in any room
#[instrument(name = "ListOrganizationDevices", skip(services), fields(user_id = %user_id))]
pub async fn list_organization_devices(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(organization_id): Path<String>,
) -> ApiResult<Json<Vec<DeviceResponse>>> {
    let devices = services
        .device_service
        .list_organization_devices(ListOrganizationDevicesRequest {
            user_id,
            organization_id,
        })
        .await?;

    Ok(Json(to_response_list(devices)))
}

#[instrument(name = "ListRoomDevices", skip(services), fields(user_id = %user_id))]
pub async fn list_room_devices(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(room_id): Path<String>,
) -> ApiResult<Json<Vec<DeviceResponse>>> {
    let devices = services
        .device_service
        .list_room_devices(ListRoomDevicesRequest { user_id, room_id })
        .await?;

    Ok(Json(to_response_list(devices)))
}

#[instrument(name = "GetDevice", skip(services), fields(user_id = %user_id))]
pub async fn get_device(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(device_id): Path<String>,
) -> ApiResult<Json<DeviceResponse>> {
    let device = services
        .device_service
        .get_device(GetDeviceRequest { user_id, device_id })
        .await?;

    Ok(Json(device.into()))
}

#[instrument(name = "UpdateDevice", skip(services, body), fields(user_id = %user_id, category = %body.category))]
pub async fn update_device(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(device_id): Path<String>,
    ValidJson(body): ValidJson<UpdateDeviceBody>,
) -> ApiResult<Json<DeviceResponse>> {
    let device = services
        .device_service
        .update_device(UpdateDeviceRequest {
            user_id,
            device_id,
            guid: body.guid,
            inventory_number: body.inventory_number,
            serial_number: body.serial_number,
            characteristics: body.characteristics,
            category: body.category,
            units: body.units,
            power_consumption: body.power_consumption,
        })
        .await?;

    Ok(Json(device.into()))
}

#[instrument(name = "DeleteDevice", skip(services), fields(user_id = %user_id))]
pub async fn delete_device(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(device_id): Path<String>,
) -> ApiResult<StatusCode> {
    services
        .device_service
        .delete_device(DeleteDeviceRequest { user_id, device_id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "AssignDeviceToRoom", skip(services, body), fields(user_id = %user_id, room_id = %body.room_id))]
pub async fn assign_device_to_room(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(device_id): Path<String>,
    ValidJson(body): ValidJson<AssignRoomBody>,
) -> ApiResult<StatusCode> {
    services
        .device_service
        .assign_device_to_room(AssignDeviceRequest {
            user_id,
            device_id,
            room_id: body.room_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "UnassignDeviceFromRoom", skip(services), fields(user_id = %user_id))]
pub async fn unassign_device_from_room(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(device_id): Path<String>,
) -> ApiResult<StatusCode> {
    services
        .device_service
        .unassign_device_from_room(UnassignDeviceRequest { user_id, device_id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
