use crate::domain::{
    CreateRoomRequest, DeleteRoomRequest, GetRoomRequest, ListRoomsRequest, UpdateRoomRequest,
};
use crate::http::conversions::{to_response_list, RoomBody, RoomResponse};
use crate::http::{ApiResult, AuthUser, RoostApiServices, ValidJson};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, instrument};

#[instrument(name = "CreateRoom", skip(services, body), fields(user_id = %user_id))]
pub async fn create_room(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(organization_id): Path<String>,
    ValidJson(body): ValidJson<RoomBody>,
) -> ApiResult<(StatusCode, Json<RoomResponse>)> {
    let room = services
        .room_service
        .create_room(CreateRoomRequest {
            user_id,
            organization_id,
            name: body.name,
            description: body.description,
        })
        .await?;

    debug!(room_id = %room.id, "room created");
    Ok((StatusCode::CREATED, Json(room.into())))
}

#[instrument(name = "ListRooms", skip(services), fields(user_id = %user_id))]
pub async fn list_rooms(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(organization_id): Path<String>,
) -> ApiResult<Json<Vec<RoomResponse>>> {
    let rooms = services
        .room_service
        .list_rooms(ListRoomsRequest {
            user_id,
            organization_id,
        })
        .await?;

    Ok(Json(to_response_list(rooms)))
}

#[instrument(name = "GetRoom", skip(services), fields(user_id = %user_id))]
pub async fn get_room(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(room_id): Path<String>,
) -> ApiResult<Json<RoomResponse>> {
    let room = services
        .room_service
        .get_room(GetRoomRequest { user_id, room_id })
        .await?;

    Ok(Json(room.into()))
}

#[instrument(name = "UpdateRoom", skip(services, body), fields(user_id = %user_id))]
pub async fn update_room(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(room_id): Path<String>,
    ValidJson(body): ValidJson<RoomBody>,
) -> ApiResult<Json<RoomResponse>> {
    let room = services
        .room_service
        .update_room(UpdateRoomRequest {
            user_id,
            room_id,
            name: body.name,
            description: body.description,
        })
        .await?;

    Ok(Json(room.into()))
}

#[instrument(name = "DeleteRoom", skip(services), fields(user_id = %user_id))]
pub async fn delete_room(
    State(services): State<RoostApiServices>,
    AuthUser(user_id): AuthUser,
    Path(room_id): Path<String>,
) -> ApiResult<StatusCode> {
    services
        .room_service
        .delete_room(DeleteRoomRequest { user_id, room_id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
