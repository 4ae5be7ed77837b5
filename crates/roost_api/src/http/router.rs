use crate::http::{device_handler, organization_handler, room_handler, RoostApiServices};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Liveness check, no authentication
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Routes under `/api/v1` plus the public ping endpoint
pub fn build_router(services: RoostApiServices) -> Router {
    let v1 = Router::new()
        .route(
            "/organizations",
            get(organization_handler::list_organizations)
                .post(organization_handler::create_organization),
        )
        .route(
            "/organizations/:organization_id",
            get(organization_handler::get_organization)
                .put(organization_handler::update_organization)
                .delete(organization_handler::delete_organization),
        )
        .route(
            "/organizations/:organization_id/rooms",
            get(room_handler::list_rooms).post(room_handler::create_room),
        )
        .route(
            "/organizations/:organization_id/devices",
            get(device_handler::list_organization_devices).post(device_handler::create_device),
        )
        .route(
            "/rooms/:room_id",
            get(room_handler::get_room)
                .put(room_handler::update_room)
                .delete(room_handler::delete_room),
        )
        .route("/rooms/:room_id/devices", get(device_handler::list_room_devices))
        .route(
            "/devices/:device_id",
            get(device_handler::get_device)
                .put(device_handler::update_device)
                .delete(device_handler::delete_device),
        )
        .route(
            "/devices/:device_id/room",
            put(device_handler::assign_device_to_room)
                .delete(device_handler::unassign_device_from_room),
        );

    Router::new()
        .route("/api/ping", get(ping))
        .nest("/api/v1", v1)
        .with_state(services)
}
