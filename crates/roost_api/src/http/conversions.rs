//! Wire types for the REST surface. Field names are camelCase.

use crate::domain::OrganizationDetails;
use chrono::{DateTime, Utc};
use common::domain::{Device, DeviceCategory, Location, Organization, Room};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDto {
    pub city: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<Location> for LocationDto {
    fn from(location: Location) -> Self {
        LocationDto {
            city: location.city,
            address: location.address,
            lat: location.lat,
            lon: location.lon,
        }
    }
}

/// Body of `POST /organizations` and `PUT /organizations/:id`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub location: LocationDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub description: String,
    pub location: LocationDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationResponse {
    fn from(organization: Organization) -> Self {
        OrganizationResponse {
            id: organization.id.to_string(),
            owner_user_id: organization.owner_user_id.to_string(),
            name: organization.name,
            description: organization.description,
            location: organization.location.into(),
            created_at: organization.created_at,
            updated_at: organization.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDetailsResponse {
    #[serde(flatten)]
    pub organization: OrganizationResponse,
    pub rooms: Vec<RoomResponse>,
}

impl From<OrganizationDetails> for OrganizationDetailsResponse {
    fn from(details: OrganizationDetails) -> Self {
        OrganizationDetailsResponse {
            organization: details.organization.into(),
            rooms: details.rooms.into_iter().map(RoomResponse::from).collect(),
        }
    }
}

/// Body of `POST /organizations/:id/rooms` and `PUT /rooms/:id`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        RoomResponse {
            id: room.id.to_string(),
            organization_id: room.organization_id.to_string(),
            name: room.name,
            description: room.description,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

/// Body of `POST /organizations/:id/devices`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceBody {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub guid: Option<Uuid>,
    pub inventory_number: String,
    pub serial_number: String,
    #[serde(default)]
    pub characteristics: String,
    pub category: DeviceCategory,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub power_consumption: Option<f64>,
}

/// Body of `PUT /devices/:id`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceBody {
    #[serde(default)]
    pub guid: Option<Uuid>,
    pub inventory_number: String,
    pub serial_number: String,
    #[serde(default)]
    pub characteristics: String,
    pub category: DeviceCategory,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub power_consumption: Option<f64>,
}

/// Body of `PUT /devices/:id/room`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoomBody {
    pub room_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: String,
    pub organization_id: String,
    pub room_id: Option<String>,
    pub guid: Uuid,
    pub inventory_number: String,
    pub serial_number: String,
    pub characteristics: String,
    pub category: DeviceCategory,
    pub units: Option<String>,
    pub power_consumption: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        DeviceResponse {
            id: device.id.to_string(),
            organization_id: device.organization_id.to_string(),
            room_id: device.room_id.map(|id| id.to_string()),
            guid: device.guid,
            inventory_number: device.inventory_number,
            serial_number: device.serial_number,
            characteristics: device.characteristics,
            category: device.category,
            units: device.units,
            power_consumption: device.power_consumption,
            created_at: device.created_at,
            updated_at: device.updated_at,
        }
    }
}

pub fn to_response_list<T, R>(items: Vec<T>) -> Vec<R>
where
    R: From<T>,
{
    items.into_iter().map(R::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::domain::{DeviceId, OrganizationId};

    #[test]
    fn test_device_response_uses_camel_case() {
        let now = Utc::now();
        let device = Device {
            id: DeviceId::new("dev-1"),
            organization_id: OrganizationId::new("org-1"),
            room_id: None,
            guid: Uuid::nil(),
            inventory_number: "INV".to_string(),
            serial_number: "SN".to_string(),
            characteristics: String::new(),
            category: DeviceCategory::Actuator,
            units: None,
            power_consumption: Some(3.0),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_value(DeviceResponse::from(device)).unwrap();
        assert_eq!(json["powerConsumption"], 3.0);
        assert_eq!(json["category"], "ACTUATOR");
        assert_eq!(json["organizationId"], "org-1");
        assert!(json["roomId"].is_null());
    }

    #[test]
    fn test_create_device_body_optional_fields() {
        let body: CreateDeviceBody = serde_json::from_value(serde_json::json!({
            "inventoryNumber": "INV",
            "serialNumber": "SN",
            "category": "SENSOR",
            "units": "lux"
        }))
        .unwrap();

        assert!(body.guid.is_none());
        assert!(body.room_id.is_none());
        assert_eq!(body.category, DeviceCategory::Sensor);
        assert_eq!(body.units.as_deref(), Some("lux"));
    }
}
