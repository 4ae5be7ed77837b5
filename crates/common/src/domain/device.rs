use crate::domain::{
    validate_device_category, DeviceId, DomainError, DomainResult, OrganizationId,
    ResourceStore, RoomId, StoredResource,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of device, deciding which measurement field is mandatory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceCategory {
    Sensor,
    Actuator,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::Sensor => "SENSOR",
            DeviceCategory::Actuator => "ACTUATOR",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SENSOR" => Ok(DeviceCategory::Sensor),
            "ACTUATOR" => Ok(DeviceCategory::Actuator),
            other => Err(DomainError::ValidationError(format!(
                "unknown device category: {}",
                other
            ))),
        }
    }
}

/// Device domain entity.
///
/// Anchored to an organization for its whole life; `room_id` is `None` while
/// the device sits in storage or transit.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: DeviceId,
    pub organization_id: OrganizationId,
    pub room_id: Option<RoomId>,
    pub guid: Uuid,
    pub inventory_number: String,
    pub serial_number: String,
    pub characteristics: String,
    pub category: DeviceCategory,
    pub units: Option<String>,
    pub power_consumption: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Device {
    pub fn validate(&self) -> DomainResult<()> {
        validate_device_category(
            self.category,
            self.units.as_deref(),
            self.power_consumption,
        )
    }
}

/// Repository input for creating a device (id and guid already generated)
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDeviceRepoInput {
    pub id: DeviceId,
    pub organization_id: OrganizationId,
    pub room_id: Option<RoomId>,
    pub guid: Uuid,
    pub inventory_number: String,
    pub serial_number: String,
    pub characteristics: String,
    pub category: DeviceCategory,
    pub units: Option<String>,
    pub power_consumption: Option<f64>,
}

impl CreateDeviceRepoInput {
    pub fn validate(&self) -> DomainResult<()> {
        validate_device_category(
            self.category,
            self.units.as_deref(),
            self.power_consumption,
        )
    }
}

impl StoredResource for Device {
    type Id = DeviceId;
    type ParentId = RoomId;
    type Draft = CreateDeviceRepoInput;

    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn parent_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn not_found(id: &DeviceId) -> DomainError {
        DomainError::DeviceNotFound(id.to_string())
    }

    fn from_draft(draft: CreateDeviceRepoInput, now: DateTime<Utc>) -> Self {
        Device {
            id: draft.id,
            organization_id: draft.organization_id,
            room_id: draft.room_id,
            guid: draft.guid,
            inventory_number: draft.inventory_number,
            serial_number: draft.serial_number,
            characteristics: draft.characteristics,
            category: draft.category,
            units: draft.units,
            power_consumption: draft.power_consumption,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    // Room placement only changes through assign/unassign
    fn replace_with(&mut self, incoming: Self, now: DateTime<Utc>) {
        self.guid = incoming.guid;
        self.inventory_number = incoming.inventory_number;
        self.serial_number = incoming.serial_number;
        self.characteristics = incoming.characteristics;
        self.category = incoming.category;
        self.units = incoming.units;
        self.power_consumption = incoming.power_consumption;
        self.updated_at = now;
    }

    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    fn validate(&self) -> DomainResult<()> {
        Device::validate(self)
    }
}

/// Device store: the generic contract plus targeted room placement updates
#[async_trait]
pub trait DeviceRepository: ResourceStore<Device> {
    /// Point a live device at `room_id`
    async fn assign_to_room(&self, device_id: &DeviceId, room_id: &RoomId) -> DomainResult<()>;

    /// Clear the room of a live device
    async fn unassign_from_room(&self, device_id: &DeviceId) -> DomainResult<()>;

    /// Live devices anchored to an organization, assigned or not
    async fn find_for_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> DomainResult<Vec<Device>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in [DeviceCategory::Sensor, DeviceCategory::Actuator] {
            assert_eq!(category.as_str().parse::<DeviceCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = "THERMOSTAT".parse::<DeviceCategory>();
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_replace_keeps_room_and_anchor() {
        let now = Utc::now();
        let mut device = Device::from_draft(
            CreateDeviceRepoInput {
                id: DeviceId::new("dev-1"),
                organization_id: OrganizationId::new("org-1"),
                room_id: Some(RoomId::new("room-1")),
                guid: Uuid::new_v4(),
                inventory_number: "INV-1".to_string(),
                serial_number: "SN-1".to_string(),
                characteristics: String::new(),
                category: DeviceCategory::Sensor,
                units: Some("C".to_string()),
                power_consumption: None,
            },
            now,
        );

        let mut incoming = device.clone();
        incoming.room_id = None;
        incoming.organization_id = OrganizationId::new("org-2");
        incoming.serial_number = "SN-2".to_string();
        device.replace_with(incoming, now);

        assert_eq!(device.room_id, Some(RoomId::new("room-1")));
        assert_eq!(device.organization_id, OrganizationId::new("org-1"));
        assert_eq!(device.serial_number, "SN-2");
    }
}
