use crate::domain::{
    CreateDeviceRepoInput, Device, DeviceCategory, DeviceId, DeviceRepository, DomainError,
    DomainResult, OrganizationId, ResourceStore, RoomId,
};
use crate::postgres::errors::{map_read_error, map_write_error};
use crate::postgres::PostgresClient;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use tracing::{debug, instrument};
use uuid::Uuid;

const DEVICE_COLUMNS: &str = "id, organization_id, room_id, guid, inventory_number, serial_number, \
     characteristics, category, units, power_consumption, created_at, updated_at, deleted_at";

/// Device row for PostgreSQL storage; `category` is kept as text
#[derive(Debug, Clone)]
pub struct DeviceRow {
    pub id: String,
    pub organization_id: String,
    pub room_id: Option<String>,
    pub guid: Uuid,
    pub inventory_number: String,
    pub serial_number: String,
    pub characteristics: String,
    pub category: String,
    pub units: Option<String>,
    pub power_consumption: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Row> for DeviceRow {
    fn from(row: &Row) -> Self {
        DeviceRow {
            id: row.get("id"),
            organization_id: row.get("organization_id"),
            room_id: row.get("room_id"),
            guid: row.get("guid"),
            inventory_number: row.get("inventory_number"),
            serial_number: row.get("serial_number"),
            characteristics: row.get("characteristics"),
            category: row.get("category"),
            units: row.get("units"),
            power_consumption: row.get("power_consumption"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }
}

impl TryFrom<DeviceRow> for Device {
    type Error = DomainError;

    fn try_from(row: DeviceRow) -> Result<Self, Self::Error> {
        let category: DeviceCategory = row.category.parse()?;
        Ok(Device {
            id: DeviceId::new(row.id),
            organization_id: OrganizationId::new(row.organization_id),
            room_id: row.room_id.map(RoomId::new),
            guid: row.guid,
            inventory_number: row.inventory_number,
            serial_number: row.serial_number,
            characteristics: row.characteristics,
            category,
            units: row.units,
            power_consumption: row.power_consumption,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

// Named in the devices migration
const ROOM_FOREIGN_KEY: &str = "devices_room_id_fkey";

/// Pick the hop a failed insert points at from the violated foreign key
fn dangling_reference(constraint: Option<&str>, draft: &CreateDeviceRepoInput) -> DomainError {
    match (constraint, &draft.room_id) {
        (Some(ROOM_FOREIGN_KEY), Some(room_id)) => DomainError::RoomNotFound(room_id.to_string()),
        _ => DomainError::OrganizationNotFound(draft.organization_id.to_string()),
    }
}

fn device_from_row(row: &Row) -> DomainResult<Device> {
    Device::try_from(DeviceRow::from(row))
}

/// PostgreSQL implementation of `DeviceRepository`
#[derive(Clone)]
pub struct PostgresDeviceRepository {
    client: PostgresClient,
}

impl PostgresDeviceRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }

    async fn set_room(&self, device_id: &DeviceId, room_id: Option<&RoomId>) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let rows_affected = conn
            .execute(
                "UPDATE devices SET room_id = $1, updated_at = $2
                 WHERE id = $3 AND deleted_at IS NULL",
                &[&room_id.map(RoomId::as_str), &Utc::now(), &device_id.as_str()],
            )
            .await
            .map_err(|e| {
                map_write_error(e, |_| match room_id {
                    Some(room_id) => DomainError::RoomNotFound(room_id.to_string()),
                    None => DomainError::DeviceNotFound(device_id.to_string()),
                })
            })?;

        if rows_affected == 0 {
            return Err(DomainError::DeviceNotFound(device_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceStore<Device> for PostgresDeviceRepository {
    #[instrument(skip(self, draft), fields(device_id = %draft.id, organization_id = %draft.organization_id))]
    async fn save(&self, draft: CreateDeviceRepoInput) -> DomainResult<Device> {
        draft.validate()?;

        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO devices
                (id, organization_id, room_id, guid, inventory_number, serial_number,
                 characteristics, category, units, power_consumption, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
             RETURNING {DEVICE_COLUMNS}"
        );

        let row = conn
            .query_one(
                &sql,
                &[
                    &draft.id.as_str(),
                    &draft.organization_id.as_str(),
                    &draft.room_id.as_ref().map(RoomId::as_str),
                    &draft.guid,
                    &draft.inventory_number,
                    &draft.serial_number,
                    &draft.characteristics,
                    &draft.category.as_str(),
                    &draft.units,
                    &draft.power_consumption,
                    &now,
                ],
            )
            .await
            .map_err(|e| {
                map_write_error(e, |constraint| dangling_reference(constraint, &draft))
            })?;

        debug!(device_id = %draft.id, category = %draft.category, "device created in database");
        device_from_row(&row)
    }

    #[instrument(skip(self), fields(device_id = %id))]
    async fn find_by_id(&self, id: &DeviceId) -> DomainResult<Device> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql =
            format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1 AND deleted_at IS NULL");
        let row = conn
            .query_opt(&sql, &[&id.as_str()])
            .await
            .map_err(map_read_error)?;

        match row {
            Some(row) => device_from_row(&row),
            None => Err(DomainError::DeviceNotFound(id.to_string())),
        }
    }

    #[instrument(skip(self), fields(room_id = %room_id))]
    async fn find_for_parent(&self, room_id: &RoomId) -> DomainResult<Vec<Device>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql = format!(
            "SELECT {DEVICE_COLUMNS} FROM devices
             WHERE room_id = $1 AND deleted_at IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        let rows = conn
            .query(&sql, &[&room_id.as_str()])
            .await
            .map_err(map_read_error)?;

        rows.iter().map(device_from_row).collect()
    }

    #[instrument(skip(self, device), fields(device_id = %device.id))]
    async fn update(&self, device: Device) -> DomainResult<Device> {
        device.validate()?;

        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql = format!(
            "UPDATE devices
             SET guid = $1, inventory_number = $2, serial_number = $3, characteristics = $4,
                 category = $5, units = $6, power_consumption = $7, updated_at = $8
             WHERE id = $9 AND deleted_at IS NULL
             RETURNING {DEVICE_COLUMNS}"
        );
        let row = conn
            .query_opt(
                &sql,
                &[
                    &device.guid,
                    &device.inventory_number,
                    &device.serial_number,
                    &device.characteristics,
                    &device.category.as_str(),
                    &device.units,
                    &device.power_consumption,
                    &Utc::now(),
                    &device.id.as_str(),
                ],
            )
            .await
            .map_err(|e| {
                map_write_error(e, |_| DomainError::DeviceNotFound(device.id.to_string()))
            })?;

        match row {
            Some(row) => device_from_row(&row),
            None => Err(DomainError::DeviceNotFound(device.id.to_string())),
        }
    }

    #[instrument(skip(self), fields(device_id = %id))]
    async fn delete(&self, id: &DeviceId) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let rows_affected = conn
            .execute(
                "UPDATE devices SET deleted_at = $1, updated_at = $1
                 WHERE id = $2 AND deleted_at IS NULL",
                &[&Utc::now(), &id.as_str()],
            )
            .await
            .map_err(map_read_error)?;

        if rows_affected == 0 {
            return Err(DomainError::DeviceNotFound(id.to_string()));
        }

        debug!(device_id = %id, "device soft deleted");
        Ok(())
    }
}

#[async_trait]
impl DeviceRepository for PostgresDeviceRepository {
    #[instrument(skip(self), fields(device_id = %device_id, room_id = %room_id))]
    async fn assign_to_room(&self, device_id: &DeviceId, room_id: &RoomId) -> DomainResult<()> {
        self.set_room(device_id, Some(room_id)).await
    }

    #[instrument(skip(self), fields(device_id = %device_id))]
    async fn unassign_from_room(&self, device_id: &DeviceId) -> DomainResult<()> {
        self.set_room(device_id, None).await
    }

    #[instrument(skip(self), fields(organization_id = %organization_id))]
    async fn find_for_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> DomainResult<Vec<Device>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql = format!(
            "SELECT {DEVICE_COLUMNS} FROM devices
             WHERE organization_id = $1 AND deleted_at IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        let rows = conn
            .query(&sql, &[&organization_id.as_str()])
            .await
            .map_err(map_read_error)?;

        rows.iter().map(device_from_row).collect()
    }
}
