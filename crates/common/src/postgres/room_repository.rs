use crate::domain::{
    CreateRoomRepoInput, DomainError, DomainResult, OrganizationId, ResourceStore, Room, RoomId,
};
use crate::postgres::errors::{map_read_error, map_write_error};
use crate::postgres::PostgresClient;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use tracing::{debug, instrument};

const ROOM_COLUMNS: &str = "id, organization_id, name, description, created_at, updated_at, deleted_at";

#[derive(Debug, Clone)]
pub struct RoomRow {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Row> for RoomRow {
    fn from(row: &Row) -> Self {
        RoomRow {
            id: row.get("id"),
            organization_id: row.get("organization_id"),
            name: row.get("name"),
            description: row.get("description"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: RoomId::new(row.id),
            organization_id: OrganizationId::new(row.organization_id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// PostgreSQL implementation of the room store
#[derive(Clone)]
pub struct PostgresRoomRepository {
    client: PostgresClient,
}

impl PostgresRoomRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceStore<Room> for PostgresRoomRepository {
    #[instrument(skip(self, draft), fields(room_id = %draft.id, organization_id = %draft.organization_id))]
    async fn save(&self, draft: CreateRoomRepoInput) -> DomainResult<Room> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO rooms (id, organization_id, name, description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {ROOM_COLUMNS}"
        );

        // organization_id references organizations(id)
        let row = conn
            .query_one(
                &sql,
                &[
                    &draft.id.as_str(),
                    &draft.organization_id.as_str(),
                    &draft.name,
                    &draft.description,
                    &now,
                ],
            )
            .await
            .map_err(|e| {
                map_write_error(e, |_| {
                    DomainError::OrganizationNotFound(draft.organization_id.to_string())
                })
            })?;

        debug!(room_id = %draft.id, "room created in database");
        Ok(RoomRow::from(&row).into())
    }

    #[instrument(skip(self), fields(room_id = %id))]
    async fn find_by_id(&self, id: &RoomId) -> DomainResult<Room> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql = format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1 AND deleted_at IS NULL");
        let row = conn
            .query_opt(&sql, &[&id.as_str()])
            .await
            .map_err(map_read_error)?;

        row.map(|row| RoomRow::from(&row).into())
            .ok_or_else(|| DomainError::RoomNotFound(id.to_string()))
    }

    #[instrument(skip(self), fields(organization_id = %organization_id))]
    async fn find_for_parent(&self, organization_id: &OrganizationId) -> DomainResult<Vec<Room>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms
             WHERE organization_id = $1 AND deleted_at IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        let rows = conn
            .query(&sql, &[&organization_id.as_str()])
            .await
            .map_err(map_read_error)?;

        Ok(rows.iter().map(|row| RoomRow::from(row).into()).collect())
    }

    #[instrument(skip(self, room), fields(room_id = %room.id))]
    async fn update(&self, room: Room) -> DomainResult<Room> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql = format!(
            "UPDATE rooms SET name = $1, description = $2, updated_at = $3
             WHERE id = $4 AND deleted_at IS NULL
             RETURNING {ROOM_COLUMNS}"
        );
        let row = conn
            .query_opt(
                &sql,
                &[&room.name, &room.description, &Utc::now(), &room.id.as_str()],
            )
            .await
            .map_err(map_read_error)?;

        row.map(|row| RoomRow::from(&row).into())
            .ok_or_else(|| DomainError::RoomNotFound(room.id.to_string()))
    }

    #[instrument(skip(self), fields(room_id = %id))]
    async fn delete(&self, id: &RoomId) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let rows_affected = conn
            .execute(
                "UPDATE rooms SET deleted_at = $1, updated_at = $1
                 WHERE id = $2 AND deleted_at IS NULL",
                &[&Utc::now(), &id.as_str()],
            )
            .await
            .map_err(map_read_error)?;

        if rows_affected == 0 {
            return Err(DomainError::RoomNotFound(id.to_string()));
        }

        debug!(room_id = %id, "room soft deleted");
        Ok(())
    }
}
