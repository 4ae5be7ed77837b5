use crate::domain::{
    CreateOrganizationRepoInput, DomainError, DomainResult, Location, Organization,
    OrganizationId, ResourceStore, UserId,
};
use crate::postgres::errors::{map_read_error, map_write_error};
use crate::postgres::PostgresClient;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use tracing::{debug, instrument};

const ORGANIZATION_COLUMNS: &str = "id, owner_user_id, name, description, city, address, lat, lon, \
     created_at, updated_at, deleted_at";

/// Organization row for PostgreSQL storage with timestamp metadata
#[derive(Debug, Clone)]
pub struct OrganizationRow {
    pub id: String,
    pub owner_user_id: String,
    pub name: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<&Row> for OrganizationRow {
    fn from(row: &Row) -> Self {
        OrganizationRow {
            id: row.get("id"),
            owner_user_id: row.get("owner_user_id"),
            name: row.get("name"),
            description: row.get("description"),
            city: row.get("city"),
            address: row.get("address"),
            lat: row.get("lat"),
            lon: row.get("lon"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            deleted_at: row.get("deleted_at"),
        }
    }
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Organization {
            id: OrganizationId::new(row.id),
            owner_user_id: UserId::new(row.owner_user_id),
            name: row.name,
            description: row.description,
            location: Location {
                city: row.city,
                address: row.address,
                lat: row.lat,
                lon: row.lon,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// PostgreSQL implementation of the organization store
#[derive(Clone)]
pub struct PostgresOrganizationRepository {
    client: PostgresClient,
}

impl PostgresOrganizationRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceStore<Organization> for PostgresOrganizationRepository {
    #[instrument(skip(self, draft), fields(organization_id = %draft.id, owner = %draft.owner_user_id))]
    async fn save(&self, draft: CreateOrganizationRepoInput) -> DomainResult<Organization> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO organizations
                (id, owner_user_id, name, description, city, address, lat, lon, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
             RETURNING {ORGANIZATION_COLUMNS}"
        );

        let row = conn
            .query_one(
                &sql,
                &[
                    &draft.id.as_str(),
                    &draft.owner_user_id.as_str(),
                    &draft.name,
                    &draft.description,
                    &draft.location.city,
                    &draft.location.address,
                    &draft.location.lat,
                    &draft.location.lon,
                    &now,
                ],
            )
            .await
            .map_err(|e| {
                map_write_error(e, |_| DomainError::OrganizationNotFound(draft.id.to_string()))
            })?;

        debug!(organization_id = %draft.id, "organization created in database");
        Ok(OrganizationRow::from(&row).into())
    }

    #[instrument(skip(self), fields(organization_id = %id))]
    async fn find_by_id(&self, id: &OrganizationId) -> DomainResult<Organization> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations
             WHERE id = $1 AND deleted_at IS NULL"
        );
        let row = conn
            .query_opt(&sql, &[&id.as_str()])
            .await
            .map_err(map_read_error)?;

        match row {
            Some(row) => Ok(OrganizationRow::from(&row).into()),
            None => Err(DomainError::OrganizationNotFound(id.to_string())),
        }
    }

    #[instrument(skip(self), fields(owner = %owner_user_id))]
    async fn find_for_parent(&self, owner_user_id: &UserId) -> DomainResult<Vec<Organization>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql = format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations
             WHERE owner_user_id = $1 AND deleted_at IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        let rows = conn
            .query(&sql, &[&owner_user_id.as_str()])
            .await
            .map_err(map_read_error)?;

        debug!(count = rows.len(), "listed organizations");
        Ok(rows
            .iter()
            .map(|row| OrganizationRow::from(row).into())
            .collect())
    }

    #[instrument(skip(self, organization), fields(organization_id = %organization.id))]
    async fn update(&self, organization: Organization) -> DomainResult<Organization> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let sql = format!(
            "UPDATE organizations
             SET name = $1, description = $2, city = $3, address = $4, lat = $5, lon = $6,
                 updated_at = $7
             WHERE id = $8 AND deleted_at IS NULL
             RETURNING {ORGANIZATION_COLUMNS}"
        );
        let row = conn
            .query_opt(
                &sql,
                &[
                    &organization.name,
                    &organization.description,
                    &organization.location.city,
                    &organization.location.address,
                    &organization.location.lat,
                    &organization.location.lon,
                    &Utc::now(),
                    &organization.id.as_str(),
                ],
            )
            .await
            .map_err(|e| {
                map_write_error(e, |_| {
                    DomainError::OrganizationNotFound(organization.id.to_string())
                })
            })?;

        match row {
            Some(row) => Ok(OrganizationRow::from(&row).into()),
            None => Err(DomainError::OrganizationNotFound(organization.id.to_string())),
        }
    }

    #[instrument(skip(self), fields(organization_id = %id))]
    async fn delete(&self, id: &OrganizationId) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::PersistenceError)?;

        let rows_affected = conn
            .execute(
                "UPDATE organizations
                 SET deleted_at = $1, updated_at = $1
                 WHERE id = $2 AND deleted_at IS NULL",
                &[&Utc::now(), &id.as_str()],
            )
            .await
            .map_err(map_read_error)?;

        if rows_affected == 0 {
            return Err(DomainError::OrganizationNotFound(id.to_string()));
        }

        debug!(organization_id = %id, "organization soft deleted");
        Ok(())
    }
}
