#![allow(dead_code)]

use common::domain::{
    CreateOrganizationRepoInput, CreateRoomRepoInput, Location, Organization, OrganizationId,
    ResourceStore, Room, RoomId, UserId,
};
use common::postgres::{PostgresClient, PostgresOrganizationRepository, PostgresRoomRepository};
use goose::MigrationRunner;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

/// Start a throwaway Postgres, apply the migrations and return a pooled client
pub async fn setup_test_db() -> (ContainerAsync<Postgres>, PostgresClient) {
    let postgres = Postgres::default().start().await.unwrap();
    let host = postgres.get_host().await.unwrap();
    let port = postgres.get_host_port_ipv4(5432).await.unwrap();

    let migrations_dir = format!("{}/migrations/postgres", env!("CARGO_MANIFEST_DIR"));
    let dsn = format!(
        "postgres://postgres:postgres@{}:{}/postgres?sslmode=disable",
        host, port
    );
    let goose_path = which::which("goose").expect("goose binary not found");

    MigrationRunner::postgres(goose_path.to_string_lossy().to_string(), migrations_dir, dsn)
        .run_migrations()
        .await
        .expect("Migrations failed");

    let client = PostgresClient::new(
        &host.to_string(),
        port,
        "postgres",
        "postgres",
        "postgres",
        5,
    )
    .expect("Failed to create client");

    (postgres, client)
}

pub async fn create_organization(client: &PostgresClient, id: &str, owner: &str) -> Organization {
    PostgresOrganizationRepository::new(client.clone())
        .save(CreateOrganizationRepoInput {
            id: OrganizationId::new(id),
            owner_user_id: UserId::new(owner),
            name: format!("Org {}", id),
            description: "test organization".to_string(),
            location: Location {
                city: "Lviv".to_string(),
                address: "Rynok Square 1".to_string(),
                lat: 49.84,
                lon: 24.03,
            },
        })
        .await
        .unwrap()
}

pub async fn create_room(client: &PostgresClient, id: &str, organization_id: &str) -> Room {
    PostgresRoomRepository::new(client.clone())
        .save(CreateRoomRepoInput {
            id: RoomId::new(id),
            organization_id: OrganizationId::new(organization_id),
            name: format!("Room {}", id),
            description: String::new(),
        })
        .await
        .unwrap()
}
