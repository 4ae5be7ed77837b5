mod config;

use crate::config::{ServiceConfig, StorageBackend};
use common::auth::{JwtAuthTokenProvider, JwtConfig, OwnershipGate};
use common::domain::{
    Device, DeviceRepository, Organization, OrganizationRepository, Room, RoomRepository,
};
use common::memory::InMemoryStore;
use common::postgres::{
    PostgresClient, PostgresConfig, PostgresDeviceRepository, PostgresOrganizationRepository,
    PostgresRoomRepository,
};
use common::telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig, TelemetryProviders};
use goose::MigrationRunner;
use roost_api::http::RoostApiServices;
use roost_api::roost_api::RoostApi;
use roost_runner::Runner;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let telemetry_providers: Option<TelemetryProviders> = match init_telemetry(&TelemetryConfig {
        service_name: config.otel_service_name.clone(),
        otel_endpoint: config.otel_endpoint.clone(),
        otel_enabled: config.otel_enabled,
        log_level: config.log_level.clone(),
    }) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Failed to initialize telemetry: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        otel_enabled = config.otel_enabled,
        storage_backend = ?config.storage_backend,
        "Starting roost-all-in-one service"
    );
    debug!("Configuration: {:?}", config);

    let stores = match initialize_stores(&config).await {
        Ok(stores) => stores,
        Err(e) => {
            error!("Failed to initialize storage: {:#}", e);
            shutdown_telemetry(telemetry_providers);
            std::process::exit(1);
        }
    };

    let token_provider = Arc::new(JwtAuthTokenProvider::new(JwtConfig::new(
        config.jwt_secret.clone(),
        config.jwt_expiration_hours,
    )));

    let services = RoostApiServices::from_stores(
        stores.organization,
        stores.room,
        stores.device,
        Arc::new(OwnershipGate::new()),
        token_provider,
    );

    let roost_api = RoostApi::new(services, config.http_config());
    let postgres_client = stores.postgres_client;

    let runner = Runner::new()
        .with_named_process("roost_api", roost_api.into_runner_process())
        .with_closer(move || async move {
            info!("Running cleanup tasks...");
            if let Some(client) = postgres_client {
                client.close();
            }

            // Flush pending traces and logs
            shutdown_telemetry(telemetry_providers);

            info!("Cleanup complete");
            Ok(())
        })
        .with_closer_timeout(Duration::from_secs(10));

    runner.run().await;
}

struct Stores {
    organization: Arc<OrganizationRepository>,
    room: Arc<RoomRepository>,
    device: Arc<dyn DeviceRepository>,
    postgres_client: Option<PostgresClient>,
}

async fn initialize_stores(config: &ServiceConfig) -> anyhow::Result<Stores> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            info!("Initializing PostgreSQL...");
            let postgres_config = config.postgres_config();
            run_postgres_migrations(&postgres_config).await?;

            let client = PostgresClient::from_config(&postgres_config)?;
            client.ping().await?;

            Ok(Stores {
                organization: Arc::new(PostgresOrganizationRepository::new(client.clone())),
                room: Arc::new(PostgresRoomRepository::new(client.clone())),
                device: Arc::new(PostgresDeviceRepository::new(client.clone())),
                postgres_client: Some(client),
            })
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Ok(Stores {
                organization: Arc::new(InMemoryStore::<Organization>::new()),
                room: Arc::new(InMemoryStore::<Room>::new()),
                device: Arc::new(InMemoryStore::<Device>::new()),
                postgres_client: None,
            })
        }
    }
}

async fn run_postgres_migrations(config: &PostgresConfig) -> anyhow::Result<()> {
    let runner = MigrationRunner::postgres(
        config.goose_binary_path.clone(),
        config.migrations_dir.clone(),
        config.dsn(),
    );
    runner.run_migrations().await
}
