#![cfg(feature = "integration-tests")]

mod support;

use common::domain::{
    CreateDeviceRepoInput, DeviceCategory, DeviceId, DeviceRepository, DomainError,
    OrganizationId, ResourceStore, RoomId,
};
use common::postgres::PostgresDeviceRepository;
use support::{create_organization, create_room, setup_test_db};
use uuid::Uuid;

fn actuator(id: &str, organization_id: &str) -> CreateDeviceRepoInput {
    CreateDeviceRepoInput {
        id: DeviceId::new(id),
        organization_id: OrganizationId::new(organization_id),
        room_id: None,
        guid: Uuid::new_v4(),
        inventory_number: format!("INV-{}", id),
        serial_number: format!("SN-{}", id),
        characteristics: "24V".to_string(),
        category: DeviceCategory::Actuator,
        units: None,
        power_consumption: Some(12.5),
    }
}

#[tokio::test]
async fn test_create_and_get_device() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresDeviceRepository::new(client.clone());
    create_organization(&client, "org-1", "alice").await;

    let draft = actuator("dev-1", "org-1");
    let created = repo.save(draft.clone()).await.unwrap();
    assert_eq!(created.guid, draft.guid);
    assert!(created.room_id.is_none());

    let fetched = repo.find_by_id(&draft.id).await.unwrap();
    assert_eq!(fetched.category, DeviceCategory::Actuator);
    assert_eq!(fetched.power_consumption, Some(12.5));
}

#[tokio::test]
async fn test_sensor_without_units_is_rejected() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresDeviceRepository::new(client.clone());
    create_organization(&client, "org-1", "alice").await;

    let mut draft = actuator("dev-1", "org-1");
    draft.category = DeviceCategory::Sensor;
    draft.units = Some("   ".to_string());

    let result = repo.save(draft).await;
    assert!(matches!(result, Err(DomainError::ValidationError(_))));
}

#[tokio::test]
async fn test_database_rejects_actuator_without_power() {
    let (_container, client) = setup_test_db().await;
    create_organization(&client, "org-1", "alice").await;

    let conn = client.get_connection().await.unwrap();
    let result = conn
        .execute(
            "INSERT INTO devices (id, organization_id, guid, inventory_number, serial_number, category)
             VALUES ('dev-raw', 'org-1', $1, 'INV', 'SN', 'ACTUATOR')",
            &[&Uuid::new_v4()],
        )
        .await;

    let err = result.unwrap_err();
    let code = err.as_db_error().map(|e| e.code().code().to_string());
    assert_eq!(code.as_deref(), Some("23514"));
}

#[tokio::test]
async fn test_assign_unassign_and_listings() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresDeviceRepository::new(client.clone());
    create_organization(&client, "org-1", "alice").await;
    let room = create_room(&client, "room-1", "org-1").await;

    let device = repo.save(actuator("dev-1", "org-1")).await.unwrap();
    repo.save(actuator("dev-2", "org-1")).await.unwrap();

    repo.assign_to_room(&device.id, &room.id).await.unwrap();
    let in_room = repo.find_for_parent(&room.id).await.unwrap();
    assert_eq!(in_room.len(), 1);
    assert_eq!(in_room[0].id, device.id);

    let all = repo
        .find_for_organization(&OrganizationId::new("org-1"))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    repo.unassign_from_room(&device.id).await.unwrap();
    assert!(repo.find_for_parent(&room.id).await.unwrap().is_empty());
    assert!(repo.find_by_id(&device.id).await.unwrap().room_id.is_none());
}

#[tokio::test]
async fn test_assign_to_missing_room() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresDeviceRepository::new(client.clone());
    create_organization(&client, "org-1", "alice").await;
    let device = repo.save(actuator("dev-1", "org-1")).await.unwrap();

    let result = repo.assign_to_room(&device.id, &RoomId::new("ghost")).await;
    assert!(matches!(result, Err(DomainError::RoomNotFound(_))));
}

#[tokio::test]
async fn test_create_in_missing_room_reports_room() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresDeviceRepository::new(client.clone());
    create_organization(&client, "org-1", "alice").await;

    let mut draft = actuator("dev-1", "org-1");
    draft.room_id = Some(RoomId::new("ghost"));
    let result = repo.save(draft).await;

    match result {
        Err(DomainError::RoomNotFound(id)) => assert_eq!(id, "ghost"),
        other => panic!("Expected RoomNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_in_missing_organization_reports_organization() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresDeviceRepository::new(client.clone());

    let result = repo.save(actuator("dev-1", "org-missing")).await;
    assert!(matches!(result, Err(DomainError::OrganizationNotFound(_))));
}

#[tokio::test]
async fn test_update_does_not_move_device() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresDeviceRepository::new(client.clone());
    create_organization(&client, "org-1", "alice").await;
    let room = create_room(&client, "room-1", "org-1").await;
    let device = repo.save(actuator("dev-1", "org-1")).await.unwrap();

    let mut changed = device.clone();
    changed.room_id = Some(room.id.clone());
    changed.serial_number = "SN-NEW".to_string();
    let updated = repo.update(changed).await.unwrap();

    assert_eq!(updated.serial_number, "SN-NEW");
    assert!(updated.room_id.is_none());
}

#[tokio::test]
async fn test_deleted_device_cannot_be_assigned() {
    let (_container, client) = setup_test_db().await;
    let repo = PostgresDeviceRepository::new(client.clone());
    create_organization(&client, "org-1", "alice").await;
    let room = create_room(&client, "room-1", "org-1").await;
    let device = repo.save(actuator("dev-1", "org-1")).await.unwrap();

    repo.delete(&device.id).await.unwrap();

    let result = repo.assign_to_room(&device.id, &room.id).await;
    assert!(matches!(result, Err(DomainError::DeviceNotFound(_))));
}
