//! Tests del validador de despacho y de la creación protegida de viajes

mod common;

use uuid::Uuid;

use common::{memory_store, past, seed_pair, test_driver, test_vehicle, trip_request};
use fleet_dispatch::models::{DriverStatus, TripStatus, VehicleStatus};
use fleet_dispatch::services::TripService;
use fleet_dispatch::utils::errors::AppError;

#[tokio::test]
async fn test_validate_dispatch_valid() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store);

    let verdict = service
        .validate_dispatch(vehicle.id, driver.id, 15_000.0)
        .await
        .unwrap();

    assert!(verdict.valid);
    assert!(verdict.errors.is_empty());
}

#[tokio::test]
async fn test_validate_dispatch_unknown_entities() {
    let store = memory_store();
    let service = TripService::new(store);

    let verdict = service
        .validate_dispatch(Uuid::new_v4(), Uuid::new_v4(), 100.0)
        .await
        .unwrap();

    assert!(!verdict.valid);
    assert_eq!(
        verdict.errors,
        vec!["Vehicle not found".to_string(), "Driver not found".to_string()]
    );
}

#[tokio::test]
async fn test_validate_dispatch_aggregates_all_violations_in_order() {
    let store = memory_store();

    let mut vehicle = test_vehicle(10_000.0);
    vehicle.status = VehicleStatus::InService;
    vehicle.insurance_expiry = past(10);
    let vehicle = store.insert_vehicle(vehicle).await.unwrap();

    let mut driver = test_driver();
    driver.status = DriverStatus::OffDuty;
    driver.license_expiry = past(5);
    let driver = store.insert_driver(driver).await.unwrap();

    let service = TripService::new(store);
    let verdict = service
        .validate_dispatch(vehicle.id, driver.id, 12_000.0)
        .await
        .unwrap();

    assert!(!verdict.valid);
    assert_eq!(
        verdict.errors,
        vec![
            "Vehicle is currently in service".to_string(),
            "Cargo weight (12000kg) exceeds vehicle capacity (10000kg)".to_string(),
            "Vehicle insurance has expired".to_string(),
            "Driver is currently off duty".to_string(),
            "Driver license has expired".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_validate_dispatch_is_read_only() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    // Veredicto inválido por sobrepeso
    let verdict = service
        .validate_dispatch(vehicle.id, driver.id, 50_000.0)
        .await
        .unwrap();
    assert!(!verdict.valid);

    // Nada cambió
    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    let driver_after = store.find_driver(driver.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.status, VehicleStatus::Available);
    assert_eq!(driver_after.status, DriverStatus::Available);
    assert!(store
        .list_trips(Default::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_dispatch_creates_scheduled_trip_with_sequential_number() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    let trip = service
        .dispatch(trip_request(vehicle.id, driver.id, 15_000.0), Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(trip.trip_number, "TRP-000001");
    assert_eq!(trip.status, TripStatus::Scheduled);
    assert!(trip.actual_departure.is_none());

    // Un viaje programado todavía no ocupa los recursos
    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    let driver_after = store.find_driver(driver.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.status, VehicleStatus::Available);
    assert_eq!(driver_after.status, DriverStatus::Available);
}

#[tokio::test]
async fn test_dispatch_rejected_on_expired_insurance() {
    let store = memory_store();
    let mut vehicle = test_vehicle(20_000.0);
    vehicle.insurance_expiry = past(1);
    let vehicle = store.insert_vehicle(vehicle).await.unwrap();
    let driver = store.insert_driver(test_driver()).await.unwrap();

    let service = TripService::new(store.clone());
    let result = service
        .dispatch(trip_request(vehicle.id, driver.id, 15_000.0), Uuid::new_v4())
        .await;

    match result {
        Err(AppError::ValidationFailed(errors)) => {
            assert_eq!(errors, vec!["Vehicle insurance has expired".to_string()]);
        }
        other => panic!("expected ValidationFailed, got {:?}", other),
    }
    assert!(store
        .list_trips(Default::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_dispatch_blocked_while_scheduled_trip_holds_resources() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    service
        .dispatch(trip_request(vehicle.id, driver.id, 10_000.0), Uuid::new_v4())
        .await
        .unwrap();

    // El veredicto de solo lectura no mira viajes `scheduled`...
    let verdict = service
        .validate_dispatch(vehicle.id, driver.id, 10_000.0)
        .await
        .unwrap();
    assert!(verdict.valid);

    // ...pero la inserción protegida sí, y rechaza el doble despacho
    let result = service
        .dispatch(trip_request(vehicle.id, driver.id, 10_000.0), Uuid::new_v4())
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(store.list_trips(Default::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_validate_dispatch_reports_in_progress_trip() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    let trip = service
        .dispatch(trip_request(vehicle.id, driver.id, 10_000.0), Uuid::new_v4())
        .await
        .unwrap();
    service
        .start(trip.id, fleet_dispatch::dto::trip_dto::StartTripRequest { start_mileage: 40_000 })
        .await
        .unwrap();

    let verdict = service
        .validate_dispatch(vehicle.id, driver.id, 10_000.0)
        .await
        .unwrap();

    assert!(!verdict.valid);
    assert!(verdict
        .errors
        .contains(&"Vehicle or driver already has an active trip".to_string()));
    assert!(verdict
        .errors
        .contains(&"Vehicle is currently on trip".to_string()));
    assert!(verdict
        .errors
        .contains(&"Driver is currently on trip".to_string()));
}
