//! Tests de los ciclos de vida de Trip y MaintenanceLog y de la
//! sincronización de estados de Vehicle y Driver

mod common;

use uuid::Uuid;

use common::{maintenance_request, memory_store, seed_pair, trip_request};
use fleet_dispatch::dto::maintenance_dto::CompleteMaintenanceRequest;
use fleet_dispatch::dto::trip_dto::{CancelTripRequest, CompleteTripRequest, StartTripRequest};
use fleet_dispatch::models::{
    DriverStatus, MaintenanceStatus, TripStatus, VehicleStatus,
};
use fleet_dispatch::services::{MaintenanceService, TripService};
use fleet_dispatch::utils::errors::AppError;

#[tokio::test]
async fn test_trip_full_lifecycle_updates_vehicle_and_driver() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    let trip = service
        .dispatch(trip_request(vehicle.id, driver.id, 15_000.0), Uuid::new_v4())
        .await
        .unwrap();

    // start: los recursos quedan enganchados
    let trip = service
        .start(trip.id, StartTripRequest { start_mileage: 45_000 })
        .await
        .unwrap();
    assert_eq!(trip.status, TripStatus::InProgress);
    assert_eq!(trip.start_mileage, Some(45_000));
    assert!(trip.actual_departure.is_some());

    let vehicle_mid = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    let driver_mid = store.find_driver(driver.id).await.unwrap().unwrap();
    assert_eq!(vehicle_mid.status, VehicleStatus::OnTrip);
    assert_eq!(driver_mid.status, DriverStatus::OnTrip);

    // complete: libera, calcula distancia y acumula en el conductor
    let trip = service
        .complete(
            trip.id,
            CompleteTripRequest {
                end_mileage: Some(45_300),
                notes: Some("Entrega sin incidencias".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(trip.status, TripStatus::Completed);
    assert_eq!(trip.distance_km, Some(300));
    assert!(trip.actual_arrival.is_some());

    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    let driver_after = store.find_driver(driver.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.status, VehicleStatus::Available);
    assert_eq!(vehicle_after.current_mileage, 45_300);
    assert_eq!(driver_after.status, DriverStatus::Available);
    assert_eq!(driver_after.total_trips, 1);
    assert_eq!(driver_after.total_distance_km, 300);
}

#[tokio::test]
async fn test_complete_without_end_mileage_leaves_distance_unset() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    let trip = service
        .dispatch(trip_request(vehicle.id, driver.id, 10_000.0), Uuid::new_v4())
        .await
        .unwrap();
    service
        .start(trip.id, StartTripRequest { start_mileage: 45_000 })
        .await
        .unwrap();

    let trip = service
        .complete(trip.id, CompleteTripRequest::default())
        .await
        .unwrap();

    assert_eq!(trip.status, TripStatus::Completed);
    assert_eq!(trip.distance_km, None);
    assert_eq!(trip.end_mileage, None);

    // El kilometraje del vehículo no retrocede ni se inventa
    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.current_mileage, 40_000);

    let driver_after = store.find_driver(driver.id).await.unwrap().unwrap();
    assert_eq!(driver_after.total_trips, 1);
    assert_eq!(driver_after.total_distance_km, 0);
}

#[tokio::test]
async fn test_complete_rejects_end_mileage_below_start() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    let trip = service
        .dispatch(trip_request(vehicle.id, driver.id, 10_000.0), Uuid::new_v4())
        .await
        .unwrap();
    service
        .start(trip.id, StartTripRequest { start_mileage: 45_000 })
        .await
        .unwrap();

    let result = service
        .complete(
            trip.id,
            CompleteTripRequest {
                end_mileage: Some(44_000),
                notes: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // Nada cambió: el viaje sigue en curso y los recursos ocupados
    let trip_after = service.get(trip.id).await.unwrap();
    assert_eq!(trip_after.status, TripStatus::InProgress);
    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.status, VehicleStatus::OnTrip);
}

#[tokio::test]
async fn test_invalid_trip_transitions_are_rejected() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    let trip = service
        .dispatch(trip_request(vehicle.id, driver.id, 10_000.0), Uuid::new_v4())
        .await
        .unwrap();

    // scheduled no se puede completar
    let result = service.complete(trip.id, CompleteTripRequest::default()).await;
    assert!(matches!(result, Err(AppError::InvalidStateTransition(_))));

    service
        .start(trip.id, StartTripRequest { start_mileage: 45_000 })
        .await
        .unwrap();

    // in_progress no se puede volver a arrancar
    let result = service
        .start(trip.id, StartTripRequest { start_mileage: 45_000 })
        .await;
    assert!(matches!(result, Err(AppError::InvalidStateTransition(_))));

    service
        .complete(trip.id, CompleteTripRequest::default())
        .await
        .unwrap();

    // completed es terminal: ni cancelar ni arrancar
    let result = service
        .cancel(
            trip.id,
            CancelTripRequest {
                reason: "demasiado tarde".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::InvalidStateTransition(_))));
    let result = service
        .start(trip.id, StartTripRequest { start_mileage: 50_000 })
        .await;
    assert!(matches!(result, Err(AppError::InvalidStateTransition(_))));
}

#[tokio::test]
async fn test_cancel_scheduled_trip_does_not_touch_resources() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    let trip = service
        .dispatch(trip_request(vehicle.id, driver.id, 10_000.0), Uuid::new_v4())
        .await
        .unwrap();

    let trip = service
        .cancel(
            trip.id,
            CancelTripRequest {
                reason: "Cliente anuló el pedido".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(trip.status, TripStatus::Cancelled);
    assert_eq!(
        trip.cancellation_reason.as_deref(),
        Some("Cliente anuló el pedido")
    );

    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    let driver_after = store.find_driver(driver.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.status, VehicleStatus::Available);
    assert_eq!(driver_after.status, DriverStatus::Available);
    assert_eq!(driver_after.total_trips, 0);
}

#[tokio::test]
async fn test_cancel_in_progress_trip_releases_resources() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = TripService::new(store.clone());

    let trip = service
        .dispatch(trip_request(vehicle.id, driver.id, 10_000.0), Uuid::new_v4())
        .await
        .unwrap();
    service
        .start(trip.id, StartTripRequest { start_mileage: 45_000 })
        .await
        .unwrap();

    service
        .cancel(
            trip.id,
            CancelTripRequest {
                reason: "Avería en ruta".to_string(),
            },
        )
        .await
        .unwrap();

    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    let driver_after = store.find_driver(driver.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.status, VehicleStatus::Available);
    assert_eq!(driver_after.status, DriverStatus::Available);
    // Un viaje cancelado no suma a los acumulados
    assert_eq!(driver_after.total_trips, 0);
    assert_eq!(driver_after.total_distance_km, 0);
}

#[tokio::test]
async fn test_maintenance_full_lifecycle() {
    let store = memory_store();
    let (vehicle, _) = seed_pair(&store).await;
    let service = MaintenanceService::new(store.clone());

    let log = service
        .schedule(maintenance_request(vehicle.id), Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(log.status, MaintenanceStatus::Scheduled);

    // Programar no toca el vehículo
    let vehicle_mid = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle_mid.status, VehicleStatus::Available);

    let log = service.start(log.id).await.unwrap();
    assert_eq!(log.status, MaintenanceStatus::InProgress);
    let vehicle_mid = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle_mid.status, VehicleStatus::InService);

    let log = service
        .complete(
            log.id,
            CompleteMaintenanceRequest {
                cost: Some("245.50".parse().unwrap()),
                technician_name: Some("J. Ibáñez".to_string()),
                invoice_number: Some("F-2026-0917".to_string()),
                next_service_mileage: Some(55_000),
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(log.status, MaintenanceStatus::Completed);
    assert!(log.completed_date.is_some());
    assert_eq!(log.next_service_mileage, Some(55_000));

    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.status, VehicleStatus::Available);
    assert_eq!(vehicle_after.next_service_mileage, Some(55_000));
}

#[tokio::test]
async fn test_maintenance_start_conflicts_with_trip_in_progress() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let trips = TripService::new(store.clone());
    let maintenance = MaintenanceService::new(store.clone());

    let log = maintenance
        .schedule(maintenance_request(vehicle.id), Uuid::new_v4())
        .await
        .unwrap();

    let trip = trips
        .dispatch(trip_request(vehicle.id, driver.id, 10_000.0), Uuid::new_v4())
        .await
        .unwrap();
    trips
        .start(trip.id, StartTripRequest { start_mileage: 45_000 })
        .await
        .unwrap();

    // El vehículo está on_trip: el compare-and-swap del arranque falla
    let result = maintenance.start(log.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    // El log sigue programado y el vehículo sigue en su viaje
    let log_after = maintenance.get(log.id).await.unwrap();
    assert_eq!(log_after.status, MaintenanceStatus::Scheduled);
    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.status, VehicleStatus::OnTrip);
}

#[tokio::test]
async fn test_cancel_scheduled_maintenance_keeps_vehicle_available() {
    let store = memory_store();
    let (vehicle, _) = seed_pair(&store).await;
    let service = MaintenanceService::new(store.clone());

    let log = service
        .schedule(maintenance_request(vehicle.id), Uuid::new_v4())
        .await
        .unwrap();
    let log = service.cancel(log.id).await.unwrap();
    assert_eq!(log.status, MaintenanceStatus::Cancelled);

    let vehicle_after = store.find_vehicle(vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle_after.status, VehicleStatus::Available);
}

#[tokio::test]
async fn test_schedule_maintenance_for_unknown_vehicle() {
    let store = memory_store();
    let service = MaintenanceService::new(store);

    let result = service
        .schedule(maintenance_request(Uuid::new_v4()), Uuid::new_v4())
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
