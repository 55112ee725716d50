#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use fleet_dispatch::dto::maintenance_dto::CreateMaintenanceRequest;
use fleet_dispatch::dto::trip_dto::CreateTripRequest;
use fleet_dispatch::models::{Driver, DriverStatus, Vehicle, VehicleStatus};
use fleet_dispatch::repositories::{FleetStore, MemoryFleetStore};

pub fn memory_store() -> Arc<dyn FleetStore> {
    Arc::new(MemoryFleetStore::new())
}

pub fn future(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

pub fn past(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

pub fn test_vehicle(capacity_kg: f64) -> Vehicle {
    let id = Uuid::new_v4();
    let now = Utc::now();
    Vehicle {
        id,
        plate_number: format!("TST-{}", &id.simple().to_string()[..6].to_uppercase()),
        make: "Volvo".to_string(),
        model: "FH16".to_string(),
        year: 2021,
        vehicle_type: "truck".to_string(),
        capacity_kg,
        status: VehicleStatus::Available,
        fuel_type: "diesel".to_string(),
        current_mileage: 40_000,
        next_service_mileage: None,
        insurance_expiry: future(365),
        registration_expiry: future(365),
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_driver() -> Driver {
    let id = Uuid::new_v4();
    let now = Utc::now();
    Driver {
        id,
        employee_id: format!("EMP-{}", &id.simple().to_string()[..6].to_uppercase()),
        name: "Ana Torres".to_string(),
        email: "ana.torres@example.com".to_string(),
        phone: "+34600111222".to_string(),
        license_number: "LIC-4821".to_string(),
        license_class: "C".to_string(),
        license_expiry: future(365),
        status: DriverStatus::Available,
        hire_date: past(400),
        total_trips: 0,
        total_distance_km: 0,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

pub async fn seed_pair(store: &Arc<dyn FleetStore>) -> (Vehicle, Driver) {
    let vehicle = store
        .insert_vehicle(test_vehicle(20_000.0))
        .await
        .expect("seed vehicle");
    let driver = store.insert_driver(test_driver()).await.expect("seed driver");
    (vehicle, driver)
}

pub fn trip_request(vehicle_id: Uuid, driver_id: Uuid, cargo_weight_kg: f64) -> CreateTripRequest {
    CreateTripRequest {
        vehicle_id,
        driver_id,
        origin: "Madrid".to_string(),
        destination: "Valencia".to_string(),
        cargo_description: "Palets de maquinaria".to_string(),
        cargo_weight_kg,
        scheduled_departure: future(1),
        scheduled_arrival: future(2),
        notes: None,
    }
}

pub fn maintenance_request(vehicle_id: Uuid) -> CreateMaintenanceRequest {
    CreateMaintenanceRequest {
        vehicle_id,
        maintenance_type: "oil_change".to_string(),
        description: "Cambio de aceite y filtros".to_string(),
        mileage_at_service: 40_000,
        scheduled_date: future(3),
        vendor: None,
        cost: None,
        notes: None,
    }
}
