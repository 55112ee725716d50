//! Implementación en memoria de `FleetStore`
//!
//! Todas las entidades viven bajo un solo mutex: cada transición es una
//! sección crítica corta e indivisible, con lo que las precondiciones
//! compare-and-swap se verifican y aplican sin ventana de carrera. Se usa en
//! los tests del motor y como fallback cuando no hay DATABASE_URL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{
    format_trip_number, Driver, DriverStatus, MaintenanceLog, MaintenanceStatus, Trip, Vehicle,
    VehicleStatus,
};
use crate::repositories::{FleetStore, TransitionCommit, TripFilter};
use crate::utils::errors::AppError;

#[derive(Default)]
struct Inner {
    vehicles: HashMap<Uuid, Vehicle>,
    drivers: HashMap<Uuid, Driver>,
    trips: HashMap<Uuid, Trip>,
    maintenance: HashMap<Uuid, MaintenanceLog>,
}

pub struct MemoryFleetStore {
    inner: Mutex<Inner>,
    trip_seq: AtomicI64,
}

impl MemoryFleetStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            trip_seq: AtomicI64::new(0),
        }
    }
}

impl Default for MemoryFleetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FleetStore for MemoryFleetStore {
    async fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let mut inner = self.inner.lock().await;
        inner.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.vehicles.get(&id).cloned())
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let inner = self.inner.lock().await;
        let mut vehicles: Vec<Vehicle> = inner.vehicles.values().cloned().collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    async fn update_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let mut inner = self.inner.lock().await;
        if !inner.vehicles.contains_key(&vehicle.id) {
            return Err(AppError::NotFound("Vehicle not found".to_string()));
        }
        inner.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn vehicle_plate_exists(&self, plate_number: &str) -> Result<bool, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .vehicles
            .values()
            .any(|v| v.plate_number.eq_ignore_ascii_case(plate_number)))
    }

    async fn insert_driver(&self, driver: Driver) -> Result<Driver, AppError> {
        let mut inner = self.inner.lock().await;
        inner.drivers.insert(driver.id, driver.clone());
        Ok(driver)
    }

    async fn find_driver(&self, id: Uuid) -> Result<Option<Driver>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.drivers.get(&id).cloned())
    }

    async fn list_drivers(&self) -> Result<Vec<Driver>, AppError> {
        let inner = self.inner.lock().await;
        let mut drivers: Vec<Driver> = inner.drivers.values().cloned().collect();
        drivers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(drivers)
    }

    async fn update_driver(&self, driver: Driver) -> Result<Driver, AppError> {
        let mut inner = self.inner.lock().await;
        if !inner.drivers.contains_key(&driver.id) {
            return Err(AppError::NotFound("Driver not found".to_string()));
        }
        inner.drivers.insert(driver.id, driver.clone());
        Ok(driver)
    }

    async fn driver_employee_id_exists(&self, employee_id: &str) -> Result<bool, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .drivers
            .values()
            .any(|d| d.employee_id == employee_id))
    }

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.trips.get(&id).cloned())
    }

    async fn list_trips(&self, filter: TripFilter) -> Result<Vec<Trip>, AppError> {
        let inner = self.inner.lock().await;
        let mut trips: Vec<Trip> = inner
            .trips
            .values()
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| filter.vehicle_id.map_or(true, |v| t.vehicle_id == v))
            .filter(|t| filter.driver_id.map_or(true, |d| t.driver_id == d))
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    async fn active_trip_exists(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
    ) -> Result<bool, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.trips.values().any(|t| {
            t.status == crate::models::TripStatus::InProgress
                && (t.vehicle_id == vehicle_id || t.driver_id == driver_id)
        }))
    }

    async fn create_trip_guarded(&self, mut trip: Trip) -> Result<Trip, AppError> {
        let mut inner = self.inner.lock().await;

        // Re-verificación dentro de la sección crítica: el veredicto del
        // validador pudo quedar obsoleto entre la lectura y este commit.
        match inner.vehicles.get(&trip.vehicle_id) {
            Some(v) if v.status == VehicleStatus::Available => {}
            _ => {
                return Err(AppError::Conflict(
                    "Vehicle is no longer available".to_string(),
                ))
            }
        }
        match inner.drivers.get(&trip.driver_id) {
            Some(d) if d.status == DriverStatus::Available => {}
            _ => {
                return Err(AppError::Conflict(
                    "Driver is no longer available".to_string(),
                ))
            }
        }

        // Un viaje no terminal reserva la pareja vehículo/conductor: de dos
        // despachos rivales exactamente uno gana.
        let already_engaged = inner.trips.values().any(|t| {
            !t.status.is_terminal()
                && (t.vehicle_id == trip.vehicle_id || t.driver_id == trip.driver_id)
        });
        if already_engaged {
            return Err(AppError::Conflict(
                "Vehicle or driver already has an open trip".to_string(),
            ));
        }

        let seq = self.trip_seq.fetch_add(1, Ordering::SeqCst) + 1;
        trip.trip_number = format_trip_number(seq);
        log::debug!("Trip {} reserved for vehicle {}", trip.trip_number, trip.vehicle_id);

        inner.trips.insert(trip.id, trip.clone());
        Ok(trip)
    }

    async fn insert_maintenance(&self, log: MaintenanceLog) -> Result<MaintenanceLog, AppError> {
        let mut inner = self.inner.lock().await;
        inner.maintenance.insert(log.id, log.clone());
        Ok(log)
    }

    async fn find_maintenance(&self, id: Uuid) -> Result<Option<MaintenanceLog>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.maintenance.get(&id).cloned())
    }

    async fn list_maintenance(
        &self,
        vehicle_id: Option<Uuid>,
        status: Option<MaintenanceStatus>,
    ) -> Result<Vec<MaintenanceLog>, AppError> {
        let inner = self.inner.lock().await;
        let mut logs: Vec<MaintenanceLog> = inner
            .maintenance
            .values()
            .filter(|m| vehicle_id.map_or(true, |v| m.vehicle_id == v))
            .filter(|m| status.map_or(true, |s| m.status == s))
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(logs)
    }

    async fn commit_transition(&self, commit: TransitionCommit) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        let now = Utc::now();

        // Fase 1: verificar todas las precondiciones sin tocar nada
        if let Some(write) = &commit.trip {
            match inner.trips.get(&write.trip.id) {
                Some(current) if current.status == write.expected => {}
                Some(current) => {
                    return Err(AppError::Conflict(format!(
                        "Trip is no longer {} (found {})",
                        write.expected.label(),
                        current.status.label()
                    )))
                }
                None => return Err(AppError::Conflict("Trip no longer exists".to_string())),
            }
        }
        if let Some(write) = &commit.maintenance {
            match inner.maintenance.get(&write.log.id) {
                Some(current) if current.status == write.expected => {}
                Some(current) => {
                    return Err(AppError::Conflict(format!(
                        "Maintenance log is no longer {} (found {})",
                        write.expected.label(),
                        current.status.label()
                    )))
                }
                None => {
                    return Err(AppError::Conflict(
                        "Maintenance log no longer exists".to_string(),
                    ))
                }
            }
        }
        if let Some(write) = &commit.vehicle {
            match inner.vehicles.get(&write.vehicle_id) {
                Some(current) => {
                    if let Some(expected) = write.expected {
                        if current.status != expected {
                            return Err(AppError::Conflict(format!(
                                "Vehicle is no longer {} (found {})",
                                expected.label(),
                                current.status.label()
                            )));
                        }
                    }
                }
                None => return Err(AppError::Conflict("Vehicle no longer exists".to_string())),
            }
        }
        if let Some(write) = &commit.driver {
            match inner.drivers.get(&write.driver_id) {
                Some(current) => {
                    if let Some(expected) = write.expected {
                        if current.status != expected {
                            return Err(AppError::Conflict(format!(
                                "Driver is no longer {} (found {})",
                                expected.label(),
                                current.status.label()
                            )));
                        }
                    }
                }
                None => return Err(AppError::Conflict("Driver no longer exists".to_string())),
            }
        }

        // Fase 2: aplicar todo; ya no puede fallar
        if let Some(write) = commit.trip {
            inner.trips.insert(write.trip.id, write.trip);
        }
        if let Some(write) = commit.maintenance {
            inner.maintenance.insert(write.log.id, write.log);
        }
        if let Some(write) = commit.vehicle {
            if let Some(vehicle) = inner.vehicles.get_mut(&write.vehicle_id) {
                vehicle.status = write.status;
                if let Some(mileage) = write.mileage {
                    vehicle.current_mileage = mileage;
                }
                if let Some(next) = write.next_service_mileage {
                    vehicle.next_service_mileage = Some(next);
                }
                vehicle.updated_at = now;
            }
        }
        if let Some(write) = commit.driver {
            if let Some(driver) = inner.drivers.get_mut(&write.driver_id) {
                driver.status = write.status;
                driver.total_trips += write.add_trips;
                driver.total_distance_km += write.add_distance_km;
                driver.updated_at = now;
            }
        }

        Ok(())
    }
}
