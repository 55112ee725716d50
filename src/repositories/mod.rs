//! Capa de persistencia
//!
//! `FleetStore` es la interfaz transaccional que consume el motor de despacho:
//! búsquedas atómicas, inserción protegida de viajes y commits todo-o-nada de
//! transiciones multi-entidad con precondición de estado (compare-and-swap).
//! Dos implementaciones: PostgreSQL (sqlx) y memoria (para tests y arranque
//! sin base de datos).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryFleetStore;
pub use postgres::PgFleetStore;

use crate::models::{
    Driver, DriverStatus, MaintenanceLog, MaintenanceStatus, Trip, TripStatus, Vehicle,
    VehicleStatus,
};
use crate::utils::errors::AppError;

/// Reescritura completa del viaje, condicionada a su estado actual
#[derive(Debug, Clone)]
pub struct TripWrite {
    pub trip: Trip,
    pub expected: TripStatus,
}

/// Reescritura completa del log de mantenimiento, condicionada a su estado actual
#[derive(Debug, Clone)]
pub struct MaintenanceWrite {
    pub log: MaintenanceLog,
    pub expected: MaintenanceStatus,
}

/// Escritura de estado de vehículo.
///
/// `expected = Some(..)` exige que el estado persistido siga siendo ese en el
/// momento del commit (enganche de recurso); `None` escribe sin condición
/// (liberación de recurso).
#[derive(Debug, Clone)]
pub struct VehicleWrite {
    pub vehicle_id: Uuid,
    pub expected: Option<VehicleStatus>,
    pub status: VehicleStatus,
    pub mileage: Option<i64>,
    pub next_service_mileage: Option<i64>,
}

/// Escritura de estado de conductor, con incrementos de acumulados
#[derive(Debug, Clone)]
pub struct DriverWrite {
    pub driver_id: Uuid,
    pub expected: Option<DriverStatus>,
    pub status: DriverStatus,
    pub add_trips: i32,
    pub add_distance_km: i64,
}

/// Unidad atómica de transición: todas las escrituras se aplican juntas o
/// ninguna. Cualquier precondición fallida produce `AppError::Conflict` y deja
/// cada entidad exactamente como estaba.
#[derive(Debug, Clone, Default)]
pub struct TransitionCommit {
    pub trip: Option<TripWrite>,
    pub maintenance: Option<MaintenanceWrite>,
    pub vehicle: Option<VehicleWrite>,
    pub driver: Option<DriverWrite>,
}

/// Filtros de listado de viajes
#[derive(Debug, Clone, Copy, Default)]
pub struct TripFilter {
    pub status: Option<TripStatus>,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
}

#[async_trait]
pub trait FleetStore: Send + Sync {
    // --- Vehículos ---
    async fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError>;
    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError>;
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError>;
    async fn update_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError>;
    async fn vehicle_plate_exists(&self, plate_number: &str) -> Result<bool, AppError>;

    // --- Conductores ---
    async fn insert_driver(&self, driver: Driver) -> Result<Driver, AppError>;
    async fn find_driver(&self, id: Uuid) -> Result<Option<Driver>, AppError>;
    async fn list_drivers(&self) -> Result<Vec<Driver>, AppError>;
    async fn update_driver(&self, driver: Driver) -> Result<Driver, AppError>;
    async fn driver_employee_id_exists(&self, employee_id: &str) -> Result<bool, AppError>;

    // --- Viajes ---
    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError>;
    async fn list_trips(&self, filter: TripFilter) -> Result<Vec<Trip>, AppError>;

    /// ¿Existe un viaje `in_progress` que referencia a este vehículo o conductor?
    /// Es la consulta de solo lectura del validador de despacho.
    async fn active_trip_exists(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
    ) -> Result<bool, AppError>;

    /// Inserción protegida: dentro de la sección crítica del store se
    /// re-verifica que vehículo y conductor sigan `available` y que ningún
    /// viaje no terminal los referencie, se reserva el siguiente número de
    /// viaje del contador monotónico y se inserta el viaje en `scheduled`.
    /// Una petición que pierde la carrera recibe `AppError::Conflict`.
    async fn create_trip_guarded(&self, trip: Trip) -> Result<Trip, AppError>;

    // --- Mantenimiento ---
    async fn insert_maintenance(&self, log: MaintenanceLog) -> Result<MaintenanceLog, AppError>;
    async fn find_maintenance(&self, id: Uuid) -> Result<Option<MaintenanceLog>, AppError>;
    async fn list_maintenance(
        &self,
        vehicle_id: Option<Uuid>,
        status: Option<MaintenanceStatus>,
    ) -> Result<Vec<MaintenanceLog>, AppError>;

    // --- Transiciones ---
    async fn commit_transition(&self, commit: TransitionCommit) -> Result<(), AppError>;
}
