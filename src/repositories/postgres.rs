//! Implementación PostgreSQL de `FleetStore`
//!
//! Cada transición multi-entidad se aplica en una sola transacción SQL con
//! UPDATEs condicionados al estado esperado (`WHERE status = $expected`); si
//! alguno no afecta filas la transacción se revierte con `Conflict`. Los
//! números de viaje salen de la secuencia trip_number_seq. El schema vive en
//! migrations/0001_init.sql.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    format_trip_number, Driver, DriverStatus, MaintenanceLog, MaintenanceStatus, Trip, Vehicle,
    VehicleStatus,
};
use crate::repositories::{FleetStore, TransitionCommit, TripFilter};
use crate::utils::errors::AppError;

pub struct PgFleetStore {
    pool: PgPool,
}

impl PgFleetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FleetStore for PgFleetStore {
    async fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let inserted = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, plate_number, make, model, year, vehicle_type, capacity_kg,
                                  status, fuel_type, current_mileage, next_service_mileage,
                                  insurance_expiry, registration_expiry, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.plate_number)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.vehicle_type)
        .bind(vehicle.capacity_kg)
        .bind(vehicle.status)
        .bind(&vehicle.fuel_type)
        .bind(vehicle.current_mileage)
        .bind(vehicle.next_service_mileage)
        .bind(vehicle.insurance_expiry)
        .bind(vehicle.registration_expiry)
        .bind(&vehicle.notes)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vehicle)
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(vehicles)
    }

    async fn update_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET plate_number = $2, make = $3, model = $4, year = $5, vehicle_type = $6,
                capacity_kg = $7, status = $8, fuel_type = $9, current_mileage = $10,
                next_service_mileage = $11, insurance_expiry = $12, registration_expiry = $13,
                notes = $14, updated_at = $15
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.plate_number)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.vehicle_type)
        .bind(vehicle.capacity_kg)
        .bind(vehicle.status)
        .bind(&vehicle.fuel_type)
        .bind(vehicle.current_mileage)
        .bind(vehicle.next_service_mileage)
        .bind(vehicle.insurance_expiry)
        .bind(vehicle.registration_expiry)
        .bind(&vehicle.notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
    }

    async fn vehicle_plate_exists(&self, plate_number: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE UPPER(plate_number) = UPPER($1))",
        )
        .bind(plate_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    async fn insert_driver(&self, driver: Driver) -> Result<Driver, AppError> {
        let inserted = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, employee_id, name, email, phone, license_number, license_class,
                                 license_expiry, status, hire_date, total_trips, total_distance_km,
                                 notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(driver.id)
        .bind(&driver.employee_id)
        .bind(&driver.name)
        .bind(&driver.email)
        .bind(&driver.phone)
        .bind(&driver.license_number)
        .bind(&driver.license_class)
        .bind(driver.license_expiry)
        .bind(driver.status)
        .bind(driver.hire_date)
        .bind(driver.total_trips)
        .bind(driver.total_distance_km)
        .bind(&driver.notes)
        .bind(driver.created_at)
        .bind(driver.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_driver(&self, id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(driver)
    }

    async fn list_drivers(&self) -> Result<Vec<Driver>, AppError> {
        let drivers =
            sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(drivers)
    }

    async fn update_driver(&self, driver: Driver) -> Result<Driver, AppError> {
        let updated = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET name = $2, email = $3, phone = $4, license_number = $5, license_class = $6,
                license_expiry = $7, status = $8, notes = $9, updated_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(driver.id)
        .bind(&driver.name)
        .bind(&driver.email)
        .bind(&driver.phone)
        .bind(&driver.license_number)
        .bind(&driver.license_class)
        .bind(driver.license_expiry)
        .bind(driver.status)
        .bind(&driver.notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| AppError::NotFound("Driver not found".to_string()))
    }

    async fn driver_employee_id_exists(&self, employee_id: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM drivers WHERE employee_id = $1)")
                .bind(employee_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(result.0)
    }

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(trip)
    }

    async fn list_trips(&self, filter: TripFilter) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips
            WHERE ($1::trip_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR vehicle_id = $2)
              AND ($3::uuid IS NULL OR driver_id = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.status)
        .bind(filter.vehicle_id)
        .bind(filter.driver_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(trips)
    }

    async fn active_trip_exists(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM trips
                WHERE (vehicle_id = $1 OR driver_id = $2) AND status = 'in_progress'
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    async fn create_trip_guarded(&self, mut trip: Trip) -> Result<Trip, AppError> {
        let mut tx = self.pool.begin().await?;

        // Bloquear las filas de vehículo y conductor para serializar despachos
        // rivales sobre el mismo recurso.
        let vehicle: Option<(VehicleStatus,)> =
            sqlx::query_as("SELECT status FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(trip.vehicle_id)
                .fetch_optional(&mut *tx)
                .await?;
        match vehicle {
            Some((VehicleStatus::Available,)) => {}
            _ => {
                return Err(AppError::Conflict(
                    "Vehicle is no longer available".to_string(),
                ))
            }
        }

        let driver: Option<(DriverStatus,)> =
            sqlx::query_as("SELECT status FROM drivers WHERE id = $1 FOR UPDATE")
                .bind(trip.driver_id)
                .fetch_optional(&mut *tx)
                .await?;
        match driver {
            Some((DriverStatus::Available,)) => {}
            _ => {
                return Err(AppError::Conflict(
                    "Driver is no longer available".to_string(),
                ))
            }
        }

        let engaged: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM trips
                WHERE (vehicle_id = $1 OR driver_id = $2)
                  AND status IN ('scheduled', 'in_progress')
            )
            "#,
        )
        .bind(trip.vehicle_id)
        .bind(trip.driver_id)
        .fetch_one(&mut *tx)
        .await?;
        if engaged.0 {
            return Err(AppError::Conflict(
                "Vehicle or driver already has an open trip".to_string(),
            ));
        }

        let seq: (i64,) = sqlx::query_as("SELECT nextval('trip_number_seq')")
            .fetch_one(&mut *tx)
            .await?;
        trip.trip_number = format_trip_number(seq.0);

        let inserted = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (id, trip_number, vehicle_id, driver_id, dispatched_by, origin,
                               destination, cargo_description, cargo_weight_kg, status,
                               scheduled_departure, scheduled_arrival, actual_departure,
                               actual_arrival, start_mileage, end_mileage, distance_km, notes,
                               cancellation_reason, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(trip.id)
        .bind(&trip.trip_number)
        .bind(trip.vehicle_id)
        .bind(trip.driver_id)
        .bind(trip.dispatched_by)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(&trip.cargo_description)
        .bind(trip.cargo_weight_kg)
        .bind(trip.status)
        .bind(trip.scheduled_departure)
        .bind(trip.scheduled_arrival)
        .bind(trip.actual_departure)
        .bind(trip.actual_arrival)
        .bind(trip.start_mileage)
        .bind(trip.end_mileage)
        .bind(trip.distance_km)
        .bind(&trip.notes)
        .bind(&trip.cancellation_reason)
        .bind(trip.created_at)
        .bind(trip.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        log::debug!("Trip {} inserted for vehicle {}", inserted.trip_number, inserted.vehicle_id);
        Ok(inserted)
    }

    async fn insert_maintenance(&self, log: MaintenanceLog) -> Result<MaintenanceLog, AppError> {
        let inserted = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            INSERT INTO maintenance_logs (id, vehicle_id, maintenance_type, description, status,
                                          mileage_at_service, next_service_mileage, scheduled_date,
                                          completed_date, vendor, cost, technician_name,
                                          invoice_number, logged_by, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(log.id)
        .bind(log.vehicle_id)
        .bind(&log.maintenance_type)
        .bind(&log.description)
        .bind(log.status)
        .bind(log.mileage_at_service)
        .bind(log.next_service_mileage)
        .bind(log.scheduled_date)
        .bind(log.completed_date)
        .bind(&log.vendor)
        .bind(log.cost)
        .bind(&log.technician_name)
        .bind(&log.invoice_number)
        .bind(log.logged_by)
        .bind(&log.notes)
        .bind(log.created_at)
        .bind(log.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_maintenance(&self, id: Uuid) -> Result<Option<MaintenanceLog>, AppError> {
        let log = sqlx::query_as::<_, MaintenanceLog>("SELECT * FROM maintenance_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(log)
    }

    async fn list_maintenance(
        &self,
        vehicle_id: Option<Uuid>,
        status: Option<MaintenanceStatus>,
    ) -> Result<Vec<MaintenanceLog>, AppError> {
        let logs = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            SELECT * FROM maintenance_logs
            WHERE ($1::uuid IS NULL OR vehicle_id = $1)
              AND ($2::maintenance_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(vehicle_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    async fn commit_transition(&self, commit: TransitionCommit) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        if let Some(write) = &commit.trip {
            let result = sqlx::query(
                r#"
                UPDATE trips
                SET status = $2, actual_departure = $3, actual_arrival = $4, start_mileage = $5,
                    end_mileage = $6, distance_km = $7, notes = $8, cancellation_reason = $9,
                    updated_at = $10
                WHERE id = $1 AND status = $11
                "#,
            )
            .bind(write.trip.id)
            .bind(write.trip.status)
            .bind(write.trip.actual_departure)
            .bind(write.trip.actual_arrival)
            .bind(write.trip.start_mileage)
            .bind(write.trip.end_mileage)
            .bind(write.trip.distance_km)
            .bind(&write.trip.notes)
            .bind(&write.trip.cancellation_reason)
            .bind(now)
            .bind(write.expected)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::Conflict(format!(
                    "Trip is no longer {}",
                    write.expected.label()
                )));
            }
        }

        if let Some(write) = &commit.maintenance {
            let result = sqlx::query(
                r#"
                UPDATE maintenance_logs
                SET status = $2, completed_date = $3, cost = $4, technician_name = $5,
                    invoice_number = $6, next_service_mileage = $7, notes = $8, updated_at = $9
                WHERE id = $1 AND status = $10
                "#,
            )
            .bind(write.log.id)
            .bind(write.log.status)
            .bind(write.log.completed_date)
            .bind(write.log.cost)
            .bind(&write.log.technician_name)
            .bind(&write.log.invoice_number)
            .bind(write.log.next_service_mileage)
            .bind(&write.log.notes)
            .bind(now)
            .bind(write.expected)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::Conflict(format!(
                    "Maintenance log is no longer {}",
                    write.expected.label()
                )));
            }
        }

        if let Some(write) = &commit.vehicle {
            let result = sqlx::query(
                r#"
                UPDATE vehicles
                SET status = $2,
                    current_mileage = COALESCE($3, current_mileage),
                    next_service_mileage = COALESCE($4, next_service_mileage),
                    updated_at = $5
                WHERE id = $1 AND ($6::vehicle_status IS NULL OR status = $6)
                "#,
            )
            .bind(write.vehicle_id)
            .bind(write.status)
            .bind(write.mileage)
            .bind(write.next_service_mileage)
            .bind(now)
            .bind(write.expected)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::Conflict(match write.expected {
                    Some(expected) => format!("Vehicle is no longer {}", expected.label()),
                    None => "Vehicle no longer exists".to_string(),
                }));
            }
        }

        if let Some(write) = &commit.driver {
            let result = sqlx::query(
                r#"
                UPDATE drivers
                SET status = $2,
                    total_trips = total_trips + $3,
                    total_distance_km = total_distance_km + $4,
                    updated_at = $5
                WHERE id = $1 AND ($6::driver_status IS NULL OR status = $6)
                "#,
            )
            .bind(write.driver_id)
            .bind(write.status)
            .bind(write.add_trips)
            .bind(write.add_distance_km)
            .bind(now)
            .bind(write.expected)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::Conflict(match write.expected {
                    Some(expected) => format!("Driver is no longer {}", expected.label()),
                    None => "Driver no longer exists".to_string(),
                }));
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
