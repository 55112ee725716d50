//! DTOs de Vehicle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Vehicle, VehicleStatus};

/// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 3, max = 20))]
    pub plate_number: String,

    #[validate(length(min = 2, max = 100))]
    pub make: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1990, max = 2030))]
    pub year: i32,

    #[validate(length(min = 2, max = 20))]
    pub vehicle_type: String,

    #[validate(range(min = 0.0))]
    pub capacity_kg: f64,

    pub fuel_type: Option<String>,

    #[validate(range(min = 0))]
    pub current_mileage: Option<i64>,

    pub insurance_expiry: DateTime<Utc>,
    pub registration_expiry: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Request para actualizar un vehículo
///
/// El estado solo admite valores asignables a mano (`available`/`retired`);
/// la ocupación la escriben los controladores de ciclo de vida.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 3, max = 20))]
    pub plate_number: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub status: Option<VehicleStatus>,
    pub fuel_type: Option<String>,
    #[validate(range(min = 0))]
    pub current_mileage: Option<i64>,
    pub insurance_expiry: Option<DateTime<Utc>>,
    pub registration_expiry: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Response de vehículo con su ventana de cumplimiento calculada
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub plate_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub capacity_kg: f64,
    pub status: VehicleStatus,
    pub fuel_type: String,
    pub current_mileage: i64,
    pub next_service_mileage: Option<i64>,
    pub insurance_expiry: DateTime<Utc>,
    pub registration_expiry: DateTime<Utc>,
    pub is_insurance_valid: bool,
    pub is_registration_valid: bool,
    pub is_compliant: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl VehicleResponse {
    pub fn from_vehicle(vehicle: Vehicle, now: DateTime<Utc>) -> Self {
        let is_insurance_valid = vehicle.is_insurance_valid_at(now);
        let is_registration_valid = vehicle.is_registration_valid_at(now);
        Self {
            id: vehicle.id,
            plate_number: vehicle.plate_number,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            vehicle_type: vehicle.vehicle_type,
            capacity_kg: vehicle.capacity_kg,
            status: vehicle.status,
            fuel_type: vehicle.fuel_type,
            current_mileage: vehicle.current_mileage,
            next_service_mileage: vehicle.next_service_mileage,
            insurance_expiry: vehicle.insurance_expiry,
            registration_expiry: vehicle.registration_expiry,
            is_insurance_valid,
            is_registration_valid,
            is_compliant: is_insurance_valid && is_registration_valid,
            notes: vehicle.notes,
            created_at: vehicle.created_at,
        }
    }
}

/// Snapshot de cumplimiento para reporting
#[derive(Debug, Serialize)]
pub struct VehicleComplianceResponse {
    pub vehicle_id: Uuid,
    pub plate_number: String,
    pub is_insurance_valid: bool,
    pub is_registration_valid: bool,
    pub is_compliant: bool,
    pub insurance_expiry: DateTime<Utc>,
    pub registration_expiry: DateTime<Utc>,
    pub checked_at: DateTime<Utc>,
}
