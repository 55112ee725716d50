//! Reloj de cumplimiento
//!
//! Evaluación pura de la validez documental (seguro, matrícula, licencia)
//! contra un instante explícito. Sin efectos secundarios y sin condiciones
//! de error: los servicios pasan `Utc::now()` y los tests pasan el instante
//! que necesiten.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Driver, Vehicle};

/// Ventana de cumplimiento de un vehículo en un instante dado
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VehicleCompliance {
    pub is_insurance_valid: bool,
    pub is_registration_valid: bool,
    pub is_compliant: bool,
}

/// Ventana de cumplimiento de un conductor en un instante dado
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DriverCompliance {
    pub is_license_valid: bool,
}

pub fn vehicle_compliance_at(vehicle: &Vehicle, now: DateTime<Utc>) -> VehicleCompliance {
    let is_insurance_valid = vehicle.is_insurance_valid_at(now);
    let is_registration_valid = vehicle.is_registration_valid_at(now);
    VehicleCompliance {
        is_insurance_valid,
        is_registration_valid,
        is_compliant: is_insurance_valid && is_registration_valid,
    }
}

pub fn driver_compliance_at(driver: &Driver, now: DateTime<Utc>) -> DriverCompliance {
    DriverCompliance {
        is_license_valid: driver.is_license_valid_at(now),
    }
}
