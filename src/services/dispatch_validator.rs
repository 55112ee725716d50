//! Validador de despacho
//!
//! Ejecuta todas las reglas de negocio independientes y acumula cada
//! violación en lugar de cortar en la primera: el despachador ve la lista
//! completa de remediación en una sola vuelta. Solo lectura: nunca muta
//! Vehicle, Driver ni Trip.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::trip_dto::DispatchVerdict;
use crate::models::{DriverStatus, VehicleStatus};
use crate::repositories::FleetStore;
use crate::services::compliance::{driver_compliance_at, vehicle_compliance_at};
use crate::utils::errors::AppError;

pub struct DispatchValidator {
    store: Arc<dyn FleetStore>,
}

impl DispatchValidator {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    /// Veredicto agregado de despacho. Un `Err` aquí es solo fallo de
    /// infraestructura; las violaciones de reglas van dentro del veredicto.
    pub async fn validate(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
        cargo_weight_kg: f64,
    ) -> Result<DispatchVerdict, AppError> {
        let now = Utc::now();
        let mut errors = Vec::new();

        match self.store.find_vehicle(vehicle_id).await? {
            None => errors.push("Vehicle not found".to_string()),
            Some(vehicle) => {
                if vehicle.status != VehicleStatus::Available {
                    errors.push(format!("Vehicle is currently {}", vehicle.status.label()));
                }
                if cargo_weight_kg > vehicle.capacity_kg {
                    errors.push(format!(
                        "Cargo weight ({}kg) exceeds vehicle capacity ({}kg)",
                        cargo_weight_kg, vehicle.capacity_kg
                    ));
                }
                let compliance = vehicle_compliance_at(&vehicle, now);
                if !compliance.is_insurance_valid {
                    errors.push("Vehicle insurance has expired".to_string());
                }
                if !compliance.is_registration_valid {
                    errors.push("Vehicle registration has expired".to_string());
                }
            }
        }

        match self.store.find_driver(driver_id).await? {
            None => errors.push("Driver not found".to_string()),
            Some(driver) => {
                if driver.status != DriverStatus::Available {
                    errors.push(format!("Driver is currently {}", driver.status.label()));
                }
                if !driver_compliance_at(&driver, now).is_license_valid {
                    errors.push("Driver license has expired".to_string());
                }
            }
        }

        if self.store.active_trip_exists(vehicle_id, driver_id).await? {
            errors.push("Vehicle or driver already has an active trip".to_string());
        }

        if !errors.is_empty() {
            tracing::debug!(
                vehicle_id = %vehicle_id,
                driver_id = %driver_id,
                violations = errors.len(),
                "Dispatch validation failed"
            );
        }

        Ok(DispatchVerdict::from_errors(errors))
    }
}
