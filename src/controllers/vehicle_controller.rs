//! Controller CRUD de Vehicle
//!
//! Gestión de registros al margen del motor: alta, consulta y edición.
//! La ocupación (`on_trip`/`in_service`) nunca se escribe desde aquí.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleComplianceResponse, VehicleResponse,
};
use crate::models::{Vehicle, VehicleStatus};
use crate::repositories::FleetStore;
use crate::services::compliance::vehicle_compliance_at;
use crate::utils::errors::AppError;

pub struct VehicleController {
    store: Arc<dyn FleetStore>,
}

impl VehicleController {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        if self
            .store
            .vehicle_plate_exists(&request.plate_number)
            .await?
        {
            return Err(AppError::Conflict(
                "Plate number is already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            plate_number: request.plate_number.to_uppercase(),
            make: request.make,
            model: request.model,
            year: request.year,
            vehicle_type: request.vehicle_type,
            capacity_kg: request.capacity_kg,
            status: VehicleStatus::Available,
            fuel_type: request.fuel_type.unwrap_or_else(|| "diesel".to_string()),
            current_mileage: request.current_mileage.unwrap_or(0),
            next_service_mileage: None,
            insurance_expiry: request.insurance_expiry,
            registration_expiry: request.registration_expiry,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };

        let vehicle = self.store.insert_vehicle(vehicle).await?;
        Ok(ApiResponse::success_with_message(
            VehicleResponse::from_vehicle(vehicle, now),
            "Vehicle registered".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;
        Ok(VehicleResponse::from_vehicle(vehicle, Utc::now()))
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let now = Utc::now();
        let vehicles = self.store.list_vehicles().await?;
        Ok(vehicles
            .into_iter()
            .map(|v| VehicleResponse::from_vehicle(v, now))
            .collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let mut vehicle = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if let Some(status) = request.status {
            // La ocupación la escriben los controladores de ciclo de vida
            if !status.is_manually_assignable() {
                return Err(AppError::BadRequest(format!(
                    "Vehicle status cannot be set to {} manually",
                    status.label()
                )));
            }
            if !vehicle.status.is_manually_assignable() {
                return Err(AppError::Conflict(format!(
                    "Vehicle is currently {} and cannot be edited",
                    vehicle.status.label()
                )));
            }
            vehicle.status = status;
        }
        if let Some(plate) = request.plate_number {
            vehicle.plate_number = plate.to_uppercase();
        }
        if let Some(make) = request.make {
            vehicle.make = make;
        }
        if let Some(model) = request.model {
            vehicle.model = model;
        }
        if let Some(fuel_type) = request.fuel_type {
            vehicle.fuel_type = fuel_type;
        }
        if let Some(mileage) = request.current_mileage {
            vehicle.current_mileage = mileage;
        }
        if let Some(insurance_expiry) = request.insurance_expiry {
            vehicle.insurance_expiry = insurance_expiry;
        }
        if let Some(registration_expiry) = request.registration_expiry {
            vehicle.registration_expiry = registration_expiry;
        }
        if request.notes.is_some() {
            vehicle.notes = request.notes;
        }

        let vehicle = self.store.update_vehicle(vehicle).await?;
        Ok(ApiResponse::success_with_message(
            VehicleResponse::from_vehicle(vehicle, Utc::now()),
            "Vehicle updated".to_string(),
        ))
    }

    /// Snapshot de cumplimiento para reporting
    pub async fn compliance(&self, id: Uuid) -> Result<VehicleComplianceResponse, AppError> {
        let vehicle = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let now = Utc::now();
        let snapshot = vehicle_compliance_at(&vehicle, now);
        Ok(VehicleComplianceResponse {
            vehicle_id: vehicle.id,
            plate_number: vehicle.plate_number,
            is_insurance_valid: snapshot.is_insurance_valid,
            is_registration_valid: snapshot.is_registration_valid,
            is_compliant: snapshot.is_compliant,
            insurance_expiry: vehicle.insurance_expiry,
            registration_expiry: vehicle.registration_expiry,
            checked_at: now,
        })
    }
}
