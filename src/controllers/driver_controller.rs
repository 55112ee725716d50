//! Controller CRUD de Driver

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::driver_dto::{CreateDriverRequest, DriverResponse, UpdateDriverRequest};
use crate::models::{Driver, DriverStatus};
use crate::repositories::FleetStore;
use crate::utils::errors::AppError;

pub struct DriverController {
    store: Arc<dyn FleetStore>,
}

impl DriverController {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        request: CreateDriverRequest,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate()?;

        if self
            .store
            .driver_employee_id_exists(&request.employee_id)
            .await?
        {
            return Err(AppError::Conflict(
                "Employee ID is already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let driver = Driver {
            id: Uuid::new_v4(),
            employee_id: request.employee_id,
            name: request.name,
            email: request.email.to_lowercase(),
            phone: request.phone,
            license_number: request.license_number,
            license_class: request.license_class.to_uppercase(),
            license_expiry: request.license_expiry,
            status: DriverStatus::Available,
            hire_date: request.hire_date,
            total_trips: 0,
            total_distance_km: 0,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };

        let driver = self.store.insert_driver(driver).await?;
        Ok(ApiResponse::success_with_message(
            DriverResponse::from_driver(driver, now),
            "Driver registered".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<DriverResponse, AppError> {
        let driver = self
            .store
            .find_driver(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;
        Ok(DriverResponse::from_driver(driver, Utc::now()))
    }

    pub async fn list(&self) -> Result<Vec<DriverResponse>, AppError> {
        let now = Utc::now();
        let drivers = self.store.list_drivers().await?;
        Ok(drivers
            .into_iter()
            .map(|d| DriverResponse::from_driver(d, now))
            .collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateDriverRequest,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate()?;

        let mut driver = self
            .store
            .find_driver(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

        if let Some(status) = request.status {
            // on_trip solo lo escribe el controlador de viajes
            if !status.is_manually_assignable() {
                return Err(AppError::BadRequest(format!(
                    "Driver status cannot be set to {} manually",
                    status.label()
                )));
            }
            if driver.status == DriverStatus::OnTrip {
                return Err(AppError::Conflict(
                    "Driver is currently on trip and cannot be edited".to_string(),
                ));
            }
            driver.status = status;
        }
        if let Some(name) = request.name {
            driver.name = name;
        }
        if let Some(email) = request.email {
            driver.email = email.to_lowercase();
        }
        if let Some(phone) = request.phone {
            driver.phone = phone;
        }
        if let Some(license_expiry) = request.license_expiry {
            driver.license_expiry = license_expiry;
        }
        if request.notes.is_some() {
            driver.notes = request.notes;
        }

        let driver = self.store.update_driver(driver).await?;
        Ok(ApiResponse::success_with_message(
            DriverResponse::from_driver(driver, Utc::now()),
            "Driver updated".to_string(),
        ))
    }
}
