//! DTOs de Driver

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Driver, DriverStatus};

/// Request para registrar un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 3, max = 20))]
    pub employee_id: String,

    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 7, max = 20))]
    pub phone: String,

    #[validate(length(min = 3, max = 30))]
    pub license_number: String,

    #[validate(length(min = 1, max = 1))]
    pub license_class: String,

    pub license_expiry: DateTime<Utc>,
    pub hire_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Request para actualizar un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<DriverStatus>,
    pub license_expiry: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Response de conductor con la validez de su licencia calculada
#[derive(Debug, Serialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub license_class: String,
    pub license_expiry: DateTime<Utc>,
    pub is_license_valid: bool,
    pub status: DriverStatus,
    pub hire_date: DateTime<Utc>,
    pub total_trips: i32,
    pub total_distance_km: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DriverResponse {
    pub fn from_driver(driver: Driver, now: DateTime<Utc>) -> Self {
        let is_license_valid = driver.is_license_valid_at(now);
        Self {
            id: driver.id,
            employee_id: driver.employee_id,
            name: driver.name,
            email: driver.email,
            phone: driver.phone,
            license_number: driver.license_number,
            license_class: driver.license_class,
            license_expiry: driver.license_expiry,
            is_license_valid,
            status: driver.status,
            hire_date: driver.hire_date,
            total_trips: driver.total_trips,
            total_distance_km: driver.total_distance_km,
            notes: driver.notes,
            created_at: driver.created_at,
        }
    }
}
