//! DTOs de MaintenanceLog

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::MaintenanceStatus;

/// Request para programar un mantenimiento
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    pub vehicle_id: Uuid,

    #[validate(length(min = 3, max = 30))]
    pub maintenance_type: String,

    #[validate(length(min = 3, max = 500))]
    pub description: String,

    #[validate(range(min = 0))]
    pub mileage_at_service: i64,

    pub scheduled_date: DateTime<Utc>,
    pub vendor: Option<String>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
}

/// Request para completar un mantenimiento en curso
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompleteMaintenanceRequest {
    pub cost: Option<Decimal>,
    pub technician_name: Option<String>,
    pub invoice_number: Option<String>,
    #[validate(range(min = 0))]
    pub next_service_mileage: Option<i64>,
    pub notes: Option<String>,
}

/// Filtros de listado de mantenimientos
#[derive(Debug, Default, Deserialize)]
pub struct MaintenanceListQuery {
    pub vehicle: Option<Uuid>,
    pub status: Option<MaintenanceStatus>,
}
