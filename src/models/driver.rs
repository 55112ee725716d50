//! Modelo de Driver
//!
//! Este módulo contiene el struct Driver con sus acumulados de servicio
//! (total_trips, total_distance_km) que mantienen los controladores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del conductor - mapea al ENUM driver_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "driver_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    OnTrip,
    OffDuty,
    Suspended,
}

impl DriverStatus {
    /// Etiqueta legible para mensajes de validación
    pub fn label(&self) -> &'static str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::OnTrip => "on trip",
            DriverStatus::OffDuty => "off duty",
            DriverStatus::Suspended => "suspended",
        }
    }

    /// `OnTrip` solo lo escribe el controlador de viajes
    pub fn is_manually_assignable(&self) -> bool {
        !matches!(self, DriverStatus::OnTrip)
    }
}

/// Driver principal - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub license_class: String,
    pub license_expiry: DateTime<Utc>,
    pub status: DriverStatus,
    pub hire_date: DateTime<Utc>,
    pub total_trips: i32,
    pub total_distance_km: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    pub fn is_license_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.license_expiry > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_license_validity() {
        let now = Utc::now();
        let mut driver = Driver {
            id: Uuid::new_v4(),
            employee_id: "EMP-001".to_string(),
            name: "Kwame Mensah".to_string(),
            email: "kwame@example.com".to_string(),
            phone: "+233201234567".to_string(),
            license_number: "DL-99812".to_string(),
            license_class: "C".to_string(),
            license_expiry: now + Duration::days(365),
            status: DriverStatus::Available,
            hire_date: now - Duration::days(700),
            total_trips: 0,
            total_distance_km: 0,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert!(driver.is_license_valid_at(now));

        driver.license_expiry = now - Duration::seconds(1);
        assert!(!driver.is_license_valid_at(now));
    }

    #[test]
    fn test_manual_status_guard() {
        assert!(DriverStatus::OffDuty.is_manually_assignable());
        assert!(DriverStatus::Suspended.is_manually_assignable());
        assert!(!DriverStatus::OnTrip.is_manually_assignable());
    }
}
