//! Modelo de MaintenanceLog
//!
//! Máquina de estados análoga a la de Trip pero atada a un solo vehículo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del mantenimiento - mapea al ENUM maintenance_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "maintenance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn can_transition_to(self, next: MaintenanceStatus) -> bool {
        matches!(
            (self, next),
            (MaintenanceStatus::Scheduled, MaintenanceStatus::InProgress)
                | (MaintenanceStatus::Scheduled, MaintenanceStatus::Cancelled)
                | (MaintenanceStatus::InProgress, MaintenanceStatus::Completed)
                | (MaintenanceStatus::InProgress, MaintenanceStatus::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MaintenanceStatus::Completed | MaintenanceStatus::Cancelled
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::InProgress => "in progress",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
        }
    }
}

/// MaintenanceLog principal - mapea exactamente a la tabla maintenance_logs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceLog {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub maintenance_type: String,
    pub description: String,
    pub status: MaintenanceStatus,
    pub mileage_at_service: i64,
    pub next_service_mileage: Option<i64>,
    pub scheduled_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub vendor: Option<String>,
    pub cost: Decimal,
    pub technician_name: Option<String>,
    pub invoice_number: Option<String>,
    pub logged_by: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use MaintenanceStatus::*;

        assert!(Scheduled.can_transition_to(InProgress));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));

        assert!(!Scheduled.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Cancelled.can_transition_to(InProgress));
    }
}
