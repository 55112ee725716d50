//! Modelo de Trip
//!
//! Este módulo contiene el struct Trip y su máquina de estados explícita.
//! Un viaje se crea una sola vez, avanza monotónicamente por la tabla de
//! transiciones y nunca se borra: completed/cancelled son registros de
//! auditoría permanentes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del viaje - mapea al ENUM trip_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "trip_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Tabla de transiciones: cualquier par no declarado aquí se rechaza
    /// antes de llegar a la persistencia.
    pub fn can_transition_to(self, next: TripStatus) -> bool {
        matches!(
            (self, next),
            (TripStatus::Scheduled, TripStatus::InProgress)
                | (TripStatus::Scheduled, TripStatus::Cancelled)
                | (TripStatus::InProgress, TripStatus::Completed)
                | (TripStatus::InProgress, TripStatus::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TripStatus::Scheduled => "scheduled",
            TripStatus::InProgress => "in progress",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

/// Trip principal - mapea exactamente a la tabla trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    /// Número secuencial legible (TRP-000042), estrictamente creciente
    /// en toda la historia del sistema, nunca reutilizado.
    pub trip_number: String,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub dispatched_by: Uuid,
    pub origin: String,
    pub destination: String,
    pub cargo_description: String,
    pub cargo_weight_kg: f64,
    pub status: TripStatus,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub actual_arrival: Option<DateTime<Utc>>,
    pub start_mileage: Option<i64>,
    pub end_mileage: Option<i64>,
    pub distance_km: Option<i64>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Formatear el número de viaje a partir del contador monotónico
pub fn format_trip_number(seq: i64) -> String {
    format!("TRP-{:06}", seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use TripStatus::*;

        assert!(Scheduled.can_transition_to(InProgress));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));

        // Transiciones no declaradas
        assert!(!Scheduled.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Scheduled));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Scheduled));
        assert!(!Cancelled.can_transition_to(InProgress));
    }

    #[test]
    fn test_terminal_states() {
        assert!(TripStatus::Completed.is_terminal());
        assert!(TripStatus::Cancelled.is_terminal());
        assert!(!TripStatus::Scheduled.is_terminal());
        assert!(!TripStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_trip_number_format() {
        assert_eq!(format_trip_number(1), "TRP-000001");
        assert_eq!(format_trip_number(42), "TRP-000042");
        assert_eq!(format_trip_number(1234567), "TRP-1234567");
    }
}
