//! DTOs de Trip y del veredicto de despacho

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Trip, TripStatus};

/// Request de validación de despacho (solo lectura, nunca muta estado)
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateDispatchRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub cargo_weight_kg: f64,
}

/// Veredicto agregado: toda violación encontrada, nunca solo la primera
#[derive(Debug, Clone, Serialize)]
pub struct DispatchVerdict {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl DispatchVerdict {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Request para despachar un viaje nuevo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,

    #[validate(length(min = 3, max = 255))]
    pub origin: String,

    #[validate(length(min = 3, max = 255))]
    pub destination: String,

    #[validate(length(min = 3, max = 255))]
    pub cargo_description: String,

    #[validate(range(min = 0.0))]
    pub cargo_weight_kg: f64,

    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Request para arrancar un viaje programado
#[derive(Debug, Deserialize, Validate)]
pub struct StartTripRequest {
    #[validate(range(min = 0))]
    pub start_mileage: i64,
}

/// Request para completar un viaje en curso
///
/// `end_mileage` es opcional: sin él la distancia queda sin calcular.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompleteTripRequest {
    #[validate(range(min = 0))]
    pub end_mileage: Option<i64>,
    pub notes: Option<String>,
}

/// Request para cancelar un viaje
#[derive(Debug, Deserialize, Validate)]
pub struct CancelTripRequest {
    #[validate(length(min = 3, max = 500))]
    pub reason: String,
}

/// Filtros de listado de viajes
#[derive(Debug, Default, Deserialize)]
pub struct TripListQuery {
    pub status: Option<TripStatus>,
    pub vehicle: Option<Uuid>,
    pub driver: Option<Uuid>,
}

/// Response de viaje con la duración real calculada
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
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
    pub duration_hours: Option<f64>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        let duration_hours = match (trip.actual_departure, trip.actual_arrival) {
            (Some(departure), Some(arrival)) => {
                Some((arrival - departure).num_seconds() as f64 / 3600.0)
            }
            _ => None,
        };
        Self {
            id: trip.id,
            trip_number: trip.trip_number,
            vehicle_id: trip.vehicle_id,
            driver_id: trip.driver_id,
            dispatched_by: trip.dispatched_by,
            origin: trip.origin,
            destination: trip.destination,
            cargo_description: trip.cargo_description,
            cargo_weight_kg: trip.cargo_weight_kg,
            status: trip.status,
            scheduled_departure: trip.scheduled_departure,
            scheduled_arrival: trip.scheduled_arrival,
            actual_departure: trip.actual_departure,
            actual_arrival: trip.actual_arrival,
            start_mileage: trip.start_mileage,
            end_mileage: trip.end_mileage,
            distance_km: trip.distance_km,
            duration_hours,
            notes: trip.notes,
            cancellation_reason: trip.cancellation_reason,
            created_at: trip.created_at,
        }
    }
}
