//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su máquina de estados.
//! Mapea exactamente a la tabla vehicles del schema PostgreSQL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
///
/// `OnTrip` e `InService` son estados de ocupación: reflejan el viaje o
/// mantenimiento activo que posee el recurso en este momento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    OnTrip,
    InService,
    Retired,
}

impl VehicleStatus {
    /// Etiqueta legible para mensajes de validación ("on trip", no "on_trip")
    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::OnTrip => "on trip",
            VehicleStatus::InService => "in service",
            VehicleStatus::Retired => "retired",
        }
    }

    /// Estados que un operador puede fijar a mano; la ocupación
    /// (`OnTrip`/`InService`) solo la escriben los controladores de ciclo de vida.
    pub fn is_manually_assignable(&self) -> bool {
        matches!(self, VehicleStatus::Available | VehicleStatus::Retired)
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: String,
    pub capacity_kg: f64,
    pub status: VehicleStatus,
    pub fuel_type: String,
    pub current_mileage: i64,
    pub next_service_mileage: Option<i64>,
    pub insurance_expiry: DateTime<Utc>,
    pub registration_expiry: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn is_insurance_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.insurance_expiry > now
    }

    pub fn is_registration_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.registration_expiry > now
    }

    pub fn is_compliant_at(&self, now: DateTime<Utc>) -> bool {
        self.is_insurance_valid_at(now) && self.is_registration_valid_at(now)
    }
}
