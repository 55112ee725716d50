//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod driver;
pub mod maintenance;
pub mod trip;
pub mod vehicle;

pub use driver::{Driver, DriverStatus};
pub use maintenance::{MaintenanceLog, MaintenanceStatus};
pub use trip::{format_trip_number, Trip, TripStatus};
pub use vehicle::{Vehicle, VehicleStatus};
