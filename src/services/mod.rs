//! Servicios del motor de despacho
//!
//! Aquí vive la lógica dura del sistema: el validador agregado de despacho y
//! los controladores de ciclo de vida que mantienen los estados de Vehicle y
//! Driver consistentes con los viajes y servicios que los ocupan.

pub mod compliance;
pub mod dispatch_validator;
pub mod maintenance_service;
pub mod trip_service;

pub use compliance::{driver_compliance_at, vehicle_compliance_at};
pub use dispatch_validator::DispatchValidator;
pub use maintenance_service::MaintenanceService;
pub use trip_service::TripService;
