pub mod common;
pub mod driver_dto;
pub mod maintenance_dto;
pub mod trip_dto;
pub mod vehicle_dto;
