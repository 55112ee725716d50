pub mod driver_controller;
pub mod vehicle_controller;
