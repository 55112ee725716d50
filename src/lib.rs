//! Fleet Dispatch - motor de despacho y coordinación de estados de flota
//!
//! Valida despachos contra capacidad, cumplimiento documental y
//! disponibilidad de recursos, y mantiene las máquinas de estados de
//! Trip y MaintenanceLog sincronizadas con los estados de Vehicle y
//! Driver mediante transiciones atómicas.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
