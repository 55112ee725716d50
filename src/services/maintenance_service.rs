//! Controlador del ciclo de vida de mantenimientos
//!
//! Máquina de estados análoga a la de viajes pero que solo toca Vehicle:
//! start engancha el vehículo (available → in_service) y complete/cancel lo
//! devuelven a disponible.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::maintenance_dto::{CompleteMaintenanceRequest, CreateMaintenanceRequest};
use crate::models::{MaintenanceLog, MaintenanceStatus, VehicleStatus};
use crate::repositories::{FleetStore, MaintenanceWrite, TransitionCommit, VehicleWrite};
use crate::utils::errors::AppError;

pub struct MaintenanceService {
    store: Arc<dyn FleetStore>,
}

impl MaintenanceService {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self { store }
    }

    /// Programar un mantenimiento. El vehículo debe existir; su estado no
    /// cambia hasta que el trabajo arranca.
    pub async fn schedule(
        &self,
        request: CreateMaintenanceRequest,
        logged_by: Uuid,
    ) -> Result<MaintenanceLog, AppError> {
        request.validate()?;

        if self.store.find_vehicle(request.vehicle_id).await?.is_none() {
            return Err(AppError::NotFound("Vehicle not found".to_string()));
        }

        let now = Utc::now();
        let log = MaintenanceLog {
            id: Uuid::new_v4(),
            vehicle_id: request.vehicle_id,
            maintenance_type: request.maintenance_type,
            description: request.description,
            status: MaintenanceStatus::Scheduled,
            mileage_at_service: request.mileage_at_service,
            next_service_mileage: None,
            scheduled_date: request.scheduled_date,
            completed_date: None,
            vendor: request.vendor,
            cost: request.cost.unwrap_or(Decimal::ZERO),
            technician_name: None,
            invoice_number: None,
            logged_by,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };

        let log = self.store.insert_maintenance(log).await?;
        info!(log_id = %log.id, vehicle_id = %log.vehicle_id, "Maintenance scheduled");
        Ok(log)
    }

    /// Arrancar un mantenimiento programado: el vehículo entra en servicio.
    /// Un vehículo que está `on_trip` pierde el compare-and-swap y la
    /// petición recibe Conflict.
    pub async fn start(&self, log_id: Uuid) -> Result<MaintenanceLog, AppError> {
        let log = self
            .store
            .find_maintenance(log_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance log not found".to_string()))?;

        if !log.status.can_transition_to(MaintenanceStatus::InProgress) {
            return Err(AppError::InvalidStateTransition(format!(
                "Only scheduled maintenance can be started (log is {})",
                log.status.label()
            )));
        }

        let mut updated = log.clone();
        updated.status = MaintenanceStatus::InProgress;
        updated.updated_at = Utc::now();

        self.store
            .commit_transition(TransitionCommit {
                maintenance: Some(MaintenanceWrite {
                    log: updated.clone(),
                    expected: MaintenanceStatus::Scheduled,
                }),
                vehicle: Some(VehicleWrite {
                    vehicle_id: log.vehicle_id,
                    expected: Some(VehicleStatus::Available),
                    status: VehicleStatus::InService,
                    mileage: None,
                    next_service_mileage: None,
                }),
                ..Default::default()
            })
            .await?;

        info!(log_id = %updated.id, vehicle_id = %updated.vehicle_id, "Maintenance started");
        Ok(updated)
    }

    /// Completar un mantenimiento en curso: registra coste/técnico/factura,
    /// devuelve el vehículo a disponible y actualiza su próximo servicio.
    pub async fn complete(
        &self,
        log_id: Uuid,
        request: CompleteMaintenanceRequest,
    ) -> Result<MaintenanceLog, AppError> {
        request.validate()?;

        let log = self
            .store
            .find_maintenance(log_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance log not found".to_string()))?;

        if !log.status.can_transition_to(MaintenanceStatus::Completed) {
            return Err(AppError::InvalidStateTransition(format!(
                "Maintenance must be in progress to complete (log is {})",
                log.status.label()
            )));
        }

        let mut updated = log.clone();
        updated.status = MaintenanceStatus::Completed;
        updated.completed_date = Some(Utc::now());
        if let Some(cost) = request.cost {
            updated.cost = cost;
        }
        if request.technician_name.is_some() {
            updated.technician_name = request.technician_name.clone();
        }
        if request.invoice_number.is_some() {
            updated.invoice_number = request.invoice_number.clone();
        }
        if request.next_service_mileage.is_some() {
            updated.next_service_mileage = request.next_service_mileage;
        }
        if request.notes.is_some() {
            updated.notes = request.notes.clone();
        }
        updated.updated_at = Utc::now();

        self.store
            .commit_transition(TransitionCommit {
                maintenance: Some(MaintenanceWrite {
                    log: updated.clone(),
                    expected: MaintenanceStatus::InProgress,
                }),
                vehicle: Some(VehicleWrite {
                    vehicle_id: log.vehicle_id,
                    expected: None,
                    status: VehicleStatus::Available,
                    mileage: None,
                    next_service_mileage: request.next_service_mileage,
                }),
                ..Default::default()
            })
            .await?;

        info!(log_id = %updated.id, vehicle_id = %updated.vehicle_id, "Maintenance completed");
        Ok(updated)
    }

    /// Cancelar un mantenimiento. Solo libera el vehículo si el trabajo ya
    /// estaba en curso.
    pub async fn cancel(&self, log_id: Uuid) -> Result<MaintenanceLog, AppError> {
        let log = self
            .store
            .find_maintenance(log_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance log not found".to_string()))?;

        if !log.status.can_transition_to(MaintenanceStatus::Cancelled) {
            return Err(AppError::InvalidStateTransition(format!(
                "Maintenance cannot be cancelled in its current state ({})",
                log.status.label()
            )));
        }

        let was_in_progress = log.status == MaintenanceStatus::InProgress;
        let expected = log.status;

        let mut updated = log.clone();
        updated.status = MaintenanceStatus::Cancelled;
        updated.updated_at = Utc::now();

        let mut commit = TransitionCommit {
            maintenance: Some(MaintenanceWrite {
                log: updated.clone(),
                expected,
            }),
            ..Default::default()
        };
        if was_in_progress {
            commit.vehicle = Some(VehicleWrite {
                vehicle_id: log.vehicle_id,
                expected: None,
                status: VehicleStatus::Available,
                mileage: None,
                next_service_mileage: None,
            });
        }

        self.store.commit_transition(commit).await?;

        info!(log_id = %updated.id, released_vehicle = was_in_progress, "Maintenance cancelled");
        Ok(updated)
    }

    pub async fn get(&self, log_id: Uuid) -> Result<MaintenanceLog, AppError> {
        self.store
            .find_maintenance(log_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance log not found".to_string()))
    }

    pub async fn list(
        &self,
        vehicle_id: Option<Uuid>,
        status: Option<MaintenanceStatus>,
    ) -> Result<Vec<MaintenanceLog>, AppError> {
        self.store.list_maintenance(vehicle_id, status).await
    }
}
