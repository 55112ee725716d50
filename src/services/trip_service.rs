//! Controlador del ciclo de vida de viajes
//!
//! Dueño de la máquina de estados de Trip (scheduled → in_progress →
//! completed/cancelled). Cada transición se arma como un commit atómico que
//! incluye los efectos sobre Vehicle y Driver: o se aplica todo o no se
//! aplica nada, así un fallo parcial nunca deja un vehículo varado en
//! `on_trip` con su viaje ya cerrado.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::trip_dto::{
    CancelTripRequest, CompleteTripRequest, CreateTripRequest, DispatchVerdict, StartTripRequest,
};
use crate::models::{DriverStatus, Trip, TripStatus, VehicleStatus};
use crate::repositories::{
    DriverWrite, FleetStore, TransitionCommit, TripFilter, TripWrite, VehicleWrite,
};
use crate::services::dispatch_validator::DispatchValidator;
use crate::utils::errors::AppError;

pub struct TripService {
    store: Arc<dyn FleetStore>,
    validator: DispatchValidator,
}

impl TripService {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        let validator = DispatchValidator::new(store.clone());
        Self { store, validator }
    }

    /// Veredicto de despacho sin efectos secundarios
    pub async fn validate_dispatch(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
        cargo_weight_kg: f64,
    ) -> Result<DispatchVerdict, AppError> {
        self.validator
            .validate(vehicle_id, driver_id, cargo_weight_kg)
            .await
    }

    /// Despachar un viaje nuevo: re-valida y crea el Trip en `scheduled`.
    /// Un viaje programado todavía no ocupa el recurso, así que los estados
    /// de Vehicle y Driver no cambian aquí.
    pub async fn dispatch(
        &self,
        request: CreateTripRequest,
        dispatcher_id: Uuid,
    ) -> Result<Trip, AppError> {
        request.validate()?;

        let verdict = self
            .validator
            .validate(request.vehicle_id, request.driver_id, request.cargo_weight_kg)
            .await?;
        if !verdict.valid {
            return Err(AppError::ValidationFailed(verdict.errors));
        }

        let now = Utc::now();
        let trip = Trip {
            id: Uuid::new_v4(),
            // El store asigna el número dentro de su sección crítica
            trip_number: String::new(),
            vehicle_id: request.vehicle_id,
            driver_id: request.driver_id,
            dispatched_by: dispatcher_id,
            origin: request.origin,
            destination: request.destination,
            cargo_description: request.cargo_description,
            cargo_weight_kg: request.cargo_weight_kg,
            status: TripStatus::Scheduled,
            scheduled_departure: request.scheduled_departure,
            scheduled_arrival: request.scheduled_arrival,
            actual_departure: None,
            actual_arrival: None,
            start_mileage: None,
            end_mileage: None,
            distance_km: None,
            notes: request.notes,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };

        let trip = self.store.create_trip_guarded(trip).await?;
        info!(
            trip_number = %trip.trip_number,
            vehicle_id = %trip.vehicle_id,
            driver_id = %trip.driver_id,
            "Trip dispatched"
        );
        Ok(trip)
    }

    /// Arrancar un viaje programado: engancha vehículo y conductor
    /// (available → on_trip) en el mismo commit que la transición del viaje.
    pub async fn start(&self, trip_id: Uuid, request: StartTripRequest) -> Result<Trip, AppError> {
        request.validate()?;

        let trip = self
            .store
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

        if !trip.status.can_transition_to(TripStatus::InProgress) {
            return Err(AppError::InvalidStateTransition(format!(
                "Only scheduled trips can be started (trip {} is {})",
                trip.trip_number,
                trip.status.label()
            )));
        }

        let mut updated = trip.clone();
        updated.status = TripStatus::InProgress;
        updated.actual_departure = Some(Utc::now());
        updated.start_mileage = Some(request.start_mileage);
        updated.updated_at = Utc::now();

        self.store
            .commit_transition(TransitionCommit {
                trip: Some(TripWrite {
                    trip: updated.clone(),
                    expected: TripStatus::Scheduled,
                }),
                vehicle: Some(VehicleWrite {
                    vehicle_id: trip.vehicle_id,
                    expected: Some(VehicleStatus::Available),
                    status: VehicleStatus::OnTrip,
                    mileage: None,
                    next_service_mileage: None,
                }),
                driver: Some(DriverWrite {
                    driver_id: trip.driver_id,
                    expected: Some(DriverStatus::Available),
                    status: DriverStatus::OnTrip,
                    add_trips: 0,
                    add_distance_km: 0,
                }),
                ..Default::default()
            })
            .await?;

        info!(trip_number = %updated.trip_number, "Trip started");
        Ok(updated)
    }

    /// Completar un viaje en curso: libera vehículo y conductor, actualiza
    /// kilometraje y acumulados del conductor, todo en un solo commit.
    /// Sin `end_mileage` la distancia queda sin calcular.
    pub async fn complete(
        &self,
        trip_id: Uuid,
        request: CompleteTripRequest,
    ) -> Result<Trip, AppError> {
        request.validate()?;

        let trip = self
            .store
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

        if !trip.status.can_transition_to(TripStatus::Completed) {
            return Err(AppError::InvalidStateTransition(format!(
                "Only in-progress trips can be completed (trip {} is {})",
                trip.trip_number,
                trip.status.label()
            )));
        }

        let distance_km = match (trip.start_mileage, request.end_mileage) {
            (Some(start), Some(end)) => {
                if end < start {
                    return Err(AppError::BadRequest(format!(
                        "End mileage ({}) cannot be less than start mileage ({})",
                        end, start
                    )));
                }
                Some(end - start)
            }
            _ => None,
        };

        let mut updated = trip.clone();
        updated.status = TripStatus::Completed;
        updated.actual_arrival = Some(Utc::now());
        updated.end_mileage = request.end_mileage;
        updated.distance_km = distance_km;
        if request.notes.is_some() {
            updated.notes = request.notes.clone();
        }
        updated.updated_at = Utc::now();

        self.store
            .commit_transition(TransitionCommit {
                trip: Some(TripWrite {
                    trip: updated.clone(),
                    expected: TripStatus::InProgress,
                }),
                vehicle: Some(VehicleWrite {
                    vehicle_id: trip.vehicle_id,
                    expected: None,
                    status: VehicleStatus::Available,
                    mileage: request.end_mileage,
                    next_service_mileage: None,
                }),
                driver: Some(DriverWrite {
                    driver_id: trip.driver_id,
                    expected: None,
                    status: DriverStatus::Available,
                    add_trips: 1,
                    add_distance_km: distance_km.unwrap_or(0),
                }),
                ..Default::default()
            })
            .await?;

        info!(
            trip_number = %updated.trip_number,
            distance_km = ?updated.distance_km,
            "Trip completed"
        );
        Ok(updated)
    }

    /// Cancelar un viaje. Solo un viaje que estaba `in_progress` llegó a
    /// ocupar los recursos; uno meramente `scheduled` no libera nada.
    pub async fn cancel(
        &self,
        trip_id: Uuid,
        request: CancelTripRequest,
    ) -> Result<Trip, AppError> {
        request.validate()?;

        let trip = self
            .store
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

        if !trip.status.can_transition_to(TripStatus::Cancelled) {
            return Err(AppError::InvalidStateTransition(format!(
                "Trip {} cannot be cancelled in its current state ({})",
                trip.trip_number,
                trip.status.label()
            )));
        }

        let was_in_progress = trip.status == TripStatus::InProgress;
        let expected = trip.status;

        let mut updated = trip.clone();
        updated.status = TripStatus::Cancelled;
        updated.cancellation_reason = Some(request.reason);
        updated.updated_at = Utc::now();

        let mut commit = TransitionCommit {
            trip: Some(TripWrite {
                trip: updated.clone(),
                expected,
            }),
            ..Default::default()
        };
        if was_in_progress {
            commit.vehicle = Some(VehicleWrite {
                vehicle_id: trip.vehicle_id,
                expected: None,
                status: VehicleStatus::Available,
                mileage: None,
                next_service_mileage: None,
            });
            commit.driver = Some(DriverWrite {
                driver_id: trip.driver_id,
                expected: None,
                status: DriverStatus::Available,
                add_trips: 0,
                add_distance_km: 0,
            });
        }

        self.store.commit_transition(commit).await?;

        info!(
            trip_number = %updated.trip_number,
            released_resources = was_in_progress,
            "Trip cancelled"
        );
        Ok(updated)
    }

    pub async fn get(&self, trip_id: Uuid) -> Result<Trip, AppError> {
        self.store
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))
    }

    pub async fn list(&self, filter: TripFilter) -> Result<Vec<Trip>, AppError> {
        self.store.list_trips(filter).await
    }
}
