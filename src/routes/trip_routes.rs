use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::common::ApiResponse;
use crate::dto::trip_dto::{
    CancelTripRequest, CompleteTripRequest, CreateTripRequest, DispatchVerdict, StartTripRequest,
    TripListQuery, TripResponse, ValidateDispatchRequest,
};
use crate::repositories::TripFilter;
use crate::routes::actor_id;
use crate::services::TripService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(validate_dispatch))
        .route("/", post(dispatch_trip))
        .route("/", get(list_trips))
        .route("/:id", get(get_trip))
        .route("/:id/start", patch(start_trip))
        .route("/:id/complete", patch(complete_trip))
        .route("/:id/cancel", patch(cancel_trip))
}

async fn validate_dispatch(
    State(state): State<AppState>,
    Json(request): Json<ValidateDispatchRequest>,
) -> Result<Json<DispatchVerdict>, AppError> {
    let service = TripService::new(state.store.clone());
    let verdict = service
        .validate_dispatch(request.vehicle_id, request.driver_id, request.cargo_weight_kg)
        .await?;
    Ok(Json(verdict))
}

async fn dispatch_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let dispatcher_id = actor_id(&headers);
    let service = TripService::new(state.store.clone());
    let trip = service.dispatch(request, dispatcher_id).await?;
    Ok(Json(ApiResponse::success_with_message(
        trip.into(),
        "Trip dispatched".to_string(),
    )))
}

async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<TripListQuery>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let service = TripService::new(state.store.clone());
    let trips = service
        .list(TripFilter {
            status: query.status,
            vehicle_id: query.vehicle,
            driver_id: query.driver,
        })
        .await?;
    Ok(Json(trips.into_iter().map(TripResponse::from).collect()))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TripResponse>, AppError> {
    let service = TripService::new(state.store.clone());
    let trip = service.get(id).await?;
    Ok(Json(trip.into()))
}

async fn start_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StartTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let service = TripService::new(state.store.clone());
    let trip = service.start(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        trip.into(),
        "Trip started".to_string(),
    )))
}

async fn complete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let service = TripService::new(state.store.clone());
    let trip = service.complete(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        trip.into(),
        "Trip completed".to_string(),
    )))
}

async fn cancel_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let service = TripService::new(state.store.clone());
    let trip = service.cancel(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        trip.into(),
        "Trip cancelled".to_string(),
    )))
}
