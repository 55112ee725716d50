use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::common::ApiResponse;
use crate::dto::maintenance_dto::{
    CompleteMaintenanceRequest, CreateMaintenanceRequest, MaintenanceListQuery,
};
use crate::models::MaintenanceLog;
use crate::routes::actor_id;
use crate::services::MaintenanceService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(schedule_maintenance))
        .route("/", get(list_maintenance))
        .route("/:id", get(get_maintenance))
        .route("/:id/start", patch(start_maintenance))
        .route("/:id/complete", patch(complete_maintenance))
        .route("/:id/cancel", patch(cancel_maintenance))
}

async fn schedule_maintenance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceLog>>, AppError> {
    let logged_by = actor_id(&headers);
    let service = MaintenanceService::new(state.store.clone());
    let log = service.schedule(request, logged_by).await?;
    Ok(Json(ApiResponse::success_with_message(
        log,
        "Maintenance scheduled".to_string(),
    )))
}

async fn list_maintenance(
    State(state): State<AppState>,
    Query(query): Query<MaintenanceListQuery>,
) -> Result<Json<Vec<MaintenanceLog>>, AppError> {
    let service = MaintenanceService::new(state.store.clone());
    let logs = service.list(query.vehicle, query.status).await?;
    Ok(Json(logs))
}

async fn get_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaintenanceLog>, AppError> {
    let service = MaintenanceService::new(state.store.clone());
    let log = service.get(id).await?;
    Ok(Json(log))
}

async fn start_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MaintenanceLog>>, AppError> {
    let service = MaintenanceService::new(state.store.clone());
    let log = service.start(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        log,
        "Maintenance started".to_string(),
    )))
}

async fn complete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceLog>>, AppError> {
    let service = MaintenanceService::new(state.store.clone());
    let log = service.complete(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        log,
        "Maintenance completed".to_string(),
    )))
}

async fn cancel_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MaintenanceLog>>, AppError> {
    let service = MaintenanceService::new(state.store.clone());
    let log = service.cancel(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        log,
        "Maintenance cancelled".to_string(),
    )))
}
