use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;

use super::MessageResponse;
use crate::{
    error::AppError,
    models::{TripDetail, TripInput},
    services::budget::{BudgetOverview, BudgetSummary},
    state::AppState,
};

pub(crate) const TRIP_NOT_FOUND: &str = "Trip not found";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips).post(create_trip))
        .route(
            "/trips/:id",
            get(get_trip).put(update_trip).delete(delete_trip),
        )
        .route("/trips/:id/budget", get(trip_budget))
        .route("/budget/overview", get(budget_overview))
}

async fn list_trips(State(state): State<AppState>) -> Result<Json<Vec<TripDetail>>, AppError> {
    Ok(Json(state.reconciler.reconcile_all().await?))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TripDetail>, AppError> {
    state
        .reconciler
        .reconcile_and_fetch(&id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(TRIP_NOT_FOUND))
}

async fn create_trip(
    State(state): State<AppState>,
    payload: Result<Json<TripInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TripDetail>), AppError> {
    let Json(input) = payload?;
    let trip = state.store.create_trip(input.validate()?).await?;
    info!(trip_id = %trip.id, "trip created");
    Ok((StatusCode::CREATED, Json(TripDetail::new(trip, Vec::new()))))
}

/// Not a reconciliation point: the reported `totalSpent` is the live sum,
/// the stored one is left as is.
async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TripInput>, JsonRejection>,
) -> Result<Json<TripDetail>, AppError> {
    let Json(input) = payload?;
    let fields = input.validate()?;
    let mut trip = state
        .store
        .update_trip(&id, fields)
        .await?
        .ok_or(AppError::NotFound(TRIP_NOT_FOUND))?;

    let (items, total) = state.store.items_with_total(&trip.id).await?;
    trip.total_spent = total;
    Ok(Json(TripDetail::new(trip, items)))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let items_removed = state
        .store
        .delete_trip(&id)
        .await?
        .ok_or(AppError::NotFound(TRIP_NOT_FOUND))?;
    info!(trip_id = %id, items_removed, "trip deleted");
    Ok(Json(MessageResponse::new("Trip deleted successfully")))
}

async fn trip_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BudgetSummary>, AppError> {
    let detail = state
        .reconciler
        .reconcile_and_fetch(&id)
        .await?
        .ok_or(AppError::NotFound(TRIP_NOT_FOUND))?;
    Ok(Json(BudgetSummary::from_detail(&detail)))
}

async fn budget_overview(State(state): State<AppState>) -> Result<Json<BudgetOverview>, AppError> {
    let details = state.reconciler.reconcile_all().await?;
    Ok(Json(BudgetOverview::from_details(&details)))
}
