use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::info;

use super::MessageResponse;
use crate::{
    error::AppError,
    models::{ItineraryInput, ItineraryItem, Stored},
    state::AppState,
};

const ITEM_NOT_FOUND: &str = "Itinerary item not found";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips/:id/itineraries", get(list_items).post(create_item))
        .route("/itineraries/:id", put(update_item).delete(delete_item))
}

/// Does not check that the trip exists; an unknown trip simply has no items.
async fn list_items(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Vec<Stored<ItineraryItem>>>, AppError> {
    let items = state.store.list_items(&trip_id).await?;
    Ok(Json(items.into_iter().map(Stored::from).collect()))
}

async fn create_item(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    payload: Result<Json<ItineraryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Stored<ItineraryItem>>), AppError> {
    let Json(input) = payload?;
    let item = state.store.create_item(&trip_id, input.validate()?).await?;
    let reconciled = state.reconciler.reconcile(&trip_id).await?;
    info!(
        item_id = %item.id,
        trip_id = %trip_id,
        total_spent = reconciled.total_spent,
        "itinerary item created"
    );
    Ok((StatusCode::CREATED, Json(item.into())))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ItineraryInput>, JsonRejection>,
) -> Result<Json<Stored<ItineraryItem>>, AppError> {
    let Json(input) = payload?;
    let fields = input.validate()?;
    let item = state
        .store
        .update_item(&id, fields)
        .await?
        .ok_or(AppError::NotFound(ITEM_NOT_FOUND))?;
    state.reconciler.reconcile(&item.trip_id).await?;
    Ok(Json(item.into()))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let item = state
        .store
        .delete_item(&id)
        .await?
        .ok_or(AppError::NotFound(ITEM_NOT_FOUND))?;
    state.reconciler.reconcile(&item.trip_id).await?;
    Ok(Json(MessageResponse::new("Itinerary item deleted successfully")))
}
