use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    services::places::{PlaceKind, PlaceSuggestion, PlacesStatus},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/places/search", get(search))
        .route("/places/status", get(status))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    kind: PlaceKind,
}

async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<PlaceSuggestion>>, AppError> {
    let Query(params) = params?;
    Ok(Json(state.places.search(&params.q, params.kind).await))
}

async fn status(State(state): State<AppState>) -> Json<PlacesStatus> {
    Json(state.places.status())
}
