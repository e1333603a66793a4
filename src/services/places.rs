//! Place-name autocomplete for the itinerary location field.
//!
//! [`GooglePlaces`] asks the Places Autocomplete web service and falls back
//! to the built-in landmark table whenever the provider cannot answer;
//! [`FallbackPlaces`] is used alone when no API key is configured.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_RESULTS: usize = 5;
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    #[default]
    Any,
    Restaurants,
    Hotels,
    Attractions,
}

impl PlaceKind {
    fn type_filter(&self) -> Option<&'static str> {
        match self {
            PlaceKind::Any => None,
            PlaceKind::Restaurants => Some("restaurant|cafe|meal_takeaway"),
            PlaceKind::Hotels => Some("lodging"),
            PlaceKind::Attractions => {
                Some("tourist_attraction|museum|amusement_park|zoo|aquarium")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSuggestion {
    pub id: String,
    pub name: String,
    pub main_text: String,
    pub secondary_text: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacesStatus {
    pub provider: &'static str,
    pub has_api_key: bool,
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Up to [`MAX_RESULTS`] suggestions; empty for queries shorter than
    /// [`MIN_QUERY_CHARS`]. Never fails: provider trouble degrades to the
    /// static table.
    async fn search(&self, query: &str, kind: PlaceKind) -> Vec<PlaceSuggestion>;

    fn status(&self) -> PlacesStatus;
}

fn too_short(query: &str) -> bool {
    query.trim().chars().count() < MIN_QUERY_CHARS
}

const LANDMARKS: &[(&str, &str, &str, &str)] = &[
    ("mock-eiffel", "Eiffel Tower", "Paris, France", "tourist_attraction"),
    ("mock-central-park", "Central Park", "New York, NY, USA", "park"),
    ("mock-colosseum", "Colosseum", "Rome, Italy", "tourist_attraction"),
    ("mock-tower-bridge", "Tower Bridge", "London, UK", "tourist_attraction"),
    ("mock-statue-liberty", "Statue of Liberty", "New York, NY, USA", "tourist_attraction"),
    ("mock-big-ben", "Big Ben", "London, UK", "tourist_attraction"),
    ("mock-arc-triomphe", "Arc de Triomphe", "Paris, France", "tourist_attraction"),
    ("mock-times-square", "Times Square", "New York, NY, USA", "tourist_attraction"),
    ("mock-vatican", "Vatican City", "Vatican", "tourist_attraction"),
    ("mock-notre-dame", "Notre Dame", "Paris, France", "tourist_attraction"),
];

/// Case-insensitive substring search over a fixed set of landmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPlaces;

impl FallbackPlaces {
    pub fn lookup(&self, query: &str) -> Vec<PlaceSuggestion> {
        if too_short(query) {
            return Vec::new();
        }
        let needle = query.trim().to_lowercase();
        LANDMARKS
            .iter()
            .map(|(id, main, secondary, kind)| PlaceSuggestion {
                id: (*id).to_string(),
                name: format!("{main}, {secondary}"),
                main_text: (*main).to_string(),
                secondary_text: (*secondary).to_string(),
                types: vec![(*kind).to_string()],
            })
            .filter(|place| {
                place.name.to_lowercase().contains(&needle)
                    || place.main_text.to_lowercase().contains(&needle)
                    || place.secondary_text.to_lowercase().contains(&needle)
            })
            .take(MAX_RESULTS)
            .collect()
    }
}

#[async_trait]
impl PlaceSearch for FallbackPlaces {
    async fn search(&self, query: &str, _kind: PlaceKind) -> Vec<PlaceSuggestion> {
        self.lookup(query)
    }

    fn status(&self) -> PlacesStatus {
        PlacesStatus {
            provider: "fallback",
            has_api_key: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    place_id: String,
    description: String,
    #[serde(default)]
    structured_formatting: Option<StructuredFormatting>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StructuredFormatting {
    main_text: Option<String>,
    secondary_text: Option<String>,
}

impl From<Prediction> for PlaceSuggestion {
    fn from(prediction: Prediction) -> Self {
        let formatting = prediction.structured_formatting.unwrap_or_default();
        Self {
            id: prediction.place_id,
            main_text: formatting
                .main_text
                .unwrap_or_else(|| prediction.description.clone()),
            secondary_text: formatting.secondary_text.unwrap_or_default(),
            name: prediction.description,
            types: prediction.types,
        }
    }
}

#[derive(Clone)]
pub struct GooglePlaces {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    fallback: FallbackPlaces,
}

impl GooglePlaces {
    pub const AUTOCOMPLETE_URL: &'static str =
        "https://maps.googleapis.com/maps/api/place/autocomplete/json";

    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|err| AppError::Other(err.into()))?;
        Ok(Self::with_client(http, api_key))
    }

    pub fn with_client(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: Self::AUTOCOMPLETE_URL.to_string(),
            fallback: FallbackPlaces,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn autocomplete(
        &self,
        query: &str,
        kind: PlaceKind,
    ) -> anyhow::Result<Vec<PlaceSuggestion>> {
        let mut params = vec![("input", query.trim()), ("key", self.api_key.as_str())];
        if let Some(types) = kind.type_filter() {
            params.push(("types", types));
        }

        let response: AutocompleteResponse = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .context("places request failed")?
            .error_for_status()
            .context("places provider returned an error status")?
            .json()
            .await
            .context("places response was not valid JSON")?;

        if response.status != "OK" {
            return Err(anyhow!(
                "places provider status {}: {}",
                response.status,
                response.error_message.unwrap_or_default()
            ));
        }

        Ok(response
            .predictions
            .into_iter()
            .take(MAX_RESULTS)
            .map(PlaceSuggestion::from)
            .collect())
    }
}

#[async_trait]
impl PlaceSearch for GooglePlaces {
    async fn search(&self, query: &str, kind: PlaceKind) -> Vec<PlaceSuggestion> {
        if too_short(query) {
            return Vec::new();
        }
        match self.autocomplete(query, kind).await {
            Ok(places) => places,
            Err(err) => {
                warn!("place search falling back to built-in table: {err:#}");
                self.fallback.lookup(query)
            }
        }
    }

    fn status(&self) -> PlacesStatus {
        PlacesStatus {
            provider: "google",
            has_api_key: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    async fn fake_provider(body: Value) -> String {
        let app = Router::new().route(
            "/autocomplete",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/autocomplete")
    }

    #[test]
    fn fallback_matches_any_part_of_the_name() {
        let places = FallbackPlaces.lookup("paris");
        let ids: Vec<_> = places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["mock-eiffel", "mock-arc-triomphe", "mock-notre-dame"]);
        assert_eq!(places[0].name, "Eiffel Tower, Paris, France");
    }

    #[test]
    fn fallback_caps_results_and_ignores_short_queries() {
        assert_eq!(FallbackPlaces.lookup("a").len(), 0);
        assert_eq!(FallbackPlaces.lookup(" e ").len(), 0);
        assert!(FallbackPlaces.lookup("er").len() <= MAX_RESULTS);
        assert!(FallbackPlaces.lookup("zzz").is_empty());
    }

    #[tokio::test]
    async fn provider_predictions_are_mapped_and_capped() {
        let predictions: Vec<Value> = (0..7)
            .map(|n| {
                json!({
                    "place_id": format!("place-{n}"),
                    "description": format!("Trattoria {n}, Rome, Italy"),
                    "structured_formatting": {
                        "main_text": format!("Trattoria {n}"),
                        "secondary_text": "Rome, Italy"
                    },
                    "types": ["restaurant"]
                })
            })
            .collect();
        let endpoint = fake_provider(json!({ "status": "OK", "predictions": predictions })).await;

        let places = GooglePlaces::with_client(reqwest::Client::new(), "test-key")
            .with_endpoint(endpoint)
            .search("tratt", PlaceKind::Restaurants)
            .await;

        assert_eq!(places.len(), MAX_RESULTS);
        assert_eq!(places[0].id, "place-0");
        assert_eq!(places[0].main_text, "Trattoria 0");
        assert_eq!(places[0].secondary_text, "Rome, Italy");
        assert_eq!(places[0].types, ["restaurant"]);
    }

    #[tokio::test]
    async fn provider_refusal_falls_back_to_landmarks() {
        let endpoint = fake_provider(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }))
        .await;

        let places = GooglePlaces::with_client(reqwest::Client::new(), "bad-key")
            .with_endpoint(endpoint)
            .search("colos", PlaceKind::Any)
            .await;

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, "mock-colosseum");
    }

    #[tokio::test]
    async fn unreachable_provider_falls_back_to_landmarks() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let places = GooglePlaces::with_client(reqwest::Client::new(), "key")
            .with_endpoint(format!("http://{addr}/autocomplete"))
            .search("london", PlaceKind::Attractions)
            .await;

        let ids: Vec<_> = places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["mock-tower-bridge", "mock-big-ben"]);
    }

    #[test]
    fn kinds_map_to_provider_type_filters() {
        assert_eq!(PlaceKind::Any.type_filter(), None);
        assert_eq!(PlaceKind::Hotels.type_filter(), Some("lodging"));
        assert!(PlaceKind::Attractions
            .type_filter()
            .is_some_and(|types| types.contains("museum")));
    }
}
