//! Typed client for the REST API.
//!
//! Constructed explicitly and handed to whoever needs it. Failed calls
//! come back as [`ClientError::Api`] carrying the server's own message, so
//! callers can show it without parsing response bodies themselves.

use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    models::{ItineraryInput, ItineraryItem, Stored, TripDetail, TripInput},
    routes::{health::HealthResponse, MessageResponse},
    services::{
        budget::{BudgetOverview, BudgetSummary},
        places::{PlaceKind, PlaceSuggestion},
    },
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` includes the `/api` prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|err| {
            warn!("API error ({endpoint}): {err}");
            ClientError::Transport(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!("HTTP error! status: {}", status.as_u16()),
            };
            warn!("API error ({endpoint}): {message}");
            return Err(ClientError::Api { status, message });
        }

        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.send(endpoint, self.http.get(self.url(endpoint))).await
    }

    pub async fn get_trips(&self) -> Result<Vec<TripDetail>, ClientError> {
        self.get("/trips").await
    }

    pub async fn get_trip(&self, id: &str) -> Result<TripDetail, ClientError> {
        self.get(&format!("/trips/{id}")).await
    }

    pub async fn create_trip(&self, trip: &TripInput) -> Result<TripDetail, ClientError> {
        let endpoint = "/trips";
        self.send(endpoint, self.http.post(self.url(endpoint)).json(trip))
            .await
    }

    pub async fn update_trip(&self, id: &str, trip: &TripInput) -> Result<TripDetail, ClientError> {
        let endpoint = format!("/trips/{id}");
        self.send(&endpoint, self.http.put(self.url(&endpoint)).json(trip))
            .await
    }

    pub async fn delete_trip(&self, id: &str) -> Result<MessageResponse, ClientError> {
        let endpoint = format!("/trips/{id}");
        self.send(&endpoint, self.http.delete(self.url(&endpoint)))
            .await
    }

    pub async fn get_itineraries(
        &self,
        trip_id: &str,
    ) -> Result<Vec<Stored<ItineraryItem>>, ClientError> {
        self.get(&format!("/trips/{trip_id}/itineraries")).await
    }

    pub async fn create_itinerary(
        &self,
        trip_id: &str,
        item: &ItineraryInput,
    ) -> Result<Stored<ItineraryItem>, ClientError> {
        let endpoint = format!("/trips/{trip_id}/itineraries");
        self.send(&endpoint, self.http.post(self.url(&endpoint)).json(item))
            .await
    }

    pub async fn update_itinerary(
        &self,
        id: &str,
        item: &ItineraryInput,
    ) -> Result<Stored<ItineraryItem>, ClientError> {
        let endpoint = format!("/itineraries/{id}");
        self.send(&endpoint, self.http.put(self.url(&endpoint)).json(item))
            .await
    }

    pub async fn delete_itinerary(&self, id: &str) -> Result<MessageResponse, ClientError> {
        let endpoint = format!("/itineraries/{id}");
        self.send(&endpoint, self.http.delete(self.url(&endpoint)))
            .await
    }

    pub async fn trip_budget(&self, id: &str) -> Result<BudgetSummary, ClientError> {
        self.get(&format!("/trips/{id}/budget")).await
    }

    pub async fn budget_overview(&self) -> Result<BudgetOverview, ClientError> {
        self.get("/budget/overview").await
    }

    pub async fn search_places(
        &self,
        query: &str,
        kind: PlaceKind,
    ) -> Result<Vec<PlaceSuggestion>, ClientError> {
        let endpoint = "/places/search";
        let request = self
            .http
            .get(self.url(endpoint))
            .query(&[("q", query)])
            .query(&[("kind", kind)]);
        self.send(endpoint, request).await
    }

    pub async fn health_check(&self) -> Result<HealthResponse, ClientError> {
        self.get("/health").await
    }
}
