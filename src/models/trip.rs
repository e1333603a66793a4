use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{
    fields::{self, calendar_date},
    itinerary::ItineraryItem,
    missing_fields_error, Record, Stored,
};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub destination: String,
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(default, with = "calendar_date::option")]
    pub end_date: Option<NaiveDate>,
    pub budget: f64,
    /// Cached sum of the trip's item prices, maintained by the reconciler.
    pub total_spent: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Trip {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of `POST /api/trips` and `PUT /api/trips/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(
        default,
        deserialize_with = "fields::lenient_date",
        serialize_with = "calendar_date::option::serialize"
    )]
    pub start_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "fields::lenient_date",
        serialize_with = "calendar_date::option::serialize"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "fields::lenient_number")]
    pub budget: f64,
}

/// The mutable part of a trip after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TripFields {
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: f64,
}

impl TripInput {
    pub fn validate(self) -> Result<TripFields, AppError> {
        let name = fields::normalize_optional(self.name);
        let destination = fields::normalize_optional(self.destination);

        match (name, destination, self.start_date) {
            (Some(name), Some(destination), Some(start_date)) => Ok(TripFields {
                name,
                destination,
                start_date,
                end_date: self.end_date,
                budget: self.budget,
            }),
            (name, destination, start_date) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push("name");
                }
                if destination.is_none() {
                    missing.push("destination");
                }
                if start_date.is_none() {
                    missing.push("startDate");
                }
                Err(missing_fields_error("Trip", &missing))
            }
        }
    }
}

/// A trip together with its itinerary, as every trip endpoint returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetail {
    #[serde(flatten)]
    pub trip: Stored<Trip>,
    pub itineraries: Vec<Stored<ItineraryItem>>,
}

impl TripDetail {
    pub fn new(trip: Trip, items: Vec<ItineraryItem>) -> Self {
        Self {
            trip: trip.into(),
            itineraries: items.into_iter().map(Stored::from).collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.trip.record.id
    }
}
