pub mod fields;
pub mod itinerary;
pub mod trip;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use itinerary::{Category, ItineraryFields, ItineraryInput, ItineraryItem};
pub use trip::{Trip, TripDetail, TripFields, TripInput};

/// Anything addressed by an opaque storage identity.
pub trait Record {
    fn id(&self) -> &str;
}

/// A record as it appears on the wire: the storage identity under `_id`
/// next to the record's own `id` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub storage_id: String,
    #[serde(flatten)]
    pub record: T,
}

impl<T: Record> From<T> for Stored<T> {
    fn from(record: T) -> Self {
        Self {
            storage_id: record.id().to_string(),
            record,
        }
    }
}

pub(crate) fn missing_fields_error(model: &str, missing: &[&str]) -> AppError {
    let details = missing
        .iter()
        .map(|field| format!("{field}: Path `{field}` is required."))
        .collect::<Vec<_>>()
        .join(", ");
    AppError::Validation(format!("{model} validation failed: {details}"))
}
