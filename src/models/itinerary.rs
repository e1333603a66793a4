use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{
    fields::{self, calendar_date},
    missing_fields_error, Record,
};
use crate::error::AppError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Activity,
    Food,
    Transport,
    Accommodation,
    Shopping,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Activity,
        Category::Food,
        Category::Transport,
        Category::Accommodation,
        Category::Shopping,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Activity => "activity",
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Accommodation => "accommodation",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == raw)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Itinerary validation failed: category: `{raw}` is not a valid enum value for path `category`."
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    pub id: String,
    /// Not checked against the trips table; orphans are possible.
    pub trip_id: String,
    pub title: String,
    pub location: String,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for ItineraryItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of `POST /api/trips/:tripId/itineraries` and `PUT /api/itineraries/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "fields::lenient_date",
        serialize_with = "calendar_date::option::serialize"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "fields::lenient_number")]
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryFields {
    pub title: String,
    pub location: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub price: f64,
    pub category: Category,
}

impl ItineraryInput {
    pub fn validate(self) -> Result<ItineraryFields, AppError> {
        let title = fields::normalize_optional(self.title);
        let location = fields::normalize_optional(self.location);

        let (title, location, date) = match (title, location, self.date) {
            (Some(title), Some(location), Some(date)) => (title, location, date),
            (title, location, date) => {
                let mut missing = Vec::new();
                if title.is_none() {
                    missing.push("title");
                }
                if location.is_none() {
                    missing.push("location");
                }
                if date.is_none() {
                    missing.push("date");
                }
                return Err(missing_fields_error("Itinerary", &missing));
            }
        };

        let category = match self.category {
            Some(raw) => raw.parse()?,
            None => Category::default(),
        };

        Ok(ItineraryFields {
            title,
            location,
            date,
            description: fields::normalize_optional(self.description),
            price: self.price,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> ItineraryInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn category_defaults_to_activity() {
        let fields = input(json!({
            "title": "Colosseum",
            "location": "Rome",
            "date": "2025-06-02"
        }))
        .validate()
        .unwrap();
        assert_eq!(fields.category, Category::Activity);
        assert_eq!(fields.price, 0.0);
        assert_eq!(fields.description, None);
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let err = input(json!({
            "title": "Gelato",
            "location": "Rome",
            "date": "2025-06-02",
            "category": "dessert"
        }))
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("`dessert`")));
    }

    #[test]
    fn negative_prices_are_accepted() {
        let fields = input(json!({
            "title": "Refund",
            "location": "Airport",
            "date": "2025-06-02",
            "price": -25,
            "category": "transport"
        }))
        .validate()
        .unwrap();
        assert_eq!(fields.price, -25.0);
        assert_eq!(fields.category, Category::Transport);
    }

    #[test]
    fn title_location_and_date_are_required() {
        let message = input(json!({ "price": 5 })).validate().unwrap_err().to_string();
        assert!(message.starts_with("Itinerary validation failed:"));
        for field in ["title", "location", "date"] {
            assert!(message.contains(&format!("Path `{field}` is required.")));
        }
    }

    #[test]
    fn categories_round_trip_through_their_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }
}
