use chrono::NaiveDate;
use tempfile::TempDir;

use crate::{
    db,
    models::{Category, ItineraryFields, TripFields},
    services::store::TravelStore,
};

/// A migrated store backed by a fresh SQLite file. Keep the `TempDir`
/// alive for as long as the store is used.
pub async fn store() -> (TravelStore, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("test.sqlite").display());
    let pool = db::init_pool(&url).await.expect("pool");
    db::migrate(&pool).await.expect("migrations");
    (TravelStore::new(pool), dir)
}

pub fn trip_fields(name: &str, budget: f64) -> TripFields {
    TripFields {
        name: name.to_string(),
        destination: format!("{name} area"),
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        end_date: None,
        budget,
    }
}

pub fn item_fields(title: &str, price: f64, date: NaiveDate) -> ItineraryFields {
    ItineraryFields {
        title: title.to_string(),
        location: "Old town".to_string(),
        date,
        description: None,
        price,
        category: Category::Activity,
    }
}
