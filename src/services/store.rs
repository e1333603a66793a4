use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{ItineraryFields, ItineraryItem, Trip, TripFields},
};

const TRIP_COLUMNS: &str =
    "id, name, destination, start_date, end_date, budget, total_spent, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "id, trip_id, title, location, date, description, price, category, created_at, updated_at";

fn items_by_trip_query() -> String {
    format!(
        "SELECT {ITEM_COLUMNS} FROM itineraries WHERE trip_id = ? ORDER BY date ASC, rowid ASC"
    )
}

/// Persistence for trips and itinerary items.
///
/// Every write is a single statement: nothing here spans a trip and its
/// items atomically.
#[derive(Clone)]
pub struct TravelStore {
    db: DbPool,
}

impl TravelStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &DbPool {
        &self.db
    }

    pub async fn create_trip(&self, fields: TripFields) -> Result<Trip, AppError> {
        let now = Utc::now();
        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            destination: fields.destination,
            start_date: fields.start_date,
            end_date: fields.end_date,
            budget: fields.budget,
            total_spent: 0.0,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO trips (id, name, destination, start_date, end_date, budget, total_spent, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&trip.id)
        .bind(&trip.name)
        .bind(&trip.destination)
        .bind(trip.start_date)
        .bind(trip.end_date)
        .bind(trip.budget)
        .bind(trip.total_spent)
        .bind(trip.created_at)
        .bind(trip.updated_at)
        .execute(&self.db)
        .await?;

        Ok(trip)
    }

    pub async fn get_trip(&self, id: &str) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(trip)
    }

    /// Newest first; insertion order breaks identical timestamps.
    pub async fn list_trips(&self) -> Result<Vec<Trip>, AppError> {
        let trips = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(trips)
    }

    /// Replaces the mutable fields. `total_spent` is left to the reconciler.
    pub async fn update_trip(
        &self,
        id: &str,
        fields: TripFields,
    ) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            r#"UPDATE trips
               SET name = ?, destination = ?, start_date = ?, end_date = ?, budget = ?, updated_at = ?
               WHERE id = ?
               RETURNING {TRIP_COLUMNS}"#
        ))
        .bind(fields.name)
        .bind(fields.destination)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(fields.budget)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(trip)
    }

    /// Deletes the trip, then every item referencing it. Returns the number
    /// of items removed, or `None` when the trip did not exist (its items,
    /// if any, are left alone in that case).
    pub async fn delete_trip(&self, id: &str) -> Result<Option<u64>, AppError> {
        let deleted = sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Ok(None);
        }

        let items = sqlx::query("DELETE FROM itineraries WHERE trip_id = ?")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(Some(items))
    }

    pub async fn create_item(
        &self,
        trip_id: &str,
        fields: ItineraryFields,
    ) -> Result<ItineraryItem, AppError> {
        let now = Utc::now();
        let item = ItineraryItem {
            id: Uuid::new_v4().to_string(),
            trip_id: trip_id.to_string(),
            title: fields.title,
            location: fields.location,
            date: fields.date,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO itineraries (id, trip_id, title, location, date, description, price, category, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&item.id)
        .bind(&item.trip_id)
        .bind(&item.title)
        .bind(&item.location)
        .bind(item.date)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.category)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.db)
        .await?;

        Ok(item)
    }

    pub async fn get_item(&self, id: &str) -> Result<Option<ItineraryItem>, AppError> {
        let item = sqlx::query_as::<_, ItineraryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM itineraries WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(item)
    }

    /// Items of a trip by ascending calendar date, then insertion order.
    pub async fn list_items(&self, trip_id: &str) -> Result<Vec<ItineraryItem>, AppError> {
        let items = sqlx::query_as::<_, ItineraryItem>(&items_by_trip_query())
            .bind(trip_id)
            .fetch_all(&self.db)
            .await?;
        Ok(items)
    }

    /// Items of a trip together with their price sum, both read inside one
    /// transaction so the sum always matches the listed items.
    pub async fn items_with_total(
        &self,
        trip_id: &str,
    ) -> Result<(Vec<ItineraryItem>, f64), AppError> {
        let mut tx = self.db.begin().await?;
        let items = sqlx::query_as::<_, ItineraryItem>(&items_by_trip_query())
            .bind(trip_id)
            .fetch_all(&mut *tx)
            .await?;
        let total: f64 =
            sqlx::query_scalar("SELECT TOTAL(price) FROM itineraries WHERE trip_id = ?")
                .bind(trip_id)
                .fetch_one(&mut *tx)
                .await?;
        tx.commit().await?;
        Ok((items, total))
    }

    pub async fn update_item(
        &self,
        id: &str,
        fields: ItineraryFields,
    ) -> Result<Option<ItineraryItem>, AppError> {
        let item = sqlx::query_as::<_, ItineraryItem>(&format!(
            r#"UPDATE itineraries
               SET title = ?, location = ?, date = ?, description = ?, price = ?, category = ?, updated_at = ?
               WHERE id = ?
               RETURNING {ITEM_COLUMNS}"#
        ))
        .bind(fields.title)
        .bind(fields.location)
        .bind(fields.date)
        .bind(fields.description)
        .bind(fields.price)
        .bind(fields.category)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(item)
    }

    pub async fn delete_item(&self, id: &str) -> Result<Option<ItineraryItem>, AppError> {
        let item = sqlx::query_as::<_, ItineraryItem>(&format!(
            "DELETE FROM itineraries WHERE id = ? RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(item)
    }

    /// Writes the live price sum onto the trip. The sum is taken inside the
    /// UPDATE itself, so the value stored reflects every item committed
    /// before this statement runs. `None` when the trip is gone.
    pub async fn store_total_spent(
        &self,
        trip_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<f64>, AppError> {
        let total: Option<f64> = sqlx::query_scalar(
            r#"UPDATE trips
               SET total_spent = (SELECT TOTAL(price) FROM itineraries WHERE trip_id = trips.id),
                   updated_at = ?
               WHERE id = ?
               RETURNING total_spent"#,
        )
        .bind(updated_at)
        .bind(trip_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(total)
    }
}
