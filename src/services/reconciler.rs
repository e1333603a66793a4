//! Keeps `Trip::total_spent` equal to the sum of the trip's item prices.
//!
//! The sum is always recomputed from a full read of the items; there is no
//! incremental counter. Item handlers call [`Reconciler::reconcile`] after
//! their own write has committed, and the trip read paths go through
//! [`Reconciler::reconcile_and_fetch`], which may write to the trip.
//!
//! Nothing here is transactional. Two reconciliations of the same trip can
//! interleave freely and the last write wins; the stored value is computed
//! at write time so it always includes every item committed by then. A
//! reconciliation that finds no trip does nothing.
//!
//! The items and the sum they are compared against come from one read
//! snapshot. When a correction is written, the stored total is the live sum
//! at that moment, so an item committed in between shows up in the total
//! but not yet in the returned item list.

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, info};

use super::store::TravelStore;
use crate::{
    error::AppError,
    models::{ItineraryItem, Trip, TripDetail},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Stored total already matched; nothing was written.
    Unchanged,
    /// Drift was found and the trip record was rewritten.
    Corrected,
    /// The trip does not exist (never did, or was deleted meanwhile).
    TripMissing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    pub total_spent: f64,
    pub outcome: ReconcileOutcome,
}

struct Snapshot {
    reconciliation: Reconciliation,
    trip: Option<Trip>,
    items: Vec<ItineraryItem>,
}

#[derive(Clone)]
pub struct Reconciler {
    store: TravelStore,
}

impl Reconciler {
    pub fn new(store: TravelStore) -> Self {
        Self { store }
    }

    /// Recomputes the trip's total and persists it if it drifted. Returns
    /// the up-to-date total.
    pub async fn reconcile(&self, trip_id: &str) -> Result<Reconciliation, AppError> {
        Ok(self.run(trip_id).await?.reconciliation)
    }

    /// Reconciles, then returns the trip with its items for a response.
    /// `None` if the trip does not exist.
    pub async fn reconcile_and_fetch(&self, trip_id: &str) -> Result<Option<TripDetail>, AppError> {
        let snapshot = self.run(trip_id).await?;
        Ok(snapshot.trip.map(|trip| TripDetail::new(trip, snapshot.items)))
    }

    /// Every trip, newest first, each reconciled. Trips deleted while the
    /// list was being built are skipped.
    pub async fn reconcile_all(&self) -> Result<Vec<TripDetail>, AppError> {
        let trips = self.store.list_trips().await?;
        let pending = trips.iter().map(|trip| self.reconcile_and_fetch(&trip.id));
        let details = try_join_all(pending).await?;
        Ok(details.into_iter().flatten().collect())
    }

    async fn run(&self, trip_id: &str) -> Result<Snapshot, AppError> {
        let (items, sum) = self.store.items_with_total(trip_id).await?;

        let Some(mut trip) = self.store.get_trip(trip_id).await? else {
            debug!(trip_id, "reconcile skipped, trip does not exist");
            return Ok(Snapshot {
                reconciliation: Reconciliation {
                    total_spent: sum,
                    outcome: ReconcileOutcome::TripMissing,
                },
                trip: None,
                items,
            });
        };

        if trip.total_spent == sum {
            return Ok(Snapshot {
                reconciliation: Reconciliation {
                    total_spent: sum,
                    outcome: ReconcileOutcome::Unchanged,
                },
                trip: Some(trip),
                items,
            });
        }

        let now = Utc::now();
        let Some(stored) = self.store.store_total_spent(trip_id, now).await? else {
            debug!(trip_id, "trip deleted before totalSpent could be written");
            return Ok(Snapshot {
                reconciliation: Reconciliation {
                    total_spent: sum,
                    outcome: ReconcileOutcome::TripMissing,
                },
                trip: None,
                items,
            });
        };

        info!(
            trip_id,
            previous = trip.total_spent,
            total_spent = stored,
            "corrected totalSpent drift"
        );
        trip.total_spent = stored;
        trip.updated_at = now;

        Ok(Snapshot {
            reconciliation: Reconciliation {
                total_spent: stored,
                outcome: ReconcileOutcome::Corrected,
            },
            trip: Some(trip),
            items,
        })
    }
}
