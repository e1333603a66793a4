use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{places::PlaceSearch, reconciler::Reconciler, store::TravelStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: TravelStore,
    pub reconciler: Reconciler,
    pub places: Arc<dyn PlaceSearch>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool, places: Arc<dyn PlaceSearch>) -> Self {
        let store = TravelStore::new(db);
        let reconciler = Reconciler::new(store.clone());
        Self {
            config,
            store,
            reconciler,
            places,
        }
    }
}
