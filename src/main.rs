use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use travel_planner::config::AppConfig;
use travel_planner::db::{init_pool, migrate};
use travel_planner::error::AppError;
use travel_planner::routes::create_router;
use travel_planner::services::places::{FallbackPlaces, GooglePlaces, PlaceSearch};
use travel_planner::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = init_pool(&config.database_url).await?;
    migrate(&db).await?;
    info!("database ready at {}", config.database_url);

    let places: Arc<dyn PlaceSearch> = match &config.places_api_key {
        Some(key) => Arc::new(GooglePlaces::new(key.clone())?),
        None => {
            warn!("GOOGLE_PLACES_API_KEY not set, place search uses the built-in table");
            Arc::new(FallbackPlaces)
        }
    };

    let state = AppState::new(config.clone(), db, places);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,travel_planner=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
