use axum::http::{header, HeaderValue, Method};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa_swagger_ui::SwaggerUi;

use bikewatch::api::{self, AppState};
use bikewatch::config::{Config, ConfigError};
use bikewatch::loader::DatasetLoader;
use bikewatch::providers::DataClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bikewatch=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load_from_env()?;
    info!(
        stations = %config.stations,
        trips = %config.trips,
        lane_layers = config.map.bike_lanes.len(),
        "Starting bikewatch server"
    );

    let client = DataClient::new(Duration::from_secs(config.fetch_timeout_secs))?;
    let loader = Arc::new(DatasetLoader::new(
        client,
        config.stations.clone(),
        config.trips.clone(),
    ));

    // Station and trip data load in the background; /api/status reports progress
    loader.clone().spawn_initial_load();

    let state = AppState {
        loader,
        map: Arc::new(config.map.clone()),
        max_radius: config.max_radius,
    };

    let cors = build_cors(&config)?;

    // Build router
    let (api_router, openapi) = api::router(state);
    let mut app = api_router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    if let Some(dir) = &config.static_dir {
        info!(dir = %dir.display(), "Serving map frontend");
        app = app.fallback_service(ServeDir::new(dir));
    }

    let app = app.layer(TraceLayer::new_for_http()).layer(cors);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_cors(config: &Config) -> Result<CorsLayer, ConfigError> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if config.cors_permissive {
        tracing::warn!("CORS is permissive, allowing all origins");
        return Ok(cors.allow_origin(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| ConfigError::Invalid(format!("bad CORS origin {origin}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(cors.allow_origin(origins))
}
