use axum::{routing::get, Router};
use configuration::Settings;
use database::{DbRepository, StatsStore, TimedStore};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod envelope;
pub mod error;
pub mod handlers;

/// Resource paths, mounted both at the root and under [`API_PREFIX`].
const RESOURCE_PATHS: [&str; 4] = ["/counties", "/counties/:id", "/indicators", "/data"];
const API_PREFIX: &str = "/api/v1";
const HEALTH_PATH: &str = "/health";

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StatsStore>,
    /// "METHOD /path" for every registered route, reported by the 404 fallback.
    pub routes: Arc<[String]>,
}

/// Every route the router answers, in registration order.
pub fn registered_routes() -> Vec<String> {
    let mut routes = vec![format!("GET {HEALTH_PATH}")];
    for prefix in ["", API_PREFIX] {
        for path in RESOURCE_PATHS {
            routes.push(format!("GET {prefix}{path}"));
        }
    }
    routes
}

fn resource_routes() -> Router<AppState> {
    let [counties, county_by_id, indicators, data] = RESOURCE_PATHS;
    Router::new()
        .route(counties, get(handlers::list_counties))
        .route(county_by_id, get(handlers::get_county))
        .route(indicators, get(handlers::list_indicators))
        .route(data, get(handlers::get_data))
}

/// Builds the full application router over any store implementation.
///
/// Every store call is bounded by `query_timeout`; a call that runs past it
/// fails and the request ends in a 500.
pub fn build_router(store: Arc<dyn StatsStore>, query_timeout: Duration) -> Router {
    let app_state = AppState {
        store: Arc::new(TimedStore::new(store, query_timeout)),
        routes: registered_routes().into(),
    };

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route(HEALTH_PATH, get(|| async { "OK" }))
        .merge(resource_routes())
        .nest(API_PREFIX, resource_routes())
        .fallback(handlers::not_found)
        .with_state(app_state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Connects to PostgreSQL, applies migrations and serves until Ctrl-C.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.server.bind_address()?;

    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool.clone());

    let app = build_router(Arc::new(db_repo), settings.database.statement_timeout());

    tracing::info!("Registered routes:");
    for route in registered_routes() {
        tracing::info!("  {route}");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
}
