use bus_server::cache::{CacheConfig, SnapshotCache};
use bus_server::config::ServerConfig;
use bus_server::planner::SearchConfig;
use bus_server::store::SnapshotLoader;
use bus_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let loader = SnapshotLoader::new(config.stops_source.clone(), config.routes_source.clone())
        .expect("Failed to create snapshot loader");
    let snapshots = SnapshotCache::new(loader, &CacheConfig::with_ttl(config.snapshot_ttl));

    // Load once up front so a bad source fails at start-up
    let store = snapshots.get().await.expect("Failed to load stops and routes");
    info!(
        stops = store.network().stops().len(),
        routes = store.network().routes().len(),
        "loaded snapshot"
    );

    let search_config = SearchConfig::default().with_max_results(config.default_count);
    let state = AppState::new(snapshots, search_config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    info!(addr = %config.bind_addr, "bus route planner listening");
    info!("  GET  /health");
    info!("  GET  /api/v1/stops?name=&road=&township=");
    info!("  GET  /api/v1/stops/nearest?lat=&lng=&count=");
    info!("  GET  /api/v1/stops/:id");
    info!("  GET  /api/v1/routes?id=");
    info!("  GET  /api/v1/routes/find?from=&to=&count=");
    info!("  GET  /api/v1/routes/:id");

    axum::serve(listener, app).await.expect("Server error");
}
