use std::sync::Arc;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use udf_backend::{
    build_router,
    config::ServerConfig,
    jobs::chart_sync::start_chart_sync_job,
    models::symbol::SymbolCatalog,
    services::{chart_sync::ChartSyncService, store::{ChartStore, SeaOrmStore}},
    AppState,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,udf_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("Invalid server configuration");

    // Symbol catalog, immutable from here on
    let tokens_json = std::fs::read_to_string(&config.tokens_path).unwrap_or_else(|e| {
        panic!("Failed to read token list {}: {}", config.tokens_path.display(), e)
    });
    let catalog = Arc::new(
        SymbolCatalog::from_json(&config.exchange, &tokens_json)
            .expect("Failed to build symbol catalog"),
    );
    tracing::info!(
        exchange = %catalog.exchange(),
        symbols = catalog.symbols().len(),
        "Symbol catalog loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let store: Arc<dyn ChartStore> = Arc::new(SeaOrmStore::new(db));

    // Background jobs
    start_chart_sync_job(ChartSyncService::new(store.clone(), catalog.clone())).await;

    let app = build_router(AppState::new(store, catalog));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        "Server listening on {}",
        listener.local_addr().expect("Listener has no local address")
    );

    axum::serve(listener, app).await.expect("Server error");
}
