use anyhow::Context;
use country_dashboard::{
    config::StorageBackend, repo::Storage, routes::create_router,
    services::start_background_tasks, AppState, Config,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = Config::from_env()?;

    let storage = match config.storage_backend {
        StorageBackend::Postgres => connect_postgres(&config).await?,
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, nothing survives a restart");
            Storage::memory()
        }
    };

    // Create application state
    let state = AppState::new(config.clone(), storage).context("failed to build HTTP client")?;

    // Start background tasks
    start_background_tasks(&state);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_postgres(config: &Config) -> anyhow::Result<Storage> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    tracing::info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {:?}", e);
            e
        })?;

    tracing::info!("Connected to PostgreSQL");

    Ok(Storage::postgres(pool).await?)
}
