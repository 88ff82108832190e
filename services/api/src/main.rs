use anyhow::Result;
use aws_config::BehaviorVersion;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregator;
mod batches;
mod distribution;
mod error;
mod middleware;
mod models;
mod presence;
mod recorder;
mod report;
mod repositories;
mod roll_list;
mod routes;
mod settings;
mod state;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
};
use tokio::net::TcpListener;

use crate::{
    distribution::ReportDistributor,
    middleware::{TokenVerifier, VerifierConfig},
    settings::Settings,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    let settings = Settings::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    let verifier = TokenVerifier::new(&VerifierConfig::from_env()?)?;

    // Initialize AWS S3 client
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let distributor = ReportDistributor::new(
        aws_sdk_s3::Client::new(&aws_config),
        settings.report_bucket.clone(),
        Duration::from_secs(settings.report_url_expiry_secs),
    );

    if settings.presence_url.is_none() {
        info!("No presence source configured, attendance uses the fallback list");
    }

    let address = format!("0.0.0.0:{}", settings.port);
    let app_state = AppState::new(pool, settings, redis_pool, verifier, distributor);

    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
