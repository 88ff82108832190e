use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod validation;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
};
use tokio::net::TcpListener;

use crate::{
    jwt::{JwtConfig, JwtService},
    repositories::{FacultyRepository, StudentRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub redis_pool: RedisPool,
    pub jwt_service: JwtService,
    pub faculty_repository: FacultyRepository,
    pub student_repository: StudentRepository,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config)?;

    // Initialize Redis connection pool
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    let app_state = AppState {
        redis_pool,
        jwt_service,
        faculty_repository: FacultyRepository::new(pool.clone()),
        student_repository: StudentRepository::new(pool),
    };

    info!("Authentication service initialized successfully");

    let app = routes::create_router(app_state);

    let port = std::env::var("AUTH_PORT").unwrap_or_else(|_| "3000".to_string());
    let address = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&address).await?;
    info!("Authentication service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
