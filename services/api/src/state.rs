//! Application state shared across handlers

use common::cache::RedisPool;
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    batches::BatchManager,
    distribution::ReportDistributor,
    middleware::TokenVerifier,
    presence::PresenceClient,
    repositories::{AttendanceRepository, BatchRepository, FacultyRepository, StudentRepository},
    settings::Settings,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub redis_pool: RedisPool,
    pub verifier: TokenVerifier,
    pub student_repository: StudentRepository,
    pub faculty_repository: FacultyRepository,
    pub attendance_repository: AttendanceRepository,
    pub batch_manager: BatchManager<BatchRepository>,
    pub presence_client: PresenceClient,
    pub distributor: ReportDistributor,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        settings: Settings,
        redis_pool: RedisPool,
        verifier: TokenVerifier,
        distributor: ReportDistributor,
    ) -> Self {
        let presence_client = PresenceClient::new(
            settings.presence_url.clone(),
            settings.presence_fallback.clone(),
        );

        Self {
            student_repository: StudentRepository::new(db_pool.clone()),
            faculty_repository: FacultyRepository::new(db_pool.clone()),
            attendance_repository: AttendanceRepository::new(db_pool.clone()),
            batch_manager: BatchManager::new(BatchRepository::new(db_pool.clone())),
            db_pool,
            settings: Arc::new(settings),
            redis_pool,
            verifier,
            presence_client,
            distributor,
        }
    }
}
