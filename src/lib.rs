pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::{
    attempt_service::AttemptService, auth_service::AuthService, catalog_service::CatalogService,
    history_service::HistoryService, stats_service::StatsService,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub attempt_service: AttemptService,
    pub history_service: HistoryService,
    pub stats_service: StatsService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        let auth_service = AuthService::new(pool.clone());
        let catalog_service = CatalogService::new(pool.clone());
        let attempt_service = AttemptService::new(pool.clone());
        let history_service = HistoryService::new(pool.clone());
        let stats_service = StatsService::new(pool.clone());

        Self {
            pool,
            auth_service,
            catalog_service,
            attempt_service,
            history_service,
            stats_service,
        }
    }
}
