//! Atrium API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use atrium_core::AppError;
use atrium_infrastructure::{Argon2PasswordHasher, InMemoryRepository};
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackend, init_tracing};
use crate::api_services::{RepositorySet, build_app_state, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let repositories = match &config.storage {
        StorageBackend::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }
            RepositorySet::postgres(&pool)
        }
        StorageBackend::Memory => {
            if config.migrate_only {
                info!("memory backend has no migrations to apply");
                return Ok(());
            }
            tracing::warn!("using the in-memory backend; state is lost on restart");
            RepositorySet::in_memory(Arc::new(InMemoryRepository::new()))
        }
    };

    let app_state = build_app_state(
        &config,
        repositories,
        Arc::new(Argon2PasswordHasher::new()),
    )?;
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "atrium-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
