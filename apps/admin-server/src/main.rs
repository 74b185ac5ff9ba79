// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use admin_rust_server::{
    api::router,
    auth::{hash_password, TokenManager},
    config::{Config, LogFormat, SeedAdmin, DEFAULT_LOG_FILTER},
    models::NewAdmin,
    state::AppState,
    storage::{self, InMemoryStore},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn seed(store: &InMemoryStore, seed: &SeedAdmin) -> Result<(), Box<dyn std::error::Error>> {
    let admin = store
        .seed_admin(
            NewAdmin {
                email: seed.email.clone(),
                password_hash: hash_password(&seed.password)?,
                name: "Seed Admin".to_string(),
            },
            true,
        )
        .await?;
    info!(admin_id = admin.id, email = %admin.email, "Seeded verified admin");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let tokens = Arc::new(TokenManager::new(&config.token_secret));

    let state = match &config.database_url {
        Some(url) => {
            let pool = storage::connect(url, config.db_max_connections).await?;
            info!(max_connections = config.db_max_connections, "Connected to PostgreSQL");
            AppState::postgres(pool, tokens)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            let store = Arc::new(InMemoryStore::new());
            if let Some(admin) = &config.seed_admin {
                seed(&store, admin).await?;
            }
            AppState::in_memory(store, tokens)
        }
    };

    let addr = config.socket_addr()?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Admin API server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
