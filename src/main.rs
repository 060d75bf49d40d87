mod auth;
mod config;
mod db;
mod error;
mod fingerprint;
mod handlers;
mod models;
mod render;
mod voting;
mod widget;

use config::Config;
use db::Database;
use handlers::{AppState, create_router};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

use auth::TokenIssuer;
use voting::VotingEngine;
use widget::VotingWidget;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    // Initialize database
    let database = match Database::new(&config.database_url).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    // Wire everything once, handlers only see AppState
    let engine = Arc::new(VotingEngine::new(database));
    let tokens = match TokenIssuer::new(&config.token_secret, config.token_lifetime) {
        Ok(tokens) => Arc::new(tokens),
        Err(e) => {
            error!("Failed to set up vote tokens: {}", e);
            return;
        }
    };
    let widget = Arc::new(VotingWidget::new(engine, tokens));
    let app = create_router(AppState { widget });

    let listener = match TcpListener::bind(&config.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_address, e);
            return;
        }
    };
    info!("Article voting listening on {}", config.bind_address);

    // Peer addresses feed the visitor fingerprint
    let service = app.into_make_service_with_connect_info::<SocketAddr>();
    if let Err(why) = axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {:?}", why);
    }

    info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
