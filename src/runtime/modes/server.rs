//! Server mode
//!
//! Starts the TCP registration listener and the HTTP redirect server over
//! one shared [`UrlStore`], then waits for either the HTTP server to stop or
//! a shutdown signal.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::Server;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::services::RedirectService;
use crate::config::StaticConfig;
use crate::errors::ShortkeyError;
use crate::runtime::lifetime;
use crate::storage::UrlStore;
use crate::system::registration::start_registration_server;

/// Build and bind the HTTP redirect server.
///
/// Every method and path is routed to [`RedirectService::handle_redirect`].
/// Returns the running server together with the addresses it bound.
pub fn build_http_server(
    config: &StaticConfig,
    store: Arc<UrlStore>,
) -> Result<(Server, Vec<SocketAddr>)> {
    let bind_address = config.http_bind_address();
    let http = &config.http;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .wrap(
                DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .default_service(web::to(RedirectService::handle_redirect))
    })
    .client_request_timeout(Duration::from_millis(http.client_request_timeout_ms))
    .client_disconnect_timeout(Duration::from_millis(http.client_disconnect_timeout_ms))
    .keep_alive(Duration::from_secs(http.keep_alive_secs))
    .shutdown_timeout(http.shutdown_timeout_secs)
    .workers(config.server.workers)
    .disable_signals()
    .bind(&bind_address)
    .map_err(|e| ShortkeyError::bind(format!("HTTP server on {}: {}", bind_address, e)))?;

    let addrs = server.addrs();
    for addr in &addrs {
        info!("HTTP redirect server listening on http://{}", addr);
    }

    Ok((server.run(), addrs))
}

/// Run both front ends until shutdown
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config).await?;
    let store = startup.store;

    let registration = start_registration_server(startup.registration_listener, Arc::clone(&store));

    let (server, _) = build_http_server(config, Arc::clone(&store))?;
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
            warn!("HTTP server stopped");
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            info!("Stopping HTTP server...");
            handle.stop(true).await;
        }
    }

    registration.abort();
    info!("Shut down with {} registered links", store.len());

    Ok(())
}
