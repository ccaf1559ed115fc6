//! Server mode
//!
//! Configures and starts the HTTP server with all routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::config::get_config;
use crate::runtime::lifetime;

/// Build CORS middleware from configuration
///
/// - empty: same-origin only
/// - `"*"`: any origin, never with credentials
/// - otherwise: the listed origins, with credentials (cookie auth)
pub fn build_cors_middleware(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
        cors = cors.supports_credentials();
    }
    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .inspect_err(|e| error!("Server startup failed: {:#}", e))?;

    let config = get_config();
    let routes = config.routes.clone();
    let cors_origins = config.server.cors_origins.clone();
    if cors_origins.iter().any(|o| o == "*") {
        warn!("CORS allows any origin; cookie credentials are not shared cross-origin");
    }

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    // Clone db reference before storage moves into HttpServer closure
    let db_for_shutdown = startup.storage.get_db().clone();

    let server = HttpServer::new(move || {
        let startup = startup.clone();
        let routes = routes.clone();

        App::new()
            .wrap(build_cors_middleware(&cors_origins))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .configure(move |cfg| {
                startup.register(cfg);
                crate::api::configure_routes(cfg, &routes);
            })
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
