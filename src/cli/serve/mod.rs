//! Serve command - runs the gateway HTTP server

use std::net::SocketAddr;

use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::infrastructure::{logging, observability};

/// Overrides applied on top of the loaded configuration
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the backend data service
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,
}

/// Run the gateway server
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    let config = apply_overrides(config, &args);

    logging::init_logging(&config.logging);
    if let Some(e) = load_error {
        warn!(error = %e, "Configuration could not be loaded, using defaults");
    }

    let metrics = observability::init_metrics(&config.metrics);
    let state = crate::create_app_state(&config)?;
    let app = crate::create_app(&config, state, metrics);

    let addr = build_socket_addr(&config)?;
    info!("Starting gateway on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

fn apply_overrides(mut config: AppConfig, args: &ServeArgs) -> AppConfig {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = &args.backend_url {
        config.backend.base_url = url.clone();
    }
    config
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_config() {
        let args = ServeArgs {
            port: Some(9999),
            backend_url: Some("http://data:9000".into()),
        };

        let config = apply_overrides(AppConfig::default(), &args);

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.backend.base_url, "http://data:9000");
    }

    #[test]
    fn test_socket_addr() {
        let addr = build_socket_addr(&AppConfig::default()).unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let mut config = AppConfig::default();
        config.server.host = "not-an-ip".into();
        assert!(build_socket_addr(&config).is_err());
    }
}
