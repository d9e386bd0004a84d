use std::sync::Arc;

use anyhow::Context;
use rawhttp::config::Config;
use rawhttp::routes::dispatcher::Dispatcher;
use rawhttp::routes::router::FileRouter;
use rawhttp::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();

    let router = FileRouter::scan(&cfg.public_dir, &cfg.route_extensions)
        .with_context(|| format!("loading routes from {}", cfg.public_dir.display()))?;
    let dispatcher = Arc::new(Dispatcher::with_defaults(router));

    tokio::select! {
        res = server::listener::run(&cfg, dispatcher) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
