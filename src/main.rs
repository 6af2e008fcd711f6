use std::sync::Arc;

use dispatcher::config::{AppState, Config};
use dispatcher::dispatch::{Dispatcher, RouteTableBuilder};
use dispatcher::handler::StaticResourceResolver;
use dispatcher::{logger, server};

mod app;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // First CLI argument overrides the config file name
    let cfg = match std::env::args().nth(1) {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!(workers, "Using configured worker threads");
    } else {
        tracing::info!("Using default worker threads (CPU cores)");
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = cfg.socket_addr()?;

    let registry = app::registry();
    tracing::info!(controllers = registry.len(), "Controllers registered");
    let table = RouteTableBuilder::new(&registry).build(cfg.base_package())?;
    let route_count = table.len();
    let resolver = StaticResourceResolver::from_config(&cfg.resources);
    let dispatcher = Dispatcher::new(table, resolver);

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg, route_count);

    let state = Arc::new(AppState::new(cfg, dispatcher));
    server::run(listener, state, server::shutdown_signal()).await?;
    Ok(())
}
