use std::sync::Arc;

use clap::Parser;

use staticd::cli::Cli;
use staticd::config::{AppState, Config};
use staticd::handler::{service, Engine};
use staticd::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut cfg = Config::load_from(&cli.config)?;
    cli.apply(&mut cfg);

    logger::init(&cfg.logging)?;

    // Indexing blocks; finish it before the runtime starts accepting
    let mut builder = Engine::builder(&cfg.dir, cfg.serve.clone());
    if cli.cors {
        builder = builder.set_headers(service::cors);
    }
    let engine = builder.build()?;

    // Tokio runtime sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, engine))
}

async fn async_main(cfg: Config, engine: Engine) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    let local_addr = listener.local_addr()?;

    logger::log_server_start(&local_addr, &cfg, engine.asset_count());

    let state = Arc::new(AppState::new(cfg, engine));
    server::run(listener, state).await;
    Ok(())
}
