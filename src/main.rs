use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use fileserve::config::{self, AppState, Config};
use fileserve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, sizing worker threads from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    if !Path::new(&cfg.files.root).is_dir() {
        logger::log_warning(&format!(
            "Root path '{}' is not a directory; every request will fail",
            cfg.files.root
        ));
    }

    let state = Arc::new(AppState::new(&cfg));
    server::signal::start_signal_handler(state.shutdown.clone())?;

    logger::log_server_start(&addr, &cfg);

    server::start_server_loop(listener, state, Arc::new(AtomicUsize::new(0))).await;
    Ok(())
}
