//! `todoterm` server: in-memory todo collection API.
//!
//! Serves `GET/POST /todos` and `PATCH/DELETE /todos/{id}` for the
//! `todoterm` client. Everything is kept in memory and lost on exit.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 127.0.0.1:3000
//! cargo run --bin todoterm-server
//!
//! # Run on custom address with some starting tasks
//! cargo run --bin todoterm-server -- --bind 0.0.0.0:8080 --seed-file todos.json
//!
//! # Or via environment variable
//! TODOTERM_SERVER_ADDR=127.0.0.1:8080 cargo run --bin todoterm-server
//! ```

use std::sync::Arc;

use clap::Parser;
use todoterm_server::api;
use todoterm_server::collection::TaskCollection;
use todoterm_server::config::{ServerCliArgs, ServerConfig};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let seed = match config.load_seed() {
        Ok(tasks) => tasks,
        Err(e) => {
            tracing::error!(error = %e, "failed to load seed tasks");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %config.bind_addr, seeded = seed.len(), "starting todoterm server");

    let collection = Arc::new(TaskCollection::with_tasks(seed));

    match api::start_server_with_state(&config.bind_addr, collection).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "todoterm server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}
