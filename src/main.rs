mod calc;
mod config;
mod ipc;
mod model;
mod persist;
mod render;
mod server;
mod store;

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Logs go to stderr; stdout only carries the `ready <addr>` line.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "rosterd=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = config::Config::parse();
    init_tracing();
    config.validate()?;

    let store = store::Store::open(&config.data_dir).with_context(|| {
        format!(
            "failed to open roster records in {}",
            config.data_dir.display()
        )
    })?;
    let state = Arc::new(ipc::AppState {
        store: Arc::new(store),
        renderer: Arc::new(render::TextDocumentRenderer::new(config.reports_dir())),
        pass_mark: config.pass_mark,
    });

    let listener = TcpListener::bind(config.bind_addr())
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, data_dir = %config.data_dir.display(), "rosterd listening");

    let mut stdout = std::io::stdout();
    writeln!(stdout, "ready {addr}")?;
    stdout.flush()?;

    server::serve(listener, state)
}
