//! chatrelay entry point.
//!
//! Binary name: `chatrelay`
//!
//! Parses CLI arguments, initializes tracing, database and provider, then
//! serves the HTTP API until Ctrl+C or SIGTERM.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing::{error, info};

use chatrelay_observe::tracing_setup::{init_tracing, shutdown_tracing};
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "chatrelay", &mut std::io::stdout());
        }
        Commands::Serve { ref host, port } => {
            // A missing .env file is normal in production.
            dotenvy::dotenv().ok();

            init_tracing(cli.otel, cli.log_filter())
                .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

            let result = serve(host, port, cli.quiet).await;
            shutdown_tracing();
            result?;
        }
    }

    Ok(())
}

async fn serve(host: &str, port: u16, quiet: bool) -> anyhow::Result<()> {
    let state = AppState::init().await?;

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        %addr,
        data_dir = %state.data_dir.display(),
        model = %state.config.provider.model,
        "Server listening"
    );
    if !quiet {
        println!(
            "  {} chatrelay listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state.clone());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db_pool.close().await;
    info!("Server stopped");
    if !quiet {
        println!("\n  Server stopped.");
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(%err, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
