//! mentionkit CLI and REST API entry point.
//!
//! Binary name: `mkit`
//!
//! Parses CLI arguments, initializes the database and services, then
//! dispatches to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,mentionkit=debug",
        _ => "trace",
    };
    mentionkit_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    mentionkit_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "mkit", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (DB, registry, services)
    let state = AppState::init(cli.seed.clone()).await?;
    let user = cli.user.as_str();

    match cli.command {
        Commands::Compose {
            text,
            attachments,
            thread,
        } => {
            cli::compose::compose(&state, user, &text, &attachments, thread.as_deref(), cli.json)
                .await?;
        }

        Commands::Upload { path } => {
            cli::compose::upload(&state, user, &path, cli.json).await?;
        }

        Commands::Action {
            name,
            payload,
            thread,
        } => {
            cli::action::dispatch_action(
                &state,
                user,
                &name,
                payload.as_deref(),
                thread.as_deref(),
                cli.json,
            )
            .await?;
        }

        Commands::Entities => {
            cli::entity::list_entities(&state, cli.json).await?;
        }

        Commands::Entity { id } => {
            cli::entity::show_entity(&state, &id, cli.json).await?;
        }

        Commands::Thread { command } => {
            cli::thread::handle_thread_command(command, &state, user, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} mentionkit API listening on {}",
                console::style(">").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  Data directory: {}",
                console::style(state.data_dir.display()).dim()
            );
            println!(
                "  {}",
                console::style("Press Ctrl+C to stop").dim()
            );
            tracing::info!(
                entities = state.registry().len(),
                actions = ?state.chat_service.bridge().known_actions(),
                "server starting"
            );

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
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
}
