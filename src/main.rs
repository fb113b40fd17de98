//! Autoflow - Natural-Language Browser Workflow Engine
//!
//! Main entry point for the workflow server.

use clap::Parser;

use autoflow::engine::Coordinator;
use autoflow::{server, Config};

/// Autoflow - Natural-Language Browser Workflow Engine
#[derive(Parser, Debug)]
#[command(name = "autoflow")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind address for the HTTP server
    #[arg(long)]
    host: Option<String>,

    /// Port for the HTTP server
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Simulated duration of one step in milliseconds
    #[arg(long)]
    step_delay_ms: Option<u64>,

    /// Skip the vision helper probe
    #[arg(long)]
    no_vision: bool,

    /// Run a single task to completion and print its final state
    /// instead of starting the server
    #[arg(long, short = 't')]
    task: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoflow=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Some(delay) = args.step_delay_ms {
        config.engine.step_delay_ms = delay;
    }

    if args.no_vision {
        config.vision.enabled = false;
    }

    // Single task mode
    if let Some(task) = args.task {
        let coordinator = Coordinator::from_config(&config).await;
        let state = coordinator.run_to_completion(&task).await?;
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    // Server mode
    server::start_server(config).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    Ok(())
}
