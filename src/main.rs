use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fortress", about = "Household financial-independence planner")]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Print the full dashboard for a JSON file of snapshots and settings.
    Report {
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    fortress::telemetry::init_logging(&cli.log_level)?;

    match cli.command {
        Command::Serve { port } => {
            fortress::api::run_http_server(port)
                .await
                .context("HTTP server failed")?;
        }
        Command::Report { input } => {
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let report = render_report(&raw)
                .with_context(|| format!("building dashboard from {}", input.display()))?;
            info!(path = %input.display(), "dashboard calculated");
            println!("{report}");
        }
    }

    Ok(())
}

/// Pretty JSON dashboard for a plan file; this is the only thing `report` writes to stdout.
fn render_report(raw: &str) -> anyhow::Result<String> {
    let dashboard = fortress::api::dashboard_from_json(raw)?;
    Ok(serde_json::to_string_pretty(&dashboard)?)
}
