//! Demo host for the update check: starts the check, does some work, prints notices.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trivy_update::update::notify_updates;
use trivy_update::{UpdateChecker, UpdateConfig, UpdateState};

/// Run a simulated trivy invocation and show any release notices.
#[derive(Parser)]
#[command(name = "trivy-notices", version, about)]
struct Cli {
    /// Path to TOML configuration file (defaults to the user config dir).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not contact the version check endpoint.
    #[arg(long)]
    skip_version_check: bool,

    /// Omit identifying headers from the version check.
    #[arg(long)]
    disable_telemetry: bool,

    /// Version to report as currently running.
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    current_version: String,

    /// How long the simulated command runs before notices are printed.
    #[arg(long, default_value_t = 1500)]
    work_ms: u64,

    /// Arguments of the simulated command; only flag names are reported.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("trivy_update=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = UpdateConfig::load(cli.config.as_deref())?;
    let skip = config.skip_version_check || cli.skip_version_check;
    let no_telemetry = config.disable_telemetry || cli.disable_telemetry;
    let config = config
        .with_skip_version_check(skip)
        .with_disable_telemetry(no_telemetry);

    let state = Arc::new(UpdateState::new());
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, cancelling version check");
            cancel_clone.cancel();
        }
    });

    UpdateChecker::new(config).check_update(
        Arc::clone(&state),
        cancel,
        &cli.current_version,
        &cli.args,
    );

    tokio::time::sleep(Duration::from_millis(cli.work_ms)).await;

    notify_updates(&state, &mut std::io::stderr())?;
    Ok(())
}
