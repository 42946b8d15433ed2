//! Story Guardian sync agent
//!
//! Once a day, at local midnight, fetches a fresh access token and downloads
//! the latest bloom filter into the output directory. Runs until SIGINT or
//! SIGTERM.

mod cli;
mod logging;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use guardian_infra::api::{ClientCredentials, SyncApiClient};
use guardian_infra::scheduling::{DailyScheduler, SyncCycle};
use guardian_infra::{config, SyncContext};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format)?;

    let credentials = config::load().context("failed to load credentials")?;
    let settings = cli
        .sync_settings(config::upload_enabled_from_env())
        .context("failed to resolve sync settings")?;
    info!(
        output_dir = %settings.output_dir.display(),
        report = %settings.report_path.display(),
        upload_enabled = settings.upload_enabled,
        "Story Guardian starting"
    );

    let api = Arc::new(SyncApiClient::from_settings(&settings)?);
    let tokens = Arc::new(ClientCredentials::new(Arc::clone(&api), credentials));
    let scheduler = DailyScheduler::new(SyncCycle::new(api, tokens, settings));

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        signal_cancel.cancel();
    });

    if cli.run_now {
        let report = scheduler.run_cycle(&SyncContext::new(cancel)).await;
        anyhow::ensure!(report.is_success(), "sync cycle {} did not complete", report.cycle_id);
        return Ok(());
    }

    scheduler.run(cancel).await;
    info!("Story Guardian stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
