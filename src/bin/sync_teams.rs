use anyhow::{Context, Result};
use clap::Parser;
use fantasy_sync::{
    ExternalKey, SyncOutcome, SyncReport,
    bootstrap::{build_source, connect_repository, init_tracing},
    config::AppConfig,
    sync::TeamSyncService,
};
use tokio::sync::watch;
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "sync_teams")]
#[command(about = "Pull teams from API-Football and reconcile them into local storage")]
struct Cli {
    /// Re-sync a single team instead of running a full pass.
    #[arg(long)]
    external_key: Option<i64>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let repository = connect_repository(&config).await?;
    let source = build_source(&config)?;
    let service = TeamSyncService::new(source, repository);

    match cli.external_key {
        Some(raw) => {
            let outcome = service
                .sync_single(ExternalKey::new(raw))
                .await
                .with_context(|| format!("failed to sync team {raw}"))?;
            print_outcome(&outcome, cli.json)
        }
        None => {
            let (cancel_tx, cancel_rx) = watch::channel(false);
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        warn!("interrupt received, stopping after the current team");
                        let _ = cancel_tx.send(true);
                    }
                    Err(err) => error!(error = %err, "unable to install Ctrl+C signal handler"),
                }
            });

            let report = service
                .run_sync_until(&cancel_rx)
                .await
                .context("failed to sync teams")?;
            print_report(&report, cli.json)
        }
    }
}

fn print_report(report: &SyncReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "Synced teams: {} created, {} updated, {} skipped{}",
        report.created,
        report.updated,
        report.skipped,
        if report.cancelled { " (cancelled)" } else { "" }
    );
    for skip in &report.skips {
        println!(
            "  skipped {} at {}: {}",
            skip.external_key, skip.stage, skip.reason
        );
    }
    Ok(())
}

fn print_outcome(outcome: &SyncOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    let (verb, team) = match outcome {
        SyncOutcome::Created(team) => ("Created", team),
        SyncOutcome::Updated(team) => ("Updated", team),
    };
    println!(
        "{verb} team {} (external key {}, id {})",
        team.name, team.external_key, team.id
    );
    Ok(())
}
