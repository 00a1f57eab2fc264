//! Finaizen Sweeper
//!
//! Loads the snapshot, materializes every due scheduled transaction, and
//! writes the snapshot back. Repeats on an interval unless configured to
//! run once.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finaizen_core::sweep::SweepService;
use finaizen_db::{InMemoryStore, Snapshot};
use finaizen_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finaizen=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let tz = config.scheduler.tz()?;
    let snapshot_path = Path::new(&config.storage.snapshot_path);

    let store = Arc::new(Snapshot::load(snapshot_path).await?.into_store());
    info!(
        path = %snapshot_path.display(),
        schedules = store.schedule_count(),
        history = store.history_count(),
        timezone = %tz,
        "Store loaded"
    );

    let service = SweepService::new(Arc::clone(&store), Arc::clone(&store));

    if config.scheduler.run_once {
        return sweep_and_save(&service, &store, snapshot_path, tz).await;
    }

    let every_secs = config.scheduler.sweep_interval_secs.max(1);
    let mut ticker = tokio::time::interval(Duration::from_secs(every_secs));
    info!(every_secs, "Sweeper started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = sweep_and_save(&service, &store, snapshot_path, tz).await {
                    error!(error = %err, "Sweep failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Snapshot::capture(&store).save(snapshot_path).await?;
    Ok(())
}

/// Current wall-clock time in the configured timezone.
fn local_now(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

async fn sweep_and_save(
    service: &SweepService<InMemoryStore, InMemoryStore>,
    store: &InMemoryStore,
    path: &Path,
    tz: Tz,
) -> anyhow::Result<()> {
    let report = service.run(local_now(tz))?;
    if report.executed > 0 {
        Snapshot::capture(store).save(path).await?;
    }
    Ok(())
}
