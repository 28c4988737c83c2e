use crate::PostgresNotificationEngine;
use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

/// Drives the reminder engine on a fixed interval. A failing tick is
/// logged and retried on the next interval; the loop itself never exits.
pub async fn run(engine: Arc<PostgresNotificationEngine>, tick_seconds: u64) -> Result<()> {
    info!(tick_seconds, "Notification loop started");

    loop {
        let today = chrono::Local::now().date_naive();
        match engine.run_tick(today).await {
            Ok(summary) => info!(
                overdue_marked = summary.overdue_marked,
                sent = summary.sent,
                failed = summary.failed,
                deduped = summary.deduped,
                companies_skipped = summary.companies_skipped,
                "Notification tick finished"
            ),
            Err(e) => error!("Notification tick failed: {}", e),
        }

        tokio::time::sleep(Duration::from_secs(tick_seconds)).await;
    }
}
