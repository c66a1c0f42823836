//! Background report computation.
//!
//! Report requests enqueue their id on a bounded channel; a worker task
//! drains it, loads the project snapshot, runs the aggregator, and stores
//! the result. Delivery is at-least-once: the write-once guard in
//! `store_report_data` makes redelivered jobs harmless, and jobs whose
//! report or project has vanished are logged and dropped.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use deck_core::reports::aggregate;

use crate::error::DatabaseError;
use crate::service::DeckService;

/// Sending half of the report job channel, held by the service.
#[derive(Debug, Clone)]
pub struct ReportQueue {
    tx: mpsc::Sender<String>,
}

impl ReportQueue {
    /// Create a queue with the given capacity, returning the receiving
    /// half for [`spawn_report_worker`].
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueue a report id. A full or closed channel is logged and the
    /// job dropped; the report stays pending and a later one-shot worker
    /// pass will pick it up.
    pub fn enqueue(&self, report_id: String) {
        if let Err(e) = self.tx.try_send(report_id) {
            warn!(error = %e, "report queue full or closed, job deferred");
        }
    }
}

/// Spawn the worker loop. Runs until every queue sender is dropped.
pub fn spawn_report_worker(
    service: Arc<DeckService>,
    mut rx: mpsc::Receiver<String>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(report_id) = rx.recv().await {
            if let Err(e) = run_report_job(&service, &report_id).await {
                warn!(report_id, error = %e, "report job failed");
            }
        }
        debug!("report worker shutting down");
    })
}

/// Compute and store one report. Missing reports and projects are
/// warn-logged no-ops, not errors: the request may have been deleted
/// between enqueue and execution.
pub async fn run_report_job(service: &DeckService, report_id: &str) -> Result<(), DatabaseError> {
    let Some(report) = service.find_report(report_id).await? else {
        warn!(report_id, "report no longer exists, skipping job");
        return Ok(());
    };
    if report.is_ready {
        debug!(report_id, "report already computed, skipping job");
        return Ok(());
    }

    let Some(input) = service.load_report_input(&report.project_id).await? else {
        warn!(
            report_id,
            project_id = report.project_id,
            "project no longer exists, skipping job"
        );
        return Ok(());
    };

    let data = aggregate(&input, Utc::now().date_naive());
    let stored = service.store_report_data(report_id, &data).await?;
    if stored {
        debug!(report_id, "report computed and stored");
    } else {
        debug!(report_id, "report was computed concurrently, result discarded");
    }
    Ok(())
}

/// One-shot pass over every pending report. Used by the CLI worker
/// command; returns the number of reports processed.
pub async fn run_pending_reports(service: &DeckService) -> Result<u32, DatabaseError> {
    let ids = service.pending_report_ids().await?;
    let mut processed = 0u32;
    for id in ids {
        run_report_job(service, &id).await?;
        processed += 1;
    }
    Ok(processed)
}
