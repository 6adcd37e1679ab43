use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::domain::entities::{shelf_operation_name, Operation, Shelf};
use crate::domain::error::DomainError;
use crate::gateway::{GatewayError, Insert, ShelfGateway};
use crate::logging::format_error_report;
use crate::server::monitoring::SHELF_OPERATION_METRICS;

/// Labels of the simulated provisioning stages, in order.
pub const SHELF_CREATION_STAGES: [&str; 5] = [
    "PLANTING_TREE",
    "CUTTING_TREE",
    "BUILDING_SHELF",
    "INSTALLING_SHELF",
    "FINISHED_SHELF",
];

const LAST_STAGE: usize = SHELF_CREATION_STAGES.len() - 1;

/// Timing of the shelf creation tracker.
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    /// Delay between two stage advances of one job.
    pub stage_interval: Duration,
    /// How long a finished job stays queryable.
    pub expiration: Duration,
    /// Period of the cleanup pass over finished jobs.
    pub sweep_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            stage_interval: Duration::from_secs(1),
            expiration: Duration::from_secs(10),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ShelfCreationStatus {
    stage: usize,
    error: Option<DomainError>,
    finished: bool,
    finish_time: Option<Instant>,
}

impl ShelfCreationStatus {
    fn view(&self, shelf_name: &str) -> Operation {
        Operation {
            name: shelf_operation_name(shelf_name),
            stage: SHELF_CREATION_STAGES[self.stage],
            percentage: (self.stage * 100 / LAST_STAGE) as u32,
            error: self.error.clone(),
        }
    }

    fn expired(&self, now: Instant, expiration: Duration) -> bool {
        match self.finish_time {
            Some(finish_time) if self.finished => now > finish_time + expiration,
            _ => false,
        }
    }
}

enum StageOutcome {
    Advanced,
    Finished,
    Failed,
    /// The status entry is gone; nothing left to drive.
    Abandoned,
}

struct Tracker<G> {
    gateway: G,
    config: TrackerConfig,
    pending: Mutex<HashMap<String, ShelfCreationStatus>>,
    shutdown: CancellationToken,
}

/// Creates shelves through a staged background job and tracks its progress.
///
/// At most one job exists per shelf name until the finished job expires.
/// Cloning shares the same set of jobs.
pub struct CreateShelf<G> {
    tracker: Arc<Tracker<G>>,
}

impl<G> Clone for CreateShelf<G> {
    fn clone(&self) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
        }
    }
}

impl<G: ShelfGateway + 'static> CreateShelf<G> {
    /// Builds the tracker and spawns its cleanup task on the current runtime.
    ///
    /// Cancelling `shutdown` stops the cleanup task and every running job.
    pub fn new(gateway: G, config: TrackerConfig, shutdown: CancellationToken) -> Self {
        let tracker = Arc::new(Tracker {
            gateway,
            config,
            pending: Mutex::new(HashMap::new()),
            shutdown,
        });
        tokio::spawn(sweep_expired_loop(Arc::downgrade(&tracker)));
        Self { tracker }
    }

    /// Registers a job for `shelf` and returns its initial state without waiting for it.
    pub fn start(&self, shelf: Shelf) -> Result<Operation, DomainError> {
        let operation = {
            let mut pending = self.tracker.pending();
            match pending.entry(shelf.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(DomainError::already_exists(format!(
                        "create shelf {} operation already exists",
                        shelf.name
                    )));
                }
                Entry::Vacant(slot) => slot.insert(ShelfCreationStatus::default()).view(&shelf.name),
            }
        };

        if let Some(metrics) = SHELF_OPERATION_METRICS.get() {
            metrics.started_total.inc();
            metrics.pending.inc();
        }
        tracing::info!(shelf = %shelf.name, "accepted shelf creation");

        let cancel = self.tracker.shutdown.child_token();
        tokio::spawn(run_job(Arc::clone(&self.tracker), shelf, cancel));

        Ok(operation)
    }

    /// Reports the current state of the job for `shelf_name`.
    pub fn get_operation(&self, shelf_name: &str) -> Result<Operation, DomainError> {
        self.tracker
            .pending()
            .get(shelf_name)
            .map(|status| status.view(shelf_name))
            .ok_or_else(|| {
                DomainError::not_found(format!("create shelf {shelf_name} operation not found"))
            })
    }

    /// Drops finished jobs whose expiration window has passed at `now`.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        self.tracker.sweep_expired(now)
    }
}

impl<G: ShelfGateway> Tracker<G> {
    // Never held across an await.
    fn pending(&self) -> MutexGuard<'_, HashMap<String, ShelfCreationStatus>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn advance(&self, shelf: &Shelf) -> StageOutcome {
        let reached_last_stage = {
            let mut pending = self.pending();
            let Some(status) = pending.get_mut(&shelf.name) else {
                return StageOutcome::Abandoned;
            };
            if status.finished {
                return StageOutcome::Abandoned;
            }
            if status.stage + 1 < LAST_STAGE {
                status.stage += 1;
                false
            } else {
                true
            }
        };

        if !reached_last_stage {
            return StageOutcome::Advanced;
        }

        let result = match self.gateway.create_shelf(shelf).await {
            Ok(Insert::Created(_)) => Ok(()),
            Ok(Insert::Conflict) => Err(DomainError::already_exists(format!(
                "shelf {} already exists",
                shelf.name
            ))),
            Ok(Insert::ParentMissing) => Err(DomainError::internal(
                format!("failed to create shelf {}", shelf.name),
                GatewayError::Storage("shelf insert reported a missing parent".to_string()),
            )),
            Err(e) => Err(DomainError::internal(
                format!("failed to create shelf {}", shelf.name),
                e,
            )),
        };

        self.finish(&shelf.name, result)
    }

    fn finish(&self, shelf_name: &str, result: Result<(), DomainError>) -> StageOutcome {
        let mut pending = self.pending();
        let Some(status) = pending.get_mut(shelf_name) else {
            return StageOutcome::Abandoned;
        };

        let outcome = match result {
            Ok(()) => {
                status.stage = LAST_STAGE;
                StageOutcome::Finished
            }
            Err(err) => {
                match &err {
                    DomainError::Internal { .. } => tracing::error!(
                        shelf = shelf_name,
                        report = %format_error_report(&err),
                        "shelf creation failed"
                    ),
                    _ => tracing::warn!(shelf = shelf_name, error = %err, "shelf creation failed"),
                }
                status.error = Some(err);
                StageOutcome::Failed
            }
        };
        status.finished = true;
        status.finish_time = Some(Instant::now());
        outcome
    }

    fn sweep_expired(&self, now: Instant) -> usize {
        let expiration = self.config.expiration;
        let mut pending = self.pending();
        let before = pending.len();
        pending.retain(|_, status| !status.expired(now, expiration));
        let removed = before - pending.len();
        drop(pending);

        if removed > 0 {
            if let Some(metrics) = SHELF_OPERATION_METRICS.get() {
                metrics.swept_total.inc_by(removed as u64);
            }
        }
        removed
    }
}

async fn run_job<G: ShelfGateway>(tracker: Arc<Tracker<G>>, shelf: Shelf, cancel: CancellationToken) {
    let period = tracker.config.stage_interval;
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(shelf = %shelf.name, "shelf creation stopped by shutdown");
                return;
            }
            _ = ticker.tick() => {}
        }

        match tracker.advance(&shelf).await {
            StageOutcome::Advanced => continue,
            StageOutcome::Finished => {
                tracing::info!(shelf = %shelf.name, "shelf created");
                if let Some(metrics) = SHELF_OPERATION_METRICS.get() {
                    metrics.succeeded_total.inc();
                    metrics.pending.dec();
                }
                return;
            }
            StageOutcome::Failed => {
                if let Some(metrics) = SHELF_OPERATION_METRICS.get() {
                    metrics.failed_total.inc();
                    metrics.pending.dec();
                }
                return;
            }
            StageOutcome::Abandoned => return,
        }
    }
}

async fn sweep_expired_loop<G: ShelfGateway>(tracker: Weak<Tracker<G>>) {
    let (period, shutdown) = match tracker.upgrade() {
        Some(tracker) => (tracker.config.sweep_interval, tracker.shutdown.clone()),
        None => return,
    };
    let mut ticker = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let Some(tracker) = tracker.upgrade() else {
            return;
        };
        let removed = tracker.sweep_expired(Instant::now());
        if removed > 0 {
            tracing::debug!(removed, "swept expired shelf operations");
        }
    }
}
