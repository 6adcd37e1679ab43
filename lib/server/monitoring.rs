use crate::build_info;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::{counter::Counter, gauge::Gauge};
use prometheus_client::registry::Registry;
use tokio::sync::OnceCell;

/// Registers build identity as a labeled gauge fixed at `1`.
pub fn register_build_info_metric(registry: &mut Registry, prefix: &str) {
    let build_info_metric = Family::<BuildInfoLabels, Gauge>::default();
    build_info_metric
        .get_or_create(&BuildInfoLabels {
            service: "library",
            version: build_info::VERSION,
            commit: build_info::short_commit_hash(),
        })
        .set(1);
    let sub_registry = registry.sub_registry_with_prefix(prefix);
    sub_registry.register(
        "build_info",
        "Build identity labels for this process",
        build_info_metric,
    );
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct BuildInfoLabels {
    service: &'static str,
    version: &'static str,
    commit: &'static str,
}

#[derive(Clone)]
pub struct ShelfOperationMetrics {
    /// Shelf creation jobs accepted.
    pub started_total: Counter,
    /// Jobs whose shelf write succeeded.
    pub succeeded_total: Counter,
    /// Jobs that ended with a conflict or storage error.
    pub failed_total: Counter,
    /// Jobs still advancing through their stages.
    pub pending: Gauge,
    /// Finished jobs removed after their expiration window.
    pub swept_total: Counter,
}

impl ShelfOperationMetrics {
    fn init() -> Self {
        Self {
            started_total: Counter::default(),
            succeeded_total: Counter::default(),
            failed_total: Counter::default(),
            pending: Gauge::default(),
            swept_total: Counter::default(),
        }
    }

    pub fn register(registry: &mut Registry, prefix: &str) -> Self {
        let metrics = Self::init();
        let sub_registry = registry.sub_registry_with_prefix(prefix);
        sub_registry.register(
            "started",
            "Total number of shelf creation operations started",
            metrics.started_total.clone(),
        );
        sub_registry.register(
            "succeeded",
            "Total number of shelf creation operations that created their shelf",
            metrics.succeeded_total.clone(),
        );
        sub_registry.register(
            "failed",
            "Total number of shelf creation operations that finished with an error",
            metrics.failed_total.clone(),
        );
        sub_registry.register(
            "pending",
            "Shelf creation operations not yet finished",
            metrics.pending.clone(),
        );
        sub_registry.register(
            "swept",
            "Total number of finished operations removed after expiration",
            metrics.swept_total.clone(),
        );
        metrics
    }
}

pub static SHELF_OPERATION_METRICS: OnceCell<ShelfOperationMetrics> = OnceCell::const_new();
