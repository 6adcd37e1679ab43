use crate::build_info;
use std::error::Error as StdError;

use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for runtime logs, from `LOG_FORMAT` (`json` or `text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("text") => Self::Text,
            _ => Self::Json,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

/// Installs the process-wide subscriber and logs one startup event.
///
/// `log` records from dependencies are bridged into `tracing`. `RUST_LOG`
/// overrides `default_level`.
pub fn init_logging(service: &str, storage: &str, default_level: &str) -> LogFormat {
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());
    install_subscriber(format, default_level);

    tracing::info!(
        event = "logging_initialized",
        service,
        storage,
        build_version = build_info::VERSION,
        build_commit = build_info::short_commit_hash(),
        log_format = format.as_str(),
        "initialized logging"
    );

    format
}

fn install_subscriber(format: LogFormat, default_level: &str) {
    // Either may already be installed, e.g. by a test harness.
    let _ = LogTracer::init();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true),
            )
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };
}

/// Renders an error with its full `source()` chain, one cause per line.
///
/// Used at process boundaries, where `%err` alone would drop the pool or
/// driver error underneath.
pub fn format_error_report(err: &(dyn StdError + 'static)) -> String {
    let mut report = format!("error: {err}");

    let mut current_source = err.source();
    let mut source_index = 1usize;
    while let Some(source) = current_source {
        report.push_str(&format!("\ncaused by ({source_index}): {source}"));
        current_source = source.source();
        source_index = source_index.saturating_add(1);
    }

    report
}
