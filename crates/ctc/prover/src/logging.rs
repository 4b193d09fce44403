//! Tracing subscriber setup.
//!
//! Logs go to stderr so that stdout carries nothing but the proof JSON.

use std::io;

use clap::ValueEnum;
use tracing::{Subscriber, level_filters::LevelFilter};
use tracing_subscriber::{
    EnvFilter, Layer, fmt::time::SystemTime, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Full format with all metadata (timestamp, level, target, spans).
    #[default]
    Full,
    /// Compact format with minimal metadata.
    Compact,
    /// JSON format for structured logging and log aggregation systems.
    Json,
}

/// Stderr log layer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StderrLogConfig {
    /// Output format.
    pub format: LogFormat,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level, overridable through `RUST_LOG`.
    pub global_level: LevelFilter,
    /// Stderr layer, `None` when logging is silenced.
    pub stderr_logs: Option<StderrLogConfig>,
}

/// Maps a verbosity count to a level filter: 1=ERROR, 2=WARN, 3=INFO, 4=DEBUG, 5+=TRACE.
pub const fn verbosity_to_level_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

impl LogConfig {
    /// Initialize the tracing subscriber with the configured options.
    ///
    /// This sets the global default subscriber. Should only be called once.
    pub fn init_tracing_subscriber(&self) -> eyre::Result<()> {
        let filter =
            EnvFilter::builder().with_default_directive(self.global_level.into()).from_env_lossy();

        tracing_subscriber::registry()
            .with(filter)
            .with(self.stderr_logs.as_ref().map(build_stderr_layer))
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {}", e))
    }
}

fn build_stderr_layer<S>(config: &StderrLogConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
{
    let base = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.format != LogFormat::Json)
        .with_timer(SystemTime);

    match config.format {
        LogFormat::Full => Box::new(base),
        LogFormat::Compact => Box::new(base.compact()),
        LogFormat::Json => Box::new(base.json()),
    }
}
