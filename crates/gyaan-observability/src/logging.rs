//! Structured logging on top of `tracing`.
//!
//! Console output goes to stderr so that chat replies on stdout stay clean.
//! `RUST_LOG`, when set, wins over the configured level.

use std::path::{Path, PathBuf};

use gyaan_config::{expand_tilde, LogLevel, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::error::{ObservabilityError, Result};

/// Dependencies that are chatty at debug level.
const QUIET_MODULES: &[(&str, &str)] = &[("hyper", "warn"), ("reqwest", "warn"), ("rustls", "warn")];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the file writer alive. Drop it only at process exit or buffered
/// lines are lost.
#[derive(Debug)]
pub struct LogManager {
    level: LogLevel,
    file: Option<PathBuf>,
    _guard: Option<WorkerGuard>,
}

impl LogManager {
    /// Install the global subscriber. `level_override` replaces the
    /// configured level, e.g. for `--debug`.
    pub fn init(config: &LoggingConfig, level_override: Option<LogLevel>) -> Result<Self> {
        let level = level_override.unwrap_or(config.level);
        let filter = build_filter(level)?;

        let mut layers: Vec<BoxedLayer> = vec![console_layer(config.json_format)];

        let mut file = None;
        let mut guard = None;
        if let Some(raw) = config.file.as_deref().filter(|p| !p.trim().is_empty()) {
            let path = expand_tilde(raw)
                .ok_or_else(|| ObservabilityError::logging(format!("Invalid log path: {}", raw)))?;
            let (layer, worker_guard) = file_layer(&path, config.json_format)?;
            layers.push(layer);
            file = Some(path);
            guard = Some(worker_guard);
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()
            .map_err(|e| ObservabilityError::init(e.to_string()))?;

        tracing::debug!(level = %level, file = ?file, "logging initialized");

        Ok(Self {
            level,
            file,
            _guard: guard,
        })
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

/// Filter for `level`, unless `RUST_LOG` is set.
pub fn build_filter(level: LogLevel) -> Result<EnvFilter> {
    let directives = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(env) if !env.trim().is_empty() => return parse_filter(&env),
        _ => level.as_str().to_string(),
    };

    let mut filter = parse_filter(&directives)?;
    for (module, module_level) in QUIET_MODULES {
        filter = filter.add_directive(
            format!("{}={}", module, module_level)
                .parse()
                .map_err(|e| ObservabilityError::logging(format!("Invalid directive: {}", e)))?,
        );
    }
    Ok(filter)
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| ObservabilityError::logging(format!("Invalid log level: {}", e)))
}

fn console_layer(json: bool) -> BoxedLayer {
    if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    }
}

fn file_layer(path: &Path, json: bool) -> Result<(BoxedLayer, WorkerGuard)> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| ObservabilityError::logging(format!("Invalid log path: {:?}", path)))?;
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = if json {
        fmt::layer().json().with_ansi(false).with_writer(writer).boxed()
    } else {
        fmt::layer().with_ansi(false).with_writer(writer).boxed()
    };
    Ok((layer, guard))
}

/// Span carrying the chat session id.
pub fn session_span(session_id: &str) -> tracing::Span {
    tracing::info_span!("session", session_id = %session_id)
}

/// Span for one submitted message within a session.
pub fn turn_span(session_id: &str, turn: usize) -> tracing::Span {
    tracing::info_span!("turn", session_id = %session_id, turn)
}
