use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

static INIT: OnceCell<()> = OnceCell::new();

/// Toggle read by [`ObservabilityConfig::from_env`].
pub const LOG_ENABLED_ENV: &str = "STREAM_RECONCILER_LOG";
/// Filter override read by [`ObservabilityConfig::from_env`].
pub const LOG_LEVEL_ENV: &str = "STREAM_RECONCILER_LOG_LEVEL";
/// JSONL destination read by [`ObservabilityConfig::from_env`].
pub const JSON_LOG_PATH_ENV: &str = "STREAM_RECONCILER_JSON_LOG_PATH";

const DEFAULT_FILTER: &str = "info";
const DEFAULT_LOG_FILE: &str = "stream-reconciler.decisions.jsonl";

/// Where reconciler logs go and how much of them.
///
/// Per-chunk decisions are logged at `debug` (accepted) and `trace`
/// (ignored), so `stream_reconciler=trace` shows every discarded chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub enabled: bool,
    /// `EnvFilter` directives. `RUST_LOG` then `info` apply when unset or invalid.
    pub filter: Option<String>,
    /// Write JSONL to this file instead of the stderr console.
    pub json_log_path: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            filter: None,
            json_log_path: None,
        }
    }
}

impl ObservabilityConfig {
    /// Reads `STREAM_RECONCILER_LOG`, `STREAM_RECONCILER_LOG_LEVEL` and
    /// `STREAM_RECONCILER_JSON_LOG_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            enabled: non_blank(LOG_ENABLED_ENV)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            filter: non_blank(LOG_LEVEL_ENV).map(|v| v.trim().to_string()),
            json_log_path: non_blank(JSON_LOG_PATH_ENV).map(PathBuf::from),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }

    pub fn json_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_log_path = Some(path.into());
        self
    }

    fn env_filter(&self) -> EnvFilter {
        if let Some(directives) = &self.filter
            && let Ok(filter) = EnvFilter::try_new(directives)
        {
            return filter;
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }

    /// Splits the JSONL path into (directory, file name).
    fn json_target(&self) -> Option<(PathBuf, String)> {
        let path = self.json_log_path.as_deref()?;
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return Some((path.to_path_buf(), DEFAULT_LOG_FILE.to_string()));
        };
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Some((dir.to_path_buf(), file_name.to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Installs the process-wide subscriber described by `config`.
///
/// Returns true only for the call that installed it. A disabled config
/// installs nothing and leaves a later call free to install.
pub fn init_observability(config: &ObservabilityConfig) -> bool {
    if !config.enabled {
        return false;
    }
    let mut installed = false;
    INIT.get_or_init(|| {
        let env_filter = config.env_filter();
        installed = match config.json_target() {
            Some((dir, file_name)) => {
                let _ = std::fs::create_dir_all(&dir);
                let json_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_writer(tracing_appender::rolling::never(dir, file_name));
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(json_layer)
                    .try_init()
                    .is_ok()
            }
            // stdout carries decision output, so the console goes to stderr.
            None => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .is_ok(),
        };
    });
    installed
}
