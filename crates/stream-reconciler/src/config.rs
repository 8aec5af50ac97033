use crate::errors::ReconcileError;

/// Environment variable read by [`ReconcilerConfig::from_env`].
pub const SHRINK_TOLERANCE_ENV: &str = "STREAM_RECONCILER_SHRINK_TOLERANCE";

/// Default number of UTF-16 code units a streaming delta may shrink by and
/// still be accepted.
pub const DEFAULT_SHRINK_TOLERANCE: usize = 5;

/// Tuning knobs for a [`Reconciler`](crate::Reconciler).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReconcilerConfig {
    /// How far (in UTF-16 code units) a delta may fall below the run's high-water mark
    /// before it is treated as out of order and ignored.
    pub shrink_tolerance: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            shrink_tolerance: DEFAULT_SHRINK_TOLERANCE,
        }
    }
}

impl ReconcilerConfig {
    /// Builds a config from `STREAM_RECONCILER_SHRINK_TOLERANCE`, falling back
    /// to defaults when the variable is unset or blank.
    pub fn from_env() -> Result<Self, ReconcileError> {
        match std::env::var(SHRINK_TOLERANCE_ENV) {
            Ok(raw) => Self::from_env_value(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    fn from_env_value(raw: &str) -> Result<Self, ReconcileError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        let shrink_tolerance = raw.parse::<usize>().map_err(|err| {
            ReconcileError::Config(format!(
                "{SHRINK_TOLERANCE_ENV} must be a non-negative integer, got {raw:?}: {err}"
            ))
        })?;
        Ok(Self { shrink_tolerance })
    }

    /// Overrides the shrink tolerance.
    pub fn shrink_tolerance(mut self, units: usize) -> Self {
        self.shrink_tolerance = units;
        self
    }
}
