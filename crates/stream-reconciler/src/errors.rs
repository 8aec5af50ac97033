/// Errors surfaced by the reconciler API.
///
/// Reconciliation itself never fails: duplicate, shrinking and stale chunks
/// are ordinary `Action::Ignored` decisions. These variants cover input that
/// cannot be mapped onto a stage, bad configuration, and the async feed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// Stage string is neither `delta` nor `final`.
    #[error("invalid stage: {stage:?} (expected \"delta\" or \"final\")")]
    InvalidStage { stage: String },
    /// Invalid reconciler or feed configuration.
    #[error("config error: {0}")]
    Config(String),
    /// The feed task stopped accepting events.
    #[error("reconciler feed closed")]
    FeedClosed,
    /// The feed task ended without handing the reconciler back.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ReconcileError {
    /// Creates an invalid-stage error for the given raw stage value.
    pub fn invalid_stage(stage: impl Into<String>) -> Self {
        Self::InvalidStage {
            stage: stage.into(),
        }
    }

    pub(crate) fn protocol_msg(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
