//! Common imports for typical reconciler usage.
pub use crate::{
    Action, Decision, IncomingEvent, Reason, ReconcileError, ReconciledEvent, Reconciler,
    ReconcilerConfig, ReconcilerFeed, RunId, RunRecord, Stage,
};
