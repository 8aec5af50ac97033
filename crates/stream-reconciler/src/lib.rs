//! Reconciles the chunks of a streamed bot reply into message-bubble decisions.
//!
//! Every chunk carries a run id, a stage (`delta` while streaming, `final`
//! when done) and the cumulative text so far. The [`Reconciler`] keeps one
//! record per run id and answers each chunk with `new_bubble`, `updated`,
//! `finalized` or `ignored`, absorbing duplicates, replays and mildly
//! reordered deltas.
//!
//! ```
//! use stream_reconciler::prelude::*;
//!
//! let mut reconciler = Reconciler::new();
//! assert_eq!(
//!     reconciler.reconcile(Stage::Delta, "run-1", "Hello").action,
//!     Action::NewBubble
//! );
//! assert_eq!(
//!     reconciler.reconcile(Stage::Delta, "run-1", "Hello world").action,
//!     Action::Updated
//! );
//! assert_eq!(
//!     reconciler.reconcile(Stage::Final, "run-1", "Hello world!").action,
//!     Action::Finalized
//! );
//! assert!(reconciler.reconcile(Stage::Final, "run-1", "Hello world!").is_ignored());
//! ```

/// Reconciler settings and their environment overrides.
pub mod config;
/// Decisions handed to the UI layer.
pub mod decision;
/// Public error type.
pub mod errors;
/// Transport-facing input and output shapes.
pub mod event;
/// Async wrapper that runs a reconciler on its own task.
pub mod feed;
/// Run ids and stages.
pub mod model;
/// Tracing subscriber setup.
pub mod observability;
/// Common imports for typical usage.
pub mod prelude;
mod proptest;
/// The reconciliation state machine.
pub mod reconciler;
/// Per-run state.
pub mod record;
/// Duplicate-widget check.
pub mod widgets;

pub use config::ReconcilerConfig;
pub use decision::{Action, Decision, Reason};
pub use errors::ReconcileError;
pub use event::{IncomingEvent, ReconciledEvent};
pub use feed::{FeedSender, ReconcilerFeed};
pub use model::{RunId, Stage};
pub use observability::{ObservabilityConfig, init_observability};
pub use reconciler::Reconciler;
pub use record::RunRecord;
pub use widgets::{RenderedWidgets, should_render};
