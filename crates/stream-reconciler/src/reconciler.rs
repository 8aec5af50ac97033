use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, trace};

use crate::config::ReconcilerConfig;
use crate::decision::{Action, Decision, Reason};
use crate::errors::ReconcileError;
use crate::event::IncomingEvent;
use crate::model::{RunId, Stage, text_len};
use crate::record::RunRecord;

/// Decides, chunk by chunk, how a streamed bot reply maps onto message bubbles.
///
/// The reconciler owns one [`RunRecord`] per run id. Every call runs to
/// completion and is the only place records are written; the read accessors
/// exist for diagnostics and tests. Callers must deliver chunks for a run in
/// the order the upstream source produced them.
#[derive(Debug, Default)]
pub struct Reconciler {
    config: ReconcilerConfig,
    records: HashMap<RunId, RunRecord>,
}

impl Reconciler {
    /// Creates a reconciler with default settings and an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reconciler with the given settings and an empty store.
    pub fn with_config(config: ReconcilerConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
        }
    }

    /// Returns the active settings.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Reconciles one chunk and returns the decision for the UI layer.
    pub fn reconcile(
        &mut self,
        stage: Stage,
        run_id: impl Into<RunId>,
        text: impl Into<String>,
    ) -> Decision {
        let run_id = run_id.into();
        let text = text.into();
        let decision = match stage {
            Stage::Delta => self.reconcile_delta(&run_id, text),
            Stage::Final => self.reconcile_final(&run_id, text),
        };
        if decision.is_ignored() {
            trace!(run_id = %run_id, stage = %stage, action = %decision.action, reason = %decision.reason, "chunk ignored");
        } else {
            debug!(run_id = %run_id, stage = %stage, action = %decision.action, reason = %decision.reason, "chunk reconciled");
        }
        decision
    }

    /// Reconciles a chunk whose stage is still a raw wire string.
    ///
    /// Unknown stages are rejected before the store is touched.
    pub fn reconcile_raw(
        &mut self,
        stage: &str,
        run_id: impl Into<RunId>,
        text: impl Into<String>,
    ) -> Result<Decision, ReconcileError> {
        let stage = stage.parse::<Stage>()?;
        Ok(self.reconcile(stage, run_id, text))
    }

    /// Reconciles a deserialized transport event.
    pub fn apply(&mut self, event: &IncomingEvent) -> Decision {
        self.reconcile(event.stage, event.run_id.clone(), event.text.clone())
    }

    fn reconcile_delta(&mut self, run_id: &RunId, text: String) -> Decision {
        let len = text_len(&text);
        let record = match self.records.entry(run_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(RunRecord::streaming(run_id.clone(), text));
                return Decision::new(Action::NewBubble, Reason::NewRun);
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        if record.finalized {
            // Replayed echoes of a finished reply must not reopen it.
            if text == record.text || len <= record.max_text_len {
                return Decision::new(Action::Ignored, Reason::DuplicateDeltaForFinalized);
            }
            record.reopen(text);
            return Decision::new(Action::NewBubble, Reason::ReopenedRun);
        }

        if len.saturating_add(self.config.shrink_tolerance) >= record.max_text_len {
            record.accept_delta(text, len);
            Decision::new(Action::Updated, Reason::LongerText)
        } else {
            Decision::new(Action::Ignored, Reason::ShorterText)
        }
    }

    fn reconcile_final(&mut self, run_id: &RunId, text: String) -> Decision {
        match self.records.get_mut(run_id) {
            // First final wins, even when a later one carries different text.
            Some(record) if record.finalized => {
                Decision::new(Action::Ignored, Reason::DuplicateFinal)
            }
            Some(record) => {
                let len = text_len(&text);
                record.finalize(text, len);
                Decision::new(Action::Finalized, Reason::UpdatedAndFinalized)
            }
            None => {
                self.records
                    .insert(run_id.clone(), RunRecord::finalized(run_id.clone(), text));
                Decision::new(Action::NewBubble, Reason::NewFinalMessage)
            }
        }
    }

    /// Returns the record for `run_id`, if any chunk has been seen for it.
    pub fn record(&self, run_id: &str) -> Option<&RunRecord> {
        self.records.get(run_id)
    }

    /// Returns true if a record exists for `run_id`.
    pub fn contains(&self, run_id: &str) -> bool {
        self.records.contains_key(run_id)
    }

    /// Iterates over all records in arbitrary order.
    pub fn records(&self) -> impl Iterator<Item = &RunRecord> {
        self.records.values()
    }

    /// Number of distinct run ids seen.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops the record for `run_id`. Retention is up to the owner; nothing in
    /// reconciliation calls this.
    pub fn forget(&mut self, run_id: &str) -> Option<RunRecord> {
        let removed = self.records.remove(run_id);
        if removed.is_some() {
            debug!(run_id, "run record forgotten");
        }
        removed
    }

    /// Drops every record, e.g. when the chat session ends.
    pub fn clear(&mut self) {
        debug!(records = self.records.len(), "run records cleared");
        self.records.clear();
    }
}
