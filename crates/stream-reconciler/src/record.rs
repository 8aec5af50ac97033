use crate::model::{RunId, text_len};

/// Per-run state kept by the reconciler.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunRecord {
    pub run_id: RunId,
    /// Latest accepted payload.
    pub text: String,
    /// False until a final chunk is accepted for this generation.
    pub finalized: bool,
    /// High-water mark of accepted text length, in UTF-16 code units.
    pub max_text_len: usize,
    /// Bumped each time a finalized run is reopened by new delta content.
    pub generation: u32,
}

impl RunRecord {
    pub(crate) fn streaming(run_id: RunId, text: String) -> Self {
        Self::with_state(run_id, text, false, 0)
    }

    pub(crate) fn finalized(run_id: RunId, text: String) -> Self {
        Self::with_state(run_id, text, true, 0)
    }

    fn with_state(run_id: RunId, text: String, finalized: bool, generation: u32) -> Self {
        let max_text_len = text_len(&text);
        Self {
            run_id,
            text,
            finalized,
            max_text_len,
            generation,
        }
    }

    /// Replaces a finalized record wholesale with a new streaming generation.
    pub(crate) fn reopen(&mut self, text: String) {
        debug_assert!(self.finalized);
        let generation = self.generation.saturating_add(1);
        *self = Self::with_state(self.run_id.clone(), text, false, generation);
    }

    /// Accepts a streaming update; the high-water mark never goes down.
    pub(crate) fn accept_delta(&mut self, text: String, len: usize) {
        self.text = text;
        self.max_text_len = self.max_text_len.max(len);
    }

    pub(crate) fn finalize(&mut self, text: String, len: usize) {
        self.text = text;
        self.max_text_len = len;
        self.finalized = true;
    }
}
