use crate::decision::Decision;
use crate::model::{RunId, Stage};

/// Chunk of a bot reply as delivered by the upstream transport.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingEvent {
    pub stage: Stage,
    pub run_id: RunId,
    /// Cumulative text for the run; may be empty.
    #[serde(default)]
    pub text: String,
}

impl IncomingEvent {
    /// Creates a delta chunk.
    pub fn delta(run_id: impl Into<RunId>, text: impl Into<String>) -> Self {
        Self {
            stage: Stage::Delta,
            run_id: run_id.into(),
            text: text.into(),
        }
    }

    /// Creates a final chunk.
    pub fn final_text(run_id: impl Into<RunId>, text: impl Into<String>) -> Self {
        Self {
            stage: Stage::Final,
            run_id: run_id.into(),
            text: text.into(),
        }
    }
}

/// Decision paired with the chunk it was made for, as handed to the UI layer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledEvent {
    pub run_id: RunId,
    pub stage: Stage,
    #[serde(flatten)]
    pub decision: Decision,
}
