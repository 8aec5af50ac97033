use std::fmt;

/// What the UI layer should do with a chunk.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create a new visual message bubble.
    NewBubble,
    /// Replace the displayed text of the existing bubble.
    Updated,
    /// Replace the displayed text and mark the bubble complete.
    Finalized,
    /// Take no visible action.
    Ignored,
}

impl Action {
    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewBubble => "new_bubble",
            Self::Updated => "updated",
            Self::Finalized => "finalized",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic reason attached to every decision.
///
/// Each reason maps to exactly one branch of the reconciliation rules, so
/// callers can match on it instead of parsing the message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Reason {
    #[serde(rename = "new runId")]
    NewRun,
    #[serde(rename = "duplicate delta for finalized")]
    DuplicateDeltaForFinalized,
    #[serde(rename = "new content reusing runId")]
    ReopenedRun,
    #[serde(rename = "longer text")]
    LongerText,
    #[serde(rename = "shorter text")]
    ShorterText,
    #[serde(rename = "duplicate final")]
    DuplicateFinal,
    #[serde(rename = "updated and finalized")]
    UpdatedAndFinalized,
    #[serde(rename = "new final message")]
    NewFinalMessage,
}

impl Reason {
    /// Human-readable message for logs and the wire format.
    pub fn message(self) -> &'static str {
        match self {
            Self::NewRun => "new runId",
            Self::DuplicateDeltaForFinalized => "duplicate delta for finalized",
            Self::ReopenedRun => "new content reusing runId",
            Self::LongerText => "longer text",
            Self::ShorterText => "shorter text",
            Self::DuplicateFinal => "duplicate final",
            Self::UpdatedAndFinalized => "updated and finalized",
            Self::NewFinalMessage => "new final message",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of reconciling one chunk.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Decision {
    pub action: Action,
    pub reason: Reason,
}

impl Decision {
    pub(crate) const fn new(action: Action, reason: Reason) -> Self {
        Self { action, reason }
    }

    /// Returns true when the chunk was discarded.
    pub fn is_ignored(&self) -> bool {
        self.action == Action::Ignored
    }

    /// Returns true when a finalized run was reopened by longer delta text.
    ///
    /// The caller appends a fresh bubble in this case; the bubble of the
    /// previous generation stays as it was rendered.
    pub fn is_reopen(&self) -> bool {
        self.reason == Reason::ReopenedRun
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.action, self.reason)
    }
}
