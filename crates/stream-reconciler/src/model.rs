use std::fmt;
use std::str::FromStr;

use crate::errors::ReconcileError;

/// Opaque identifier shared by every chunk of one bot response stream.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Creates a run id from any string-like value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the run id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl std::borrow::Borrow<str> for RunId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Lifecycle stage of an incoming chunk.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Stage {
    /// Partial update carrying the cumulative text produced so far.
    Delta,
    /// Terminal update for the run.
    Final,
}

impl Stage {
    /// Wire name of the stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delta => "delta",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ReconcileError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "delta" => Ok(Self::Delta),
            "final" => Ok(Self::Final),
            other => Err(ReconcileError::invalid_stage(other)),
        }
    }
}

impl TryFrom<String> for Stage {
    type Error = ReconcileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Length used for every progress comparison, in UTF-16 code units.
///
/// Upstream clients measure chunks the same way, so a non-BMP char such as
/// an emoji counts as two.
pub(crate) fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}
