use std::io::{BufRead, Write};

use anyhow::{Context as _, bail};
use stream_reconciler::{Action, IncomingEvent, ReconciledEvent, Reconciler};
use tracing::warn;

/// Counts of what happened during a replay.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub new_bubbles: usize,
    pub updated: usize,
    pub finalized: usize,
    pub ignored: usize,
    pub skipped_lines: usize,
}

impl ReplaySummary {
    fn count(&mut self, action: Action) {
        self.events += 1;
        match action {
            Action::NewBubble => self.new_bubbles += 1,
            Action::Updated => self.updated += 1,
            Action::Finalized => self.finalized += 1,
            Action::Ignored => self.ignored += 1,
        }
    }
}

/// Reads JSONL events from `input`, reconciles them in order, and writes one
/// JSONL decision per event to `output`.
///
/// Blank lines are skipped. Lines that fail to parse (including unknown
/// stages) are logged and skipped, or abort the replay when `strict` is set.
pub fn replay<R: BufRead, W: Write>(
    reconciler: &mut Reconciler,
    input: R,
    mut output: W,
    strict: bool,
) -> anyhow::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: IncomingEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(err) if strict => bail!("line {line_no}: {err}"),
            Err(err) => {
                warn!(line = line_no, error = %err, "skipping malformed event");
                summary.skipped_lines += 1;
                continue;
            }
        };
        let decision = reconciler.apply(&event);
        summary.count(decision.action);
        let out = ReconciledEvent {
            run_id: event.run_id,
            stage: event.stage,
            decision,
        };
        serde_json::to_writer(&mut output, &out)
            .with_context(|| format!("failed to write decision for line {line_no}"))?;
        output.write_all(b"\n")?;
    }
    output.flush()?;
    Ok(summary)
}
