//! Property-based tests for the reconciliation rules.
//!
//! - monotone delta streams are always accepted and keep the longest text
//! - the tolerance window decides update vs ignore for streaming runs
//! - a second final never changes the stored text
//! - a finalized run only reopens for strictly longer text
//! - interleaved runs never affect each other

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use crate::config::ReconcilerConfig;
    use crate::decision::{Action, Reason};
    use crate::model::Stage;
    use crate::reconciler::Reconciler;

    fn chunk() -> impl Strategy<Value = String> {
        "[a-z ]{0,12}"
    }

    fn prefix_chain() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(chunk(), 1..12).prop_map(|parts| {
            let mut acc = String::new();
            parts
                .into_iter()
                .map(|part| {
                    acc.push_str(&part);
                    acc.clone()
                })
                .collect()
        })
    }

    proptest! {
        /// Cumulative deltas never shrink, so every one is accepted.
        #[test]
        fn growing_deltas_are_always_accepted(texts in prefix_chain()) {
            let mut r = Reconciler::new();
            for (i, text) in texts.iter().enumerate() {
                let decision = r.reconcile(Stage::Delta, "run", text.as_str());
                let expected = if i == 0 { Action::NewBubble } else { Action::Updated };
                prop_assert_eq!(decision.action, expected);
            }
            let last = texts.last().cloned().unwrap_or_default();
            let record = r.record("run").expect("record");
            prop_assert_eq!(&record.text, &last);
            prop_assert_eq!(record.max_text_len, last.encode_utf16().count());
        }

        /// With high-water mark N, a delta of length L is accepted iff L >= N - tolerance.
        #[test]
        fn tolerance_window_decides_update(
            n in 0usize..40,
            l in 0usize..40,
            tolerance in 0usize..10,
        ) {
            let mut r = Reconciler::with_config(ReconcilerConfig::default().shrink_tolerance(tolerance));
            r.reconcile(Stage::Delta, "run", "x".repeat(n));
            let decision = r.reconcile(Stage::Delta, "run", "y".repeat(l));
            let accepted = l + tolerance >= n;
            prop_assert_eq!(decision.action == Action::Updated, accepted);
            prop_assert_eq!(decision.action == Action::Ignored, !accepted);
            let record = r.record("run").expect("record");
            prop_assert_eq!(record.max_text_len, if accepted { n.max(l) } else { n });
        }

        /// Whatever follows, the first accepted final fixes the text.
        #[test]
        fn duplicate_final_is_idempotent(first in chunk(), second in chunk(), prior_delta in any::<bool>()) {
            let mut r = Reconciler::new();
            if prior_delta {
                r.reconcile(Stage::Delta, "run", "");
            }
            let decision = r.reconcile(Stage::Final, "run", first.as_str());
            prop_assert_ne!(decision.action, Action::Ignored);
            let again = r.reconcile(Stage::Final, "run", second.as_str());
            prop_assert_eq!(again.action, Action::Ignored);
            prop_assert_eq!(again.reason, Reason::DuplicateFinal);
            prop_assert_eq!(&r.record("run").expect("record").text, &first);
        }

        /// A finalized run reopens only for text longer than its high-water mark.
        #[test]
        fn reopen_requires_strictly_longer_text(stored in chunk(), next in chunk()) {
            let mut r = Reconciler::new();
            r.reconcile(Stage::Final, "run", stored.as_str());
            let decision = r.reconcile(Stage::Delta, "run", next.as_str());
            let record = r.record("run").expect("record");
            if next.encode_utf16().count() > stored.encode_utf16().count() {
                prop_assert_eq!(decision.reason, Reason::ReopenedRun);
                prop_assert!(!record.finalized);
                prop_assert_eq!(record.generation, 1);
            } else {
                prop_assert_eq!(decision.reason, Reason::DuplicateDeltaForFinalized);
                prop_assert!(record.finalized);
                prop_assert_eq!(&record.text, &stored);
            }
        }

        /// Interleaving runs gives the same per-run outcome as reconciling each alone.
        #[test]
        fn runs_do_not_interfere(
            events in prop::collection::vec((0u8..4, any::<bool>(), chunk()), 1..40),
        ) {
            let mut shared = Reconciler::new();
            let mut isolated: HashMap<String, Reconciler> = HashMap::new();
            for (run, is_final, text) in &events {
                let run_id = format!("run-{run}");
                let stage = if *is_final { Stage::Final } else { Stage::Delta };
                let a = shared.reconcile(stage, run_id.as_str(), text.as_str());
                let b = isolated
                    .entry(run_id.clone())
                    .or_default()
                    .reconcile(stage, run_id.as_str(), text.as_str());
                prop_assert_eq!(a, b);
            }
            prop_assert_eq!(shared.len(), isolated.len());
            for (run_id, alone) in &isolated {
                prop_assert_eq!(shared.record(run_id), alone.record(run_id));
            }
        }
    }
}
