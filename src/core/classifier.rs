// RouteWatch - core/classifier.rs
//
// Per-line decision procedure: tokenize, evaluate the rule table, update the
// process state, and describe what should be emitted. Writing is left to the
// app layer so this stays free of I/O.
//
// Evaluation order:
//   1. the non-save milestones, as one mutually exclusive group;
//   2. the save rule, checked on every line regardless of step 1.

use crate::core::model::{Classification, MilestoneKind, Progress, StatusNotification};
use crate::core::rules::RuleSet;
use crate::core::state::{Clock, MonotonicClock, ProcessState};
use crate::core::tokenizer::{strip_terminator, tokenize};
use crate::util::constants::{
    ELAPSED_PRECISION, FIELD_DELIMITER, MILESTONE_LEVEL, PROGRESS_THREAD,
};
use std::time::Duration;

/// Stateful line classifier.
#[derive(Debug)]
pub struct Classifier<C: Clock = MonotonicClock> {
    rules: RuleSet,
    state: ProcessState,
    clock: C,
}

impl Classifier<MonotonicClock> {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_clock(rules, MonotonicClock)
    }
}

impl<C: Clock> Classifier<C> {
    /// Classifier whose baseline starts at the clock's current reading.
    pub fn with_clock(rules: RuleSet, clock: C) -> Self {
        let state = ProcessState::new(clock.now());
        Self {
            rules,
            state,
            clock,
        }
    }

    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    /// Classify one line (a trailing line terminator is ignored).
    pub fn classify(&mut self, line: &str) -> Classification {
        self.classify_bytes(line.as_bytes())
    }

    /// Classify one raw line.
    ///
    /// Rules are matched against a lossy UTF-8 view. The date and time copied
    /// into a progress line come from `raw` itself, so they stay byte-exact.
    pub fn classify_bytes(&mut self, raw: &[u8]) -> Classification {
        let text = String::from_utf8_lossy(raw);
        let fields = tokenize(strip_terminator(&text), FIELD_DELIMITER);
        let mut result = Classification::default();

        if let Some(kind) = self.rules.milestone(&fields) {
            if kind == MilestoneKind::RouteStart {
                self.state.mark_route_start(self.clock.now());
            }
            let notification = StatusNotification::new(kind, self.state.iterations());
            tracing::debug!(milestone = %kind, iterations = self.state.iterations(), "Milestone");
            result.milestone = Some(notification);
        }

        if self.rules.is_save(&fields) {
            let (iterations, elapsed) = self.state.record_save(self.clock.now());
            tracing::debug!(
                iterations,
                elapsed_ms = elapsed.as_millis() as u64,
                "Progress saved"
            );
            result.progress = Some(Progress {
                iterations,
                elapsed,
                line: progress_line(raw, iterations, elapsed),
            });
        }

        result
    }
}

/// Build the line that replaces a save line on the primary output.
///
/// Keeps the raw date and time fields of `raw` and reports the iteration
/// number and the seconds since the previous route start or save. The result
/// has no line terminator.
pub fn progress_line(raw: &[u8], iterations: u64, elapsed: Duration) -> Vec<u8> {
    let delimiter = FIELD_DELIMITER as u8;
    let mut fields = raw.split(|&b| b == delimiter);
    let date = fields.next().unwrap_or_default();
    let time = fields.next().unwrap_or_default();

    let mut line = Vec::with_capacity(date.len() + time.len() + 64);
    line.extend_from_slice(date);
    line.push(delimiter);
    line.extend_from_slice(time);
    line.extend_from_slice(
        format!(
            " {} {} Route progress #{} saved after {:.*} seconds",
            PROGRESS_THREAD,
            MILESTONE_LEVEL,
            iterations,
            ELAPSED_PRECISION,
            elapsed.as_secs_f64()
        )
        .as_bytes(),
    );
    line
}
