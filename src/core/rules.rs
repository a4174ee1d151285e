// RouteWatch - core/rules.rs
//
// Declarative milestone rules. A rule is an exact field count plus exact
// field values at fixed offsets; adding a milestone means adding a row to
// the table, not another branch.
//
// Layout of a router line (offsets into the token sequence):
//   [0] date  [1] time  [2] thread  [3] level  [4..4+pad] empty  [..] message
//
// Core layer: pure logic, no I/O.

use crate::core::model::MilestoneKind;
use crate::util::constants::{HEADER_FIELDS, LEVEL_FIELD, MILESTONE_LEVEL, THREAD_FIELD};
use regex::Regex;

/// One recognisable line shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneRule {
    pub kind: MilestoneKind,
    /// Exact message words following the level (and its padding).
    pub message: &'static [&'static str],
}

/// Mutually exclusive non-save milestones, tested in this order.
pub const MILESTONE_RULES: &[MilestoneRule] = &[
    MilestoneRule {
        kind: MilestoneKind::RouteStart,
        message: &["Starting", "auto-routing..."],
    },
    MilestoneRule {
        kind: MilestoneKind::RouteResult,
        message: &["Auto-routing", "was", "completed"],
    },
    MilestoneRule {
        kind: MilestoneKind::OptimizeStart,
        message: &["Starting", "route", "optimization"],
    },
    MilestoneRule {
        kind: MilestoneKind::OptimizeResult,
        message: &["Route", "optimization", "was", "completed"],
    },
];

/// The save event, tested independently of the group above.
pub const SAVE_RULE: MilestoneRule = MilestoneRule {
    kind: MilestoneKind::RouteProgress,
    message: &["Saving"],
};

/// How the thread field of a milestone line is recognised.
#[derive(Debug, Clone)]
pub enum ThreadMatcher {
    /// The field must equal this marker, e.g. `[Thread-0]`.
    Exact(String),
    /// The field must match this regex.
    Pattern(Regex),
}

impl ThreadMatcher {
    pub fn matches(&self, field: &str) -> bool {
        match self {
            ThreadMatcher::Exact(marker) => field == marker,
            ThreadMatcher::Pattern(regex) => regex.is_match(field),
        }
    }
}

impl Default for ThreadMatcher {
    fn default() -> Self {
        ThreadMatcher::Exact(crate::util::constants::DEFAULT_THREAD_MARKER.to_string())
    }
}

/// The rule table bound to a concrete line layout.
#[derive(Debug, Clone)]
pub struct RuleSet {
    thread: ThreadMatcher,
    level_padding: usize,
    milestones: &'static [MilestoneRule],
    save: MilestoneRule,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(
            ThreadMatcher::default(),
            crate::util::constants::DEFAULT_LEVEL_PADDING,
        )
    }
}

impl RuleSet {
    /// Built-in table with the given thread matcher and level padding.
    pub fn new(thread: ThreadMatcher, level_padding: usize) -> Self {
        Self {
            thread,
            level_padding,
            milestones: MILESTONE_RULES,
            save: SAVE_RULE,
        }
    }

    /// Exact number of fields a line must have to match `rule`.
    pub fn field_count(&self, rule: &MilestoneRule) -> usize {
        HEADER_FIELDS + self.level_padding + rule.message.len()
    }

    /// Check one rule against a token sequence.
    ///
    /// The field count is compared first, so every later index is in bounds
    /// and a short line is simply a non-match.
    pub fn matches(&self, rule: &MilestoneRule, fields: &[&str]) -> bool {
        if fields.len() != self.field_count(rule) {
            return false;
        }
        if !self.thread.matches(fields[THREAD_FIELD]) || fields[LEVEL_FIELD] != MILESTONE_LEVEL {
            return false;
        }
        let message_start = HEADER_FIELDS + self.level_padding;
        if !fields[HEADER_FIELDS..message_start].iter().all(|f| f.is_empty()) {
            return false;
        }
        fields[message_start..].iter().eq(rule.message.iter())
    }

    /// First non-save milestone matching the line, if any.
    pub fn milestone(&self, fields: &[&str]) -> Option<MilestoneKind> {
        self.milestones
            .iter()
            .find(|rule| self.matches(rule, fields))
            .map(|rule| rule.kind)
    }

    /// Whether the line is a save event.
    pub fn is_save(&self, fields: &[&str]) -> bool {
        self.matches(&self.save, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokenizer::tokenize;

    fn fields(line: &str) -> Vec<&str> {
        tokenize(line, ' ')
    }

    #[test]
    fn test_each_milestone_recognised() {
        let rules = RuleSet::default();
        let cases = [
            ("d t [Thread-0] INFO Starting auto-routing...", MilestoneKind::RouteStart),
            ("d t [Thread-0] INFO Auto-routing was completed", MilestoneKind::RouteResult),
            ("d t [Thread-0] INFO Starting route optimization", MilestoneKind::OptimizeStart),
            (
                "d t [Thread-0] INFO Route optimization was completed",
                MilestoneKind::OptimizeResult,
            ),
        ];
        for (line, kind) in cases {
            assert_eq!(rules.milestone(&fields(line)), Some(kind), "line: {line}");
            assert!(!rules.is_save(&fields(line)), "line: {line}");
        }
    }

    #[test]
    fn test_save_recognised() {
        let rules = RuleSet::default();
        let f = fields("2024-01-01 10:00:05 [Thread-0] INFO Saving");
        assert!(rules.is_save(&f));
        assert_eq!(rules.milestone(&f), None);
    }

    #[test]
    fn test_field_counts() {
        let rules = RuleSet::default();
        let counts: Vec<_> = MILESTONE_RULES.iter().map(|r| rules.field_count(r)).collect();
        assert_eq!(counts, vec![6, 7, 7, 8]);
        assert_eq!(rules.field_count(&SAVE_RULE), 5);
    }

    #[test]
    fn test_short_lines_never_match() {
        let rules = RuleSet::default();
        for line in ["", "   ", "a b c", "d t [Thread-0] INFO", "d t [Thread-0]"] {
            let f = fields(line);
            assert_eq!(rules.milestone(&f), None, "line: {line:?}");
            assert!(!rules.is_save(&f), "line: {line:?}");
        }
    }

    #[test]
    fn test_extra_fields_do_not_match() {
        let rules = RuleSet::default();
        // The router's real completion message carries a duration.
        let f = fields("d t [Thread-0] INFO Auto-routing was completed in 3.2 seconds.");
        assert_eq!(rules.milestone(&f), None);
        let f = fields("d t [Thread-0] INFO Saving 'board.dsn'...");
        assert!(!rules.is_save(&f));
    }

    #[test]
    fn test_wrong_thread_or_level() {
        let rules = RuleSet::default();
        assert!(!rules.is_save(&fields("d t [main] INFO Saving")));
        assert!(!rules.is_save(&fields("d t [Thread-0] WARN Saving")));
        assert!(!rules.is_save(&fields("d t [Thread-0] info Saving")));
    }

    #[test]
    fn test_thread_pattern() {
        let rules = RuleSet::new(
            ThreadMatcher::Pattern(Regex::new(r"^\[.+\]$").unwrap()),
            0,
        );
        assert!(rules.is_save(&fields("d t [main] INFO Saving")));
        assert!(rules.is_save(&fields("d t [Thread-7] INFO Saving")));
        assert!(!rules.is_save(&fields("d t main INFO Saving")));
    }

    #[test]
    fn test_level_padding_shifts_message() {
        let rules = RuleSet::new(ThreadMatcher::default(), 2);
        let padded = "2024-01-01 10:00:00.123 [Thread-0] INFO   Starting auto-routing...";
        assert_eq!(rules.milestone(&fields(padded)), Some(MilestoneKind::RouteStart));
        assert!(rules.is_save(&fields("d t [Thread-0] INFO   Saving")));

        // Unpadded lines no longer match, nor do non-empty padding fields.
        assert!(!rules.is_save(&fields("d t [Thread-0] INFO Saving")));
        assert!(!rules.is_save(&fields("d t [Thread-0] INFO x y Saving")));
    }
}
