// RouteWatch - core/model.rs
//
// Core data model types shared by the classifier and the output layer.
// Pure data definitions with no I/O.

use serde::Serialize;
use std::time::Duration;

// =============================================================================
// Milestones
// =============================================================================

/// The router phase transitions recognised in its progress log.
///
/// Serialises to the kebab-case names the monitoring side expects
/// (`route-start`, `route-progress`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneKind {
    /// `Starting auto-routing...`
    RouteStart,
    /// `Auto-routing was completed`
    RouteResult,
    /// `Starting route optimization`
    OptimizeStart,
    /// `Route optimization was completed`
    OptimizeResult,
    /// `Saving`: the router persisted an intermediate result.
    RouteProgress,
}

impl MilestoneKind {
    /// Returns all variants in table order.
    pub fn all() -> &'static [MilestoneKind] {
        &[
            MilestoneKind::RouteStart,
            MilestoneKind::RouteResult,
            MilestoneKind::OptimizeStart,
            MilestoneKind::OptimizeResult,
            MilestoneKind::RouteProgress,
        ]
    }

    /// Wire name of the milestone.
    pub fn label(&self) -> &'static str {
        match self {
            MilestoneKind::RouteStart => "route-start",
            MilestoneKind::RouteResult => "route-result",
            MilestoneKind::OptimizeStart => "optimize-start",
            MilestoneKind::OptimizeResult => "optimize-result",
            MilestoneKind::RouteProgress => "route-progress",
        }
    }

    /// Whether notifications of this kind carry the iteration count.
    pub fn carries_iterations(&self) -> bool {
        matches!(
            self,
            MilestoneKind::RouteResult | MilestoneKind::RouteProgress
        )
    }
}

impl std::fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Notifications
// =============================================================================

/// Structured record written to the notification channel, one per
/// recognised milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusNotification {
    pub status: MilestoneKind,

    /// Iteration count; only present for kinds that carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub times: Option<u64>,
}

impl StatusNotification {
    /// Build the notification for `kind` given the current counter.
    pub fn new(kind: MilestoneKind, iterations: u64) -> Self {
        Self {
            status: kind,
            times: kind.carries_iterations().then_some(iterations),
        }
    }
}

// =============================================================================
// Classification result
// =============================================================================

/// Outcome of a recognised save line.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Iteration counter after this save.
    pub iterations: u64,
    /// Time since the previous route start or save.
    pub elapsed: Duration,
    /// Synthesized line that stands in for the save line on the output,
    /// without a terminator. Raw bytes: the date and time fields are copied
    /// from the input unchanged.
    pub line: Vec<u8>,
}

/// Everything the classifier decided about one line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Notification for a non-save milestone.
    pub milestone: Option<StatusNotification>,
    /// Present when the line was a save event.
    pub progress: Option<Progress>,
}

impl Classification {
    /// True when the line matched no milestone at all.
    pub fn is_pass_through(&self) -> bool {
        self.milestone.is_none() && self.progress.is_none()
    }

    /// Notifications to emit for this line, in emission order.
    pub fn notifications(&self) -> impl Iterator<Item = StatusNotification> + '_ {
        self.milestone.into_iter().chain(
            self.progress
                .as_ref()
                .map(|p| StatusNotification::new(MilestoneKind::RouteProgress, p.iterations)),
        )
    }
}

// =============================================================================
// Output policy
// =============================================================================

/// What happens to the original text of a save line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveLineMode {
    /// Only the synthesized progress line is written.
    #[default]
    Replace,
    /// The original line is written, followed by the progress line.
    Append,
}

impl std::str::FromStr for SaveLineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(SaveLineMode::Replace),
            "append" => Ok(SaveLineMode::Append),
            other => Err(format!(
                "unknown save line mode \"{other}\" (expected \"replace\" or \"append\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde_names() {
        for kind in MilestoneKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.label()));
        }
    }

    #[test]
    fn test_times_only_for_counting_kinds() {
        assert_eq!(StatusNotification::new(MilestoneKind::RouteStart, 4).times, None);
        assert_eq!(StatusNotification::new(MilestoneKind::OptimizeStart, 4).times, None);
        assert_eq!(StatusNotification::new(MilestoneKind::OptimizeResult, 4).times, None);
        assert_eq!(StatusNotification::new(MilestoneKind::RouteResult, 4).times, Some(4));
        assert_eq!(StatusNotification::new(MilestoneKind::RouteProgress, 4).times, Some(4));
    }

    #[test]
    fn test_notifications_order() {
        let c = Classification {
            milestone: Some(StatusNotification::new(MilestoneKind::RouteStart, 0)),
            progress: Some(Progress {
                iterations: 1,
                elapsed: Duration::ZERO,
                line: Vec::new(),
            }),
        };
        let kinds: Vec<_> = c.notifications().map(|n| n.status).collect();
        assert_eq!(kinds, vec![MilestoneKind::RouteStart, MilestoneKind::RouteProgress]);
        assert!(!c.is_pass_through());
        assert!(Classification::default().is_pass_through());
    }

    #[test]
    fn test_save_line_mode_parse() {
        assert_eq!("append".parse::<SaveLineMode>(), Ok(SaveLineMode::Append));
        assert_eq!("Replace".parse::<SaveLineMode>(), Ok(SaveLineMode::Replace));
        assert!("both".parse::<SaveLineMode>().is_err());
    }
}
