// RouteWatch - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "RouteWatch";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "RouteWatch";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Router log layout
// =============================================================================

/// Field separator of the router's log lines.
pub const FIELD_DELIMITER: char = ' ';

/// Number of fields ahead of the message: date, time, thread, level.
pub const HEADER_FIELDS: usize = 4;

/// Offset of the thread marker field.
pub const THREAD_FIELD: usize = 2;

/// Offset of the level field.
pub const LEVEL_FIELD: usize = 3;

/// Level every milestone line is logged at.
pub const MILESTONE_LEVEL: &str = "INFO";

/// Thread marker matched when neither config nor CLI sets one.
pub const DEFAULT_THREAD_MARKER: &str = "[Thread-0]";

/// Empty fields between the level and the message.
///
/// log4j's `%-6level` pads `INFO` with two spaces, which splits into two
/// empty fields; plain `%level` layouts produce none.
pub const DEFAULT_LEVEL_PADDING: usize = 0;

/// Upper bound on `level_padding` (the longest log4j level is 5 chars).
pub const MAX_LEVEL_PADDING: usize = 8;

// =============================================================================
// Progress line
// =============================================================================

/// Thread marker written into synthesized progress lines.
pub const PROGRESS_THREAD: &str = "[Thread-0]";

/// Decimal places of the elapsed seconds in synthesized progress lines.
pub const ELAPSED_PRECISION: usize = 3;

// =============================================================================
// Logging
// =============================================================================

/// Log level when diagnostics go to a dedicated log file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log level when diagnostics would share stderr with the notification
/// channel.
pub const DEFAULT_STDERR_LOG_LEVEL: &str = "off";

// =============================================================================
// Configuration
// =============================================================================

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
