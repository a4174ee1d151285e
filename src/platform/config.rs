// RouteWatch - platform/config.rs
//
// Platform-specific config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::SaveLineMode;
use crate::core::rules::ThreadMatcher;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Resolved platform paths for RouteWatch configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/routewatch/ or %APPDATA%\RouteWatch\)
    pub config_dir: PathBuf,

    /// Default config file inside `config_dir`.
    pub config_file: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        let config_dir = match ProjectDirs::from("", "", constants::APP_ID) {
            Some(proj_dirs) => proj_dirs.config_dir().to_path_buf(),
            None => {
                tracing::warn!("Could not determine platform directories, using current directory");
                PathBuf::from(".")
            }
        };
        let config_file = config_dir.join(constants::CONFIG_FILE_NAME);
        tracing::debug!(config = %config_file.display(), "Platform paths resolved");
        Self {
            config_dir,
            config_file,
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[filter]` section.
    pub filter: FilterSection,
    /// `[notify]` section.
    pub notify: NotifySection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[filter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Exact thread field of milestone lines.
    pub thread_marker: Option<String>,
    /// Regex for the thread field; takes precedence over `thread_marker`.
    pub thread_pattern: Option<String>,
    /// Empty fields between level and message.
    pub level_padding: Option<usize>,
    /// "replace" or "append".
    pub save_line: Option<String>,
}

/// `[notify]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NotifySection {
    /// Notification file (empty = stderr).
    pub file: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "off", "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr).
    pub file: Option<String>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Filter --
    pub thread_marker: String,
    pub thread_pattern: Option<String>,
    pub level_padding: usize,
    pub save_line: SaveLineMode,

    // -- Notify --
    /// None = stderr.
    pub notify_file: Option<PathBuf>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            thread_marker: constants::DEFAULT_THREAD_MARKER.to_string(),
            thread_pattern: None,
            level_padding: constants::DEFAULT_LEVEL_PADDING,
            save_line: SaveLineMode::default(),
            notify_file: None,
            log_level: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Set the level padding, rejecting values above `MAX_LEVEL_PADDING`.
    pub fn set_level_padding(&mut self, padding: usize) -> Result<(), ConfigError> {
        if padding > constants::MAX_LEVEL_PADDING {
            return Err(ConfigError::ValueOutOfRange {
                field: "level_padding".to_string(),
                value: padding.to_string(),
                expected: format!("0-{}", constants::MAX_LEVEL_PADDING),
            });
        }
        self.level_padding = padding;
        Ok(())
    }

    /// Set the thread marker. It must be one non-empty field, otherwise no
    /// line could ever match it.
    pub fn set_thread_marker(&mut self, marker: String) -> Result<(), ConfigError> {
        if marker.is_empty() || marker.contains(constants::FIELD_DELIMITER) {
            return Err(ConfigError::ValueOutOfRange {
                field: "thread_marker".to_string(),
                value: marker,
                expected: "a single non-empty field without spaces".to_string(),
            });
        }
        self.thread_marker = marker;
        Ok(())
    }

    /// Thread matcher: the pattern if one is set, the exact marker otherwise.
    pub fn thread_matcher(&self) -> Result<ThreadMatcher, ConfigError> {
        match self.thread_pattern {
            Some(ref pattern) => compile_pattern(pattern).map(ThreadMatcher::Pattern),
            None => Ok(ThreadMatcher::Exact(self.thread_marker.clone())),
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings. An unreadable or
/// unparseable file yields defaults plus a warning, so a broken config never
/// stops the filter from running.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            };
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            };
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Filter: thread_marker --
    if let Some(marker) = raw.filter.thread_marker {
        if let Err(e) = config.set_thread_marker(marker) {
            warnings.push(format!(
                "[filter] {e}. Using default ({}).",
                constants::DEFAULT_THREAD_MARKER,
            ));
        }
    }

    // -- Filter: thread_pattern --
    if let Some(pattern) = raw.filter.thread_pattern {
        if !pattern.is_empty() {
            match compile_pattern(&pattern) {
                Ok(_) => config.thread_pattern = Some(pattern),
                Err(e) => warnings.push(format!("[filter] {e}. Using thread_marker instead.")),
            }
        }
    }

    // -- Filter: level_padding --
    if let Some(padding) = raw.filter.level_padding {
        if let Err(e) = config.set_level_padding(padding) {
            warnings.push(format!(
                "[filter] {e}. Using default ({}).",
                constants::DEFAULT_LEVEL_PADDING
            ));
        }
    }

    // -- Filter: save_line --
    if let Some(ref mode) = raw.filter.save_line {
        match mode.parse::<SaveLineMode>() {
            Ok(m) => config.save_line = m,
            Err(e) => warnings.push(format!("[filter] save_line: {e}. Using default (replace).")),
        }
    }

    // -- Notify: file --
    if let Some(file) = raw.notify.file {
        if !file.is_empty() {
            config.notify_file = Some(PathBuf::from(file));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["off", "error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: off, error, warn, info, debug, trace. Using default.",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("absent.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.thread_marker, "[Thread-0]");
        assert_eq!(config.level_padding, 0);
        assert_eq!(config.save_line, SaveLineMode::Replace);
        assert!(config.notify_file.is_none());
    }

    #[test]
    fn test_full_config() {
        let (_dir, path) = write_config(
            r#"
[filter]
thread_marker = "[main]"
thread_pattern = "^\\[Thread-\\d+\\]$"
level_padding = 2
save_line = "append"

[notify]
file = "/tmp/notes.jsonl"

[logging]
level = "debug"
file = "routewatch.log"
"#,
        );
        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.thread_marker, "[main]");
        assert_eq!(config.level_padding, 2);
        assert_eq!(config.save_line, SaveLineMode::Append);
        assert_eq!(config.notify_file, Some(PathBuf::from("/tmp/notes.jsonl")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file.as_deref(), Some("routewatch.log"));

        let matcher = config.thread_matcher().unwrap();
        assert!(matcher.matches("[Thread-12]"));
        assert!(!matcher.matches("[main]"));
    }

    #[test]
    fn test_invalid_values_warn_and_fall_back() {
        let (_dir, path) = write_config(
            r#"
[filter]
thread_marker = "two words"
thread_pattern = "[unclosed"
level_padding = 99
save_line = "both"

[logging]
level = "loud"
"#,
        );
        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 5, "warnings: {warnings:?}");
        assert_eq!(config.thread_marker, "[Thread-0]");
        assert!(config.thread_pattern.is_none());
        assert_eq!(config.level_padding, 0);
        assert_eq!(config.save_line, SaveLineMode::Replace);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_file_gives_defaults() {
        let (_dir, path) = write_config("[filter\nlevel_padding = ");
        let (config, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
        assert_eq!(config.level_padding, 0);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_dir, path) = write_config("[ui]\ntheme = \"dark\"\n[filter]\nlevel_padding = 1\n");
        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty());
        assert_eq!(config.level_padding, 1);
    }

    #[test]
    fn test_invalid_cli_pattern_is_an_error() {
        let config = AppConfig {
            thread_pattern: Some("(".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.thread_matcher(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_thread_marker_must_be_one_field() {
        let mut config = AppConfig::default();
        assert!(matches!(
            config.set_thread_marker("two words".to_string()),
            Err(ConfigError::ValueOutOfRange { .. })
        ));
        assert!(config.set_thread_marker(String::new()).is_err());
        assert_eq!(config.thread_marker, "[Thread-0]");

        config.set_thread_marker("[main]".to_string()).unwrap();
        assert_eq!(config.thread_marker, "[main]");
    }

    #[test]
    fn test_level_padding_bounds() {
        let mut config = AppConfig::default();
        assert!(config.set_level_padding(constants::MAX_LEVEL_PADDING).is_ok());
        assert!(config.set_level_padding(constants::MAX_LEVEL_PADDING + 1).is_err());
        assert_eq!(config.level_padding, constants::MAX_LEVEL_PADDING);
    }
}
