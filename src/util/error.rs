// RouteWatch - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Short or unrecognised log lines are never errors; everything here is
// either a configuration problem or a fatal stream failure.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all RouteWatch operations.
#[derive(Debug)]
pub enum RouteWatchError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Reading input or writing an output channel failed.
    Stream(StreamError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for RouteWatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Stream(e) => write!(f, "Stream error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for RouteWatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Stream(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Stream errors
// ---------------------------------------------------------------------------

/// The two output channels of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Primary output carrying the (possibly rewritten) log lines.
    Output,
    /// Side channel carrying status notifications.
    Notify,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output => f.write_str("output"),
            Self::Notify => f.write_str("notification"),
        }
    }
}

/// Fatal failures of the streaming loop. None of these are retried.
#[derive(Debug)]
pub enum StreamError {
    /// Reading the next input line failed.
    Read { line_number: u64, source: io::Error },

    /// Writing or flushing an output channel failed.
    Write { channel: Channel, source: io::Error },

    /// A notification could not be serialised.
    Notify { source: serde_json::Error },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read {
                line_number,
                source,
            } => write!(f, "failed to read input line {line_number}: {source}"),
            Self::Write { channel, source } => {
                write!(f, "failed to write to the {channel} channel: {source}")
            }
            Self::Notify { source } => {
                write!(f, "failed to serialise status notification: {source}")
            }
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::Notify { source } => Some(source),
        }
    }
}

impl From<StreamError> for RouteWatchError {
    fn from(e: StreamError) -> Self {
        Self::Stream(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// The thread pattern is not a valid regex.
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::InvalidPattern { pattern, source } => {
                write!(f, "Invalid thread pattern '{pattern}': {source}")
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::InvalidPattern { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for RouteWatchError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for RouteWatch results.
pub type Result<T> = std::result::Result<T, RouteWatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_write_error_names_channel() {
        let err = StreamError::Write {
            channel: Channel::Notify,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "closed"),
        };
        assert_eq!(
            err.to_string(),
            "failed to write to the notification channel: closed"
        );
    }

    #[test]
    fn test_stream_error_chain_preserved() {
        let err: RouteWatchError = StreamError::Read {
            line_number: 7,
            source: io::Error::new(io::ErrorKind::Other, "boom"),
        }
        .into();
        let inner = err.source().expect("stream error as source");
        assert!(inner.to_string().contains("line 7"));
        assert!(inner.source().is_some());
    }
}
