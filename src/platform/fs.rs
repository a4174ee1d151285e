// RouteWatch - platform/fs.rs
//
// Opening the output streams the filter writes to.

use crate::util::error::RouteWatchError;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Open the notification channel: stderr, or `path` in append mode.
///
/// The file is created if it does not exist. Failing to open it is fatal;
/// running without the channel would lose every notification.
pub fn open_notify_sink(path: Option<&Path>) -> Result<Box<dyn Write>, RouteWatchError> {
    match path {
        None => Ok(Box::new(io::stderr().lock())),
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| RouteWatchError::Io {
                    path: path.to_path_buf(),
                    operation: "open notification file",
                    source,
                })?;
            tracing::debug!(path = %path.display(), "Notification file opened");
            Ok(Box::new(io::LineWriter::new(file)))
        }
    }
}
