// RouteWatch - app/notify.rs
//
// Notification channel encoding. One JSON object per line, in the exact
// shape the monitoring side reads: `{"status": "<kind>", "times": <n>}`,
// with a space after every `:` and `,`.
//
// Writes are flushed immediately; any failure is returned to the caller,
// which treats it as fatal.

use crate::core::model::StatusNotification;
use crate::util::error::{Channel, StreamError};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io::{self, Write};

/// Compact JSON with `": "` and `", "` separators.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

/// Encode a notification as a single line, without the trailing newline.
pub fn encode(notification: &StatusNotification) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::with_capacity(48);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    notification.serialize(&mut ser)?;
    Ok(buf)
}

/// Write one notification line to `sink` and flush it.
pub fn write_notification<W: Write>(
    sink: &mut W,
    notification: &StatusNotification,
) -> Result<(), StreamError> {
    let mut line = encode(notification).map_err(|source| StreamError::Notify { source })?;
    line.push(b'\n');
    sink.write_all(&line)
        .and_then(|()| sink.flush())
        .map_err(|source| StreamError::Write {
            channel: Channel::Notify,
            source,
        })
}
