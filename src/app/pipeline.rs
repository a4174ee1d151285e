// RouteWatch - app/pipeline.rs
//
// The streaming loop: read one line, classify it, emit its notifications,
// emit its output line, flush, repeat until end of input.
//
// Architecture:
//   - Single-threaded; a line is fully handled before the next read, so
//     notifications and output lines keep input order.
//   - Lines are read as raw bytes. Classification works on a lossy UTF-8
//     view, pass-through echoes the original bytes untouched.
//   - Both channels are flushed every cycle. Any read or write failure ends
//     the run with a StreamError; nothing is retried or dropped silently.

use crate::app::notify::write_notification;
use crate::core::classifier::Classifier;
use crate::core::model::SaveLineMode;
use crate::core::state::{Clock, MonotonicClock};
use crate::util::error::{Channel, StreamError};
use std::io::{self, BufRead, Write};

/// Counters for one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Input lines processed.
    pub lines: u64,
    /// Notifications written.
    pub notifications: u64,
    /// Save events seen (the final iteration counter).
    pub iterations: u64,
}

/// Classifier plus output policy.
#[derive(Debug)]
pub struct Pipeline<C: Clock = MonotonicClock> {
    classifier: Classifier<C>,
    save_line: SaveLineMode,
}

impl<C: Clock> Pipeline<C> {
    pub fn new(classifier: Classifier<C>, save_line: SaveLineMode) -> Self {
        Self {
            classifier,
            save_line,
        }
    }

    pub fn classifier(&self) -> &Classifier<C> {
        &self.classifier
    }

    /// Process `input` to exhaustion.
    pub fn run<R, W, N>(
        &mut self,
        mut input: R,
        output: &mut W,
        notify: &mut N,
    ) -> Result<RunSummary, StreamError>
    where
        R: BufRead,
        W: Write,
        N: Write,
    {
        let mut summary = RunSummary::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .map_err(|source| StreamError::Read {
                    line_number: summary.lines + 1,
                    source,
                })?;
            if read == 0 {
                break;
            }
            summary.lines += 1;
            summary.notifications += self.process_line(&buf, output, notify)?;
        }

        summary.iterations = self.classifier.state().iterations();
        tracing::info!(
            lines = summary.lines,
            notifications = summary.notifications,
            iterations = summary.iterations,
            "Input exhausted"
        );
        Ok(summary)
    }

    /// Handle one raw line (terminator included, if any). Returns the number
    /// of notifications written.
    fn process_line<W: Write, N: Write>(
        &mut self,
        raw: &[u8],
        output: &mut W,
        notify: &mut N,
    ) -> Result<u64, StreamError> {
        let classification = self.classifier.classify_bytes(raw);

        let mut written = 0;
        for notification in classification.notifications() {
            write_notification(notify, &notification)?;
            written += 1;
        }

        let progress = classification.progress.as_ref().map(|p| p.line.as_slice());
        write_output(raw, progress, self.save_line, output).map_err(|source| {
            StreamError::Write {
                channel: Channel::Output,
                source,
            }
        })?;
        Ok(written)
    }
}

/// Write the output for one line: the original bytes, the progress line, or
/// both depending on `mode`.
fn write_output<W: Write>(
    raw: &[u8],
    progress: Option<&[u8]>,
    mode: SaveLineMode,
    output: &mut W,
) -> io::Result<()> {
    match progress {
        None => output.write_all(raw)?,
        Some(line) => {
            if mode == SaveLineMode::Append {
                output.write_all(raw)?;
                if !raw.ends_with(b"\n") {
                    output.write_all(b"\n")?;
                }
            }
            output.write_all(line)?;
            output.write_all(b"\n")?;
        }
    }
    output.flush()
}
