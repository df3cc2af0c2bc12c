//! Tracing setup for the binaries.
//!
//! Line-oriented binaries (CLI, web server) log to stderr through
//! [`init_stderr_logging`]. The terminal UI cannot share the screen with a
//! log stream, so it installs [`LogCaptureLayer`] instead: events are pushed
//! into a [`LogBuffer`] that the UI drains into its log pane once per frame.
//! The buffer has its own mutex, so logging never contends with rendering.

use std::sync::{Arc, Mutex};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Maximum log lines kept in memory.
pub const MAX_LOG_LINES: usize = 2000;
/// Trim to this many when the cap is exceeded.
pub const LOG_TRIM_TO: usize = 1200;

/// A single log line captured from tracing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogLine {
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

/// Log severity level (mirrors tracing levels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Short fixed-width label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

/// Install a stderr fmt subscriber filtered by `RUST_LOG`, or by
/// `default_directive` when the variable is unset.
pub fn init_stderr_logging(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Install [`LogCaptureLayer`] as the global subscriber and return its buffer.
pub fn init_captured_logging(default_directive: &str) -> LogBuffer {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let (layer, buffer) = LogCaptureLayer::new();
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
    buffer
}

/// A shared buffer of pending log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<LogLine>>>);

impl LogBuffer {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::with_capacity(128))))
    }

    /// Drain all pending log lines from the buffer, returning them.
    pub fn drain(&self) -> Vec<LogLine> {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buf)
    }

    /// Drain pending lines into `target`, keeping it under [`MAX_LOG_LINES`].
    pub fn drain_into(&self, target: &mut Vec<LogLine>) {
        let lines = self.drain();
        if lines.is_empty() {
            return;
        }
        target.extend(lines);
        trim(target);
    }

    fn push(&self, line: LogLine) {
        if let Ok(mut buf) = self.0.lock() {
            buf.push(line);
            // Bound the backlog if nobody drains for a while.
            trim(&mut buf);
        }
    }
}

fn trim(lines: &mut Vec<LogLine>) {
    if lines.len() > MAX_LOG_LINES {
        let drop = lines.len() - LOG_TRIM_TO;
        lines.drain(..drop);
    }
}

/// A [`tracing_subscriber::Layer`] that captures log events into a
/// [`LogBuffer`].
pub struct LogCaptureLayer {
    buffer: LogBuffer,
}

impl LogCaptureLayer {
    /// Create the layer and the buffer it writes to.
    pub fn new() -> (Self, LogBuffer) {
        let buffer = LogBuffer::new();
        (
            Self {
                buffer: buffer.clone(),
            },
            buffer,
        )
    }
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for LogCaptureLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut message = visitor.message;
        if !visitor.fields.is_empty() {
            let extras: Vec<String> = visitor
                .fields
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            if message.is_empty() {
                message = extras.join(" ");
            } else {
                message = format!("{message} {{{}}}", extras.join(", "));
            }
        }

        self.buffer.push(LogLine {
            time: Local::now().format("%H:%M:%S").to_string(),
            level: (*event.metadata().level()).into(),
            message,
        });
    }
}

/// Visitor that extracts the message and extra fields from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let raw = format!("{value:?}");
        if field.name() == "message" {
            self.message = raw
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .map(str::to_string)
                .unwrap_or(raw);
        } else {
            self.fields.push((field.name().to_string(), raw));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn log_level_labels() {
        assert_eq!(LogLevel::Info.label(), "INFO ");
        assert_eq!(LogLevel::Error.label(), "ERROR");
        assert_eq!(LogLevel::from(tracing::Level::WARN), LogLevel::Warn);
    }

    #[test]
    fn layer_captures_message_and_fields() {
        let (layer, buffer) = LogCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Loaded catalog");
            tracing::warn!(mission_id = 4, "Deleted mission");
            tracing::debug!(favorite = true);
        });

        let lines = buffer.drain();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].message, "Loaded catalog");
        assert_eq!(lines[0].level, LogLevel::Info);
        assert_eq!(lines[1].message, "Deleted mission {mission_id=4}");
        assert_eq!(lines[2].message, "favorite=true");
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn drain_into_trims_backlog() {
        let buffer = LogBuffer::new();
        let mut target: Vec<LogLine> = (0..MAX_LOG_LINES)
            .map(|i| LogLine {
                time: String::new(),
                level: LogLevel::Info,
                message: i.to_string(),
            })
            .collect();
        buffer.push(LogLine {
            time: String::new(),
            level: LogLevel::Info,
            message: "last".into(),
        });
        buffer.drain_into(&mut target);
        assert_eq!(target.len(), LOG_TRIM_TO);
        assert_eq!(target.last().unwrap().message, "last");
    }
}
