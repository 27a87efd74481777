use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Parsing,
    Plugins,
    Generating,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub progress: f64,
    pub message: String,
    /// Stage-specific fields, serialized next to the fixed ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProgressEvent {
    pub fn new(stage: Stage, progress: f64, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress,
            message: message.into(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// Receives pipeline progress. `note` carries human-only text such as the
/// report body; machine-readable sinks drop it.
pub trait ProgressSink {
    fn emit(&mut self, event: ProgressEvent);

    fn note(&mut self, _text: &str) {}
}

/// Plain lines for a terminal.
pub struct TextProgress<W: Write> {
    out: W,
}

impl<W: Write> TextProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for TextProgress<W> {
    fn emit(&mut self, event: ProgressEvent) {
        if !event.message.is_empty() {
            let _ = writeln!(self.out, "{}", event.message);
        }
    }

    fn note(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }
}

/// One JSON object per line, for wrappers that drive the converter.
pub struct JsonProgress<W: Write> {
    out: W,
}

impl<W: Write> JsonProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for JsonProgress<W> {
    fn emit(&mut self, event: ProgressEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => {
                let _ = writeln!(self.out, "{line}");
                let _ = self.out.flush();
            }
            Err(e) => log::warn!("cannot serialize progress event: {e}"),
        }
    }
}

/// Collects events in memory.
impl ProgressSink for Vec<ProgressEvent> {
    fn emit(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}
