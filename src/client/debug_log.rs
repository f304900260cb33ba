//! Invocation-scoped debug log capture.

use parking_lot::Mutex;
use serde::Serialize;

/// Captured request/response trace for one invocation.
///
/// Returned by [`Client::take_debug_log`](crate::Client::take_debug_log)
/// when the client was built with `debug(true)`. Shaped for direct inclusion
/// in an automation result envelope.
#[derive(Debug, Clone, Serialize)]
pub struct DebugLog {
    /// The full captured text.
    pub sdk_out: String,
    /// The captured text split into lines.
    pub sdk_out_lines: Vec<String>,
}

/// Buffer the REST client appends trace lines to.
///
/// Scoped to the client instance, which is scoped to one invocation; taking
/// the log drains the buffer, so nothing accumulates across invocations.
/// When capture is disabled every record call is a no-op.
pub(crate) struct DebugBuffer {
    enabled: bool,
    lines: Mutex<Vec<String>>,
}

impl DebugBuffer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn record(&self, line: impl Into<String>) {
        if self.enabled {
            self.lines.lock().push(line.into());
        }
    }

    /// Drains the buffer. `None` when capture is disabled.
    pub fn take(&self) -> Option<DebugLog> {
        if !self.enabled {
            return None;
        }
        let lines = std::mem::take(&mut *self.lines.lock());
        Some(DebugLog {
            sdk_out: lines.join("\n"),
            sdk_out_lines: lines,
        })
    }
}
