//! Injectable diagnostics sink
//!
//! Non-fatal notices (deprecated option names, SDK log lines) are routed
//! through a `Diagnostics` handle passed into construction instead of a
//! process-wide channel, so callers decide where they go.

use std::sync::Mutex;

/// Receives non-fatal notices produced while building an adapter.
pub trait Diagnostics: Send + Sync {
    fn warn(&self, message: &str);

    fn info(&self, message: &str) {
        let _ = message;
    }
}

/// Forwards notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "chatlayer", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "chatlayer", "{}", message);
    }
}

/// Keeps every warning in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings recorded so far.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, message: &str) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn recording_diagnostics_keeps_order() {
        let diagnostics = RecordingDiagnostics::new();
        diagnostics.warn("first");
        diagnostics.info("ignored");
        diagnostics.warn("second");
        assert_eq!(diagnostics.warnings(), vec!["first", "second"]);
    }

    #[test]
    fn tracing_diagnostics_emits_warn_events() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingDiagnostics.warn("option renamed");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("option renamed"));
    }
}
