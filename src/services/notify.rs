use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Transient user-facing messages. Consumers only; engines never notify
/// directly so they stay pure.
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Writes to stderr so `--json` output on stdout stays machine-readable.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        eprintln!("[{}] {}", severity, message);
    }
}

/// Records messages instead of printing; used by replay reports and tests.
#[derive(Default)]
pub struct MemoryNotifier {
    pub messages: Vec<(Severity, String)>,
}

impl Notifier for MemoryNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.messages.push((severity, message.to_string()));
    }
}
