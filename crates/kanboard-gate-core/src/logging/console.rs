//! Console logger implementation

use super::traits::Logger;

/// A logger that writes to stderr
///
/// stdout is left alone because the tool transport owns it. Debug lines
/// are dropped unless the logger was built verbose (`KANBOARD_DEBUG=true`).
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    verbose: bool,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a console logger with the default prefix, debug disabled
    pub fn new() -> Self {
        Self {
            prefix: "[KanboardGate]".to_string(),
            verbose: false,
        }
    }

    /// Create a console logger whose debug output follows `verbose`
    pub fn verbose(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::new()
        }
    }

    /// Replace the line prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        if self.verbose {
            eprintln!("{} DEBUG: {}", self.prefix, message);
        }
    }

    fn info(&self, message: &str) {
        eprintln!("{} INFO: {}", self.prefix, message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} WARN: {}", self.prefix, message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} ERROR: {}", self.prefix, message);
    }
}
