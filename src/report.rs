//! Diagnostic sink for warnings and traces raised while importing.
//!
//! Library code never talks to the global logger directly. Everything goes
//! through a [`Reporter`] so callers decide where diagnostics end up: the
//! binary forwards them to `log`, tests capture them with [`MemoryReporter`].

use std::cell::RefCell;

use log::Level;

pub trait Reporter {
    fn report(&self, level: Level, message: String);

    fn warn(&self, message: String) {
        self.report(Level::Warn, message);
    }

    fn info(&self, message: String) {
        self.report(Level::Info, message);
    }

    fn debug(&self, message: String) {
        self.report(Level::Debug, message);
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, level: Level, message: String) {
        log::log!(target: "ioccc_db", level, "{message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == level)
            .map(|d| d.message.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(Level::Warn)
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, level: Level, message: String) {
        self.diagnostics
            .borrow_mut()
            .push(Diagnostic { level, message });
    }
}
