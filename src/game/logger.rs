//! Centralized game logger
//!
//! Every entry is captured into the game's chronological log, which is part
//! of the game result. Entries can additionally be echoed to stdout, filtered
//! by verbosity; warnings echo to stderr.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns, key actions and choices (default)
    #[default]
    Normal = 2,
    /// Verbose - phase transitions and state changes too
    Verbose = 3,
}

impl FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityLevel::Silent),
            "minimal" | "1" => Ok(VerbosityLevel::Minimal),
            "normal" | "2" => Ok(VerbosityLevel::Normal),
            "verbose" | "3" => Ok(VerbosityLevel::Verbose),
            _ => Err(format!(
                "Invalid verbosity level: {s}. Expected silent, minimal, normal, verbose (or 0-3)"
            )),
        }
    }
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Capture only to the in-memory log (default)
    #[default]
    Memory,
    /// Capture and echo to stdout
    Both,
}

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g., "controller_choice", "warning")
    pub category: Option<String>,
}

/// Read-only access to captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger owned by the game state
///
/// Uses interior mutability so controllers holding only a shared view of the
/// game can still record their choices.
#[derive(Serialize, Deserialize)]
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    entries: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            entries: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    fn record(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        let echo = self.output_mode == OutputMode::Both && level <= self.verbosity;
        if echo {
            match category {
                Some("warning") => eprintln!("WARNING: {message}"),
                _ if level == VerbosityLevel::Minimal => println!("{message}"),
                _ => println!("  {message}"),
            }
        }

        self.entries.borrow_mut().push(LogEntry {
            level,
            message: message.to_string(),
            category: category.map(str::to_string),
        });
    }

    /// Game outcome lines
    pub fn minimal(&self, message: &str) {
        self.record(VerbosityLevel::Minimal, message, None);
    }

    /// Actions: lands, spells, attacks, effects
    pub fn normal(&self, message: &str) {
        self.record(VerbosityLevel::Normal, message, None);
    }

    /// Phase transitions and bookkeeping
    pub fn verbose(&self, message: &str) {
        self.record(VerbosityLevel::Verbose, message, None);
    }

    /// Recoverable oddities such as an unknown token template
    pub fn warn(&self, message: &str) {
        self.record(VerbosityLevel::Minimal, message, Some("warning"));
    }

    /// Log a controller decision at Normal level
    pub fn controller_choice(&self, controller_name: &str, message: &str) {
        self.record(
            VerbosityLevel::Normal,
            &format!("{controller_name}: {message}"),
            Some("controller_choice"),
        );
    }

    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.entries.borrow(),
        }
    }

    /// Plain messages in chronological order
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.message.contains(needle))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear_logs(&mut self) {
        self.entries.get_mut().clear();
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.entries.borrow().len())
            .finish()
    }
}

impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_mode: self.output_mode,
            entries: RefCell::new(self.entries.borrow().clone()),
        }
    }
}
