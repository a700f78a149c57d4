// Leveled diagnostic output.
//
// Every non-fatal diagnostic the processor produces - errprint, dumpdef,
// htdist, and warnings about benign conditions - goes through here rather
// than a scattered eprintln!, so verbosity is controlled in one place.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Error,
    Warning,
    Info,
    Debug,
}

#[derive(Debug, Clone)]
pub struct Msg {
    level: DebugLevel,
}

impl Msg {
    pub fn new() -> Msg {
        Msg {
            level: DebugLevel::Error,
        }
    }

    pub fn set_level(&mut self, level: DebugLevel) {
        self.level = level;
    }

    pub fn get_level(&self) -> DebugLevel {
        self.level
    }

    /// error is always shown, regardless of the configured level.
    pub fn error<T: Display>(&self, caller: &str, text: &str, detail: Option<T>) {
        match detail {
            Some(d) => eprintln!("m4: {caller}: {text}: {d}"),
            None => eprintln!("m4: {caller}: {text}"),
        }
    }

    pub fn warning<T: Display>(&self, caller: &str, text: &str, detail: Option<T>) {
        if self.level >= DebugLevel::Warning {
            match detail {
                Some(d) => eprintln!("m4: warning: {caller}: {text}: {d}"),
                None => eprintln!("m4: warning: {caller}: {text}"),
            }
        }
    }

    pub fn info(&self, text: &str) {
        if self.level >= DebugLevel::Info {
            eprintln!("m4: {text}");
        }
    }

    /// line writes a plain diagnostic line unconditionally - used by
    /// errprint/dumpdef/htdist, whose output is part of the program's
    /// documented contract rather than debug chatter.
    pub fn line(&self, text: &str) {
        eprintln!("{text}");
    }
}

impl Default for Msg {
    fn default() -> Msg {
        Msg::new()
    }
}
