use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::ReadError;
use crate::grammar::{Grammar, Rule};
use crate::reader::{IntoReader, Reader};
use crate::scanner::Scanner;

/// One enter/exit record of a monitored reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub enter_at: usize,
    pub info: String,
    pub level: usize,
    pub exit_at: usize,
    pub error: Option<ReadError>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}@ {} {}",
            self.level,
            ".".repeat(self.level),
            self.enter_at,
            self.info
        )
    }
}

/// A per-rule entry/exit trace for debugging grammars.
#[derive(Default)]
pub struct Log {
    entries: RefCell<Vec<LogEntry>>,
    level: Cell<usize>,
}

impl Log {
    pub fn new() -> Rc<Log> {
        Rc::new(Log::default())
    }

    fn enter(&self, info: &str, pos: usize) -> usize {
        self.level.set(self.level.get() + 1);
        let mut entries = self.entries.borrow_mut();
        entries.push(LogEntry {
            enter_at: pos,
            info: info.to_string(),
            level: self.level.get(),
            exit_at: 0,
            error: None,
        });
        entries.len() - 1
    }

    fn exit(&self, i: usize, pos: usize, error: Option<ReadError>) {
        let mut entries = self.entries.borrow_mut();
        entries[i].exit_at = pos;
        entries[i].error = error;
        self.level.set(self.level.get() - 1);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// One rendered line per entry.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    /// Like [`lines`][Log::lines], with a quoted preview of `n` runes of
    /// `input` starting at each entry position.
    pub fn lines_with_preview(&self, input: &str, n: usize) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|e| format!("{} > {:?}", e, rune_preview(input, e.enter_at, n)))
            .collect()
    }

    pub fn reset(&self) {
        self.entries.borrow_mut().clear();
        self.level.set(0);
    }

    /// Decorate the readers of all `rules` to report into this log; returns
    /// the log for chaining.
    pub fn monitor_rules(self: Rc<Self>, rules: &[Rule]) -> Rc<Log> {
        for rule in rules {
            rule.monitor(&self);
        }
        self
    }
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in self.entries.borrow().iter() {
            writeln!(f, "{}", e)?;
        }
        Ok(())
    }
}

/// Up to `n` runes of `input` starting at byte position `from`.
fn rune_preview(input: &str, from: usize, n: usize) -> &str {
    let tail = &input[from..];
    match tail.char_indices().nth(n) {
        Some((i, _)) => &tail[..i],
        None => tail,
    }
}

struct MonitorReader {
    info: String,
    log: Rc<Log>,
    sub: Rc<dyn Reader>,
}

impl Reader for MonitorReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let entry = self.log.enter(&self.info, sca.mark().0);
        let res = self.sub.read(sca);
        self.log.exit(entry, sca.mark().0, res.clone().err());
        res
    }

    fn what(&self) -> String {
        self.sub.what()
    }
}

/// Wrap `sub` so the log records a push before delegation and a pop with
/// exit position and error after it.
pub fn monitor(sub: impl IntoReader, log: &Rc<Log>, info: &str) -> Rc<dyn Reader> {
    Rc::new(MonitorReader {
        info: info.to_string(),
        log: Rc::clone(log),
        sub: sub.into_reader(),
    })
}

/// Create a log and wrap every rule of `grammar` with it.
pub fn monitor_grammar(grammar: &dyn Grammar) -> Rc<Log> {
    Log::new().monitor_rules(&grammar.rules())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{many, digit, seq};
    use pretty_assertions::assert_eq;

    #[test]
    fn records_nested_entries() {
        let log = Log::new();
        let num = monitor(many(digit()), &log, "num");
        let pair = monitor(seq!(num.clone(), ';', num), &log, "pair");

        let mut sca = Scanner::new("1;23");
        assert!(sca.use_reader(&*pair).is_ok());

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].info, "pair");
        assert_eq!(entries[0].level, 1);
        assert_eq!(entries[0].exit_at, 4);
        assert_eq!(entries[1].info, "num");
        assert_eq!(entries[1].level, 2);
        assert_eq!(entries[1].enter_at, 0);
        assert_eq!(entries[2].enter_at, 2);
        assert!(entries.iter().all(|e| e.error.is_none()));
    }

    #[test]
    fn records_errors_on_exit() {
        let log = Log::new();
        let num = monitor(many(digit()), &log, "num");
        let mut sca = Scanner::new("x");
        assert!(sca.use_reader(&*num).is_err());

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].error.is_some());
        assert_eq!(entries[0].exit_at, 0);
    }

    #[test]
    fn renders_lines_with_preview() {
        let log = Log::new();
        let num = monitor(many(digit()), &log, "num");
        let pair = monitor(seq!(num.clone(), ';', num), &log, "pair");
        let mut sca = Scanner::new("1;23");
        assert!(sca.use_reader(&*pair).is_ok());

        assert_eq!(log.lines()[0], "1.@ 0 pair");
        assert_eq!(log.lines()[1], "2..@ 0 num");
        assert_eq!(
            log.lines_with_preview("1;23", 3)[2],
            "2..@ 2 num > \"23\""
        );

        log.reset();
        assert!(log.entries().is_empty());
    }
}
