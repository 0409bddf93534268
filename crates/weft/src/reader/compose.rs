use std::rc::Rc;

use super::{IntoReader, Reader};
use crate::error::ReadError;
use crate::scanner::Scanner;
use crate::token::Token;

/// Compose a sequence reader; every element is converted via
/// [`IntoReader`][crate::IntoReader].
#[macro_export]
macro_rules! seq {
    ($($sub:expr),+ $(,)?) => {
        $crate::seq_of(vec![$($crate::IntoReader::into_reader($sub)),+])
    };
}

/// Compose an ordered-choice reader; every element is converted via
/// [`IntoReader`][crate::IntoReader].
#[macro_export]
macro_rules! any {
    ($($sub:expr),+ $(,)?) => {
        $crate::any_of(vec![$($crate::IntoReader::into_reader($sub)),+])
    };
}

struct SeqReader {
    subs: Vec<Rc<dyn Reader>>,
}

impl Reader for SeqReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let m = sca.mark();
        for sub in &self.subs {
            if let Err(e) = sub.read(sca) {
                sca.to_marker(m);
                return Err(e);
            }
        }
        Ok(())
    }

    fn what(&self) -> String {
        self.subs
            .iter()
            .map(|sub| sub.what())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// All readers must match in order; on any failure the scanner is restored
/// and the failing sub-error is returned.
pub fn seq_of(subs: Vec<Rc<dyn Reader>>) -> Rc<dyn Reader> {
    Rc::new(SeqReader { subs })
}

struct AnyReader {
    subs: Vec<Rc<dyn Reader>>,
}

impl Reader for AnyReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let m = sca.mark();
        let mut deepest: Option<ReadError> = None;
        for sub in &self.subs {
            match sub.read(sca) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    sca.to_marker(m);
                    deepest = Some(match deepest {
                        Some(d) if d.later(&e) => d,
                        _ => e,
                    });
                }
            }
        }
        Err(deepest.unwrap_or_else(|| sca.error_for(&self.what())))
    }

    fn what(&self) -> String {
        let subs = self
            .subs
            .iter()
            .map(|sub| sub.what())
            .collect::<Vec<_>>()
            .join(" | ");
        format!("[ {} ]", subs)
    }
}

/// Ordered alternation: the first matching reader wins. If all fail, the
/// error of the branch that reached deepest into the input is returned.
pub fn any_of(subs: Vec<Rc<dyn Reader>>) -> Rc<dyn Reader> {
    Rc::new(AnyReader { subs })
}

struct OptReader {
    sub: Rc<dyn Reader>,
}

impl Reader for OptReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let _ = self.sub.read(sca);
        Ok(())
    }

    fn what(&self) -> String {
        format!("?{}", self.sub.what())
    }
}

/// Always succeeds; consumes the sub-reader if it matches.
pub fn opt(sub: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(OptReader {
        sub: sub.into_reader(),
    })
}

struct ManyReader {
    sub: Rc<dyn Reader>,
}

impl Reader for ManyReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let start = sca.mark();
        while self.sub.read(sca).is_ok() {}
        let ok = start < sca.mark();
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        format!("+{}", self.sub.what())
    }
}

/// Greedy repetition that must match at least once.
pub fn many(sub: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(ManyReader {
        sub: sub.into_reader(),
    })
}

struct ZomReader {
    sub: Rc<dyn Reader>,
}

impl Reader for ZomReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        while self.sub.read(sca).is_ok() {}
        Ok(())
    }

    fn what(&self) -> String {
        format!("*{}", self.sub.what())
    }
}

/// Greedy zero-or-more repetition; always succeeds.
pub fn zom(sub: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(ZomReader {
        sub: sub.into_reader(),
    })
}

struct TimesReader {
    n: usize,
    sub: Rc<dyn Reader>,
}

impl Reader for TimesReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let m = sca.mark();
        for _ in 0..self.n {
            if let Err(e) = self.sub.read(sca) {
                sca.to_marker(m);
                return Err(e);
            }
        }
        Ok(())
    }

    fn what(&self) -> String {
        format!("{{{}}}{}", self.n, self.sub.what())
    }
}

/// The sub-reader must match exactly `n` times.
pub fn times(n: usize, sub: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(TimesReader {
        n,
        sub: sub.into_reader(),
    })
}

struct ToReader {
    sub: Rc<dyn Reader>,
}

impl Reader for ToReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let entry = sca.mark();
        loop {
            let here = sca.mark();
            if self.sub.read(sca).is_ok() {
                sca.to_marker(here);
                return Ok(());
            }
            if sca.at_end() {
                sca.to_marker(entry);
                return Err(sca.error_for(&self.what()));
            }
            sca.move_runes(1);
        }
    }

    fn what(&self) -> String {
        format!("->{}", self.sub.what())
    }
}

/// Advances rune by rune until the sub-reader would match at the current
/// position; consumes nothing of the match itself. Fails at the end of the
/// input without a match.
pub fn to(sub: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(ToReader {
        sub: sub.into_reader(),
    })
}

struct PastReader {
    sub: Rc<dyn Reader>,
}

impl Reader for PastReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let entry = sca.mark();
        loop {
            if self.sub.read(sca).is_ok() {
                return Ok(());
            }
            if sca.at_end() {
                sca.to_marker(entry);
                return Err(sca.error_for(&self.what()));
            }
            sca.move_runes(1);
        }
    }

    fn what(&self) -> String {
        format!("-->{}", self.sub.what())
    }
}

/// Like [`to`], but also consumes the match.
pub fn past(sub: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(PastReader {
        sub: sub.into_reader(),
    })
}

struct AtReader {
    sub: Rc<dyn Reader>,
}

impl Reader for AtReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let m = sca.mark();
        let res = self.sub.read(sca);
        sca.to_marker(m);
        res
    }

    fn what(&self) -> String {
        format!("@{}", self.sub.what())
    }
}

/// Lookahead: succeeds iff the sub-reader would match; consumes nothing.
pub fn at(sub: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(AtReader {
        sub: sub.into_reader(),
    })
}

struct AtEndReader;

impl Reader for AtEndReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.at_end();
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        "@end".to_string()
    }
}

/// Succeeds iff the scanner is at the end of the input.
pub fn at_end() -> Rc<dyn Reader> {
    Rc::new(AtEndReader)
}

struct NotReader {
    sub: Rc<dyn Reader>,
}

impl Reader for NotReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let m = sca.mark();
        match self.sub.read(sca) {
            Ok(()) => {
                sca.to_marker(m);
                Err(sca.error_for(&self.what()))
            }
            Err(_) => {
                let ok = sca.move_runes(1);
                sca.bool_error_for(ok, &self.what())
            }
        }
    }

    fn what(&self) -> String {
        format!("!{}", self.sub.what())
    }
}

/// If the sub-reader matches, fails without consuming; otherwise consumes
/// one rune.
pub fn not(sub: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(NotReader {
        sub: sub.into_reader(),
    })
}

struct NamedReader {
    name: String,
    sub: Rc<dyn Reader>,
}

impl Reader for NamedReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        self.sub.read(sca)
    }

    fn what(&self) -> String {
        self.name.clone()
    }
}

/// Delegates to the sub-reader but reports `name` as its `what()`.
pub fn named(name: &str, sub: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(NamedReader {
        name: name.to_string(),
        sub: sub.into_reader(),
    })
}

struct MapReader {
    sub: Rc<dyn Reader>,
    f: Box<dyn Fn(Token, &str)>,
}

impl Reader for MapReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let t = sca.tokenize_use(self.sub.as_ref())?;
        (self.f)(t, sca.get(t));
        Ok(())
    }

    fn what(&self) -> String {
        self.sub.what()
    }
}

/// Runs the sub-reader; on success calls `f` with the matched token and its
/// text.
pub fn map(sub: impl IntoReader, f: impl Fn(Token, &str) + 'static) -> Rc<dyn Reader> {
    Rc::new(MapReader {
        sub: sub.into_reader(),
        f: Box::new(f),
    })
}

struct WrapReader {
    what: String,
    f: Box<dyn Fn(&mut Scanner<'_>) -> Result<(), ReadError>>,
}

impl Reader for WrapReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        (self.f)(sca)
    }

    fn what(&self) -> String {
        self.what.clone()
    }
}

/// Lifts a bare scan function into a reader.
pub fn wrap(
    what: &str,
    f: impl Fn(&mut Scanner<'_>) -> Result<(), ReadError> + 'static,
) -> Rc<dyn Reader> {
    Rc::new(WrapReader {
        what: what.to_string(),
        f: Box::new(f),
    })
}
