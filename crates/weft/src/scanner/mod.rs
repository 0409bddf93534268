mod read;
mod rev;
mod rune;

use std::rc::Rc;

use crate::basket::Tracker;
use crate::token::{Marker, Token};

/// A cursor over an immutable UTF-8 string.
///
/// Every primitive operation either advances the position and reports
/// success, or leaves the position unchanged and reports failure. The
/// position always lies on a UTF-8 boundary.
///
/// An optional [`Tracker`] is notified whenever the scanner moves backwards,
/// so observers can discard speculatively collected state.
pub struct Scanner<'a> {
    full: &'a str,
    pos: usize,
    tracker: Option<Rc<dyn Tracker>>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner at the start of `input`.
    pub fn new(input: &'a str) -> Scanner<'a> {
        Scanner {
            full: input,
            pos: 0,
            tracker: None,
        }
    }

    /// Create a scanner at the end of `input`, for use with the reverse
    /// operations.
    pub fn new_rev(input: &'a str) -> Scanner<'a> {
        Scanner {
            full: input,
            pos: input.len(),
            tracker: None,
        }
    }

    /// The scanned input.
    pub fn input(&self) -> &'a str {
        self.full
    }

    /// Install `tracker` to be notified on every backward motion.
    pub fn set_tracker(&mut self, tracker: Rc<dyn Tracker>) {
        self.tracker = Some(tracker);
    }

    pub fn clear_tracker(&mut self) {
        self.tracker = None;
    }

    /// The only place that moves the position; fires the tracker on every
    /// retreat.
    pub(crate) fn set_pos(&mut self, to: usize) {
        if to < self.pos {
            if let Some(tracker) = &self.tracker {
                tracker.update(Marker(to));
            }
        }
        self.pos = to;
    }

    pub(crate) fn advance(&mut self, n: usize) -> bool {
        let to = self.pos + n;
        if to > self.full.len() {
            return false;
        }
        self.set_pos(to);
        true
    }

    pub(crate) fn retreat(&mut self, n: usize) -> bool {
        if n > self.pos {
            return false;
        }
        self.set_pos(self.pos - n);
        true
    }

    /// Move the position by `delta` bytes; fails without moving if the
    /// target is out of range or not a UTF-8 boundary.
    pub fn move_by(&mut self, delta: isize) -> bool {
        let to = self.pos as isize + delta;
        if to < 0 || to > self.full.len() as isize {
            return false;
        }
        let to = to as usize;
        if !self.full.is_char_boundary(to) {
            return false;
        }
        self.set_pos(to);
        true
    }

    /// Move the position by `delta` runes; fails without moving if not
    /// enough runes are available.
    pub fn move_runes(&mut self, delta: isize) -> bool {
        if delta >= 0 {
            let mut it = self.tail().char_indices();
            for _ in 0..delta {
                if it.next().is_none() {
                    return false;
                }
            }
            let n = it.next().map_or(self.tail().len(), |(i, _)| i);
            self.advance(n)
        } else {
            let mut n = 0;
            let mut head = self.head();
            for _ in 0..-delta {
                match head.chars().next_back() {
                    Some(c) => {
                        n += c.len_utf8();
                        head = &head[..head.len() - c.len_utf8()];
                    }
                    None => return false,
                }
            }
            self.retreat(n)
        }
    }

    // ------------------------------------------------------------------ state

    /// The not yet scanned part of the input.
    pub fn tail(&self) -> &'a str {
        &self.full[self.pos..]
    }

    /// The already scanned part of the input.
    pub fn head(&self) -> &'a str {
        &self.full[..self.pos]
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.full.len()
    }

    pub fn at_start(&self) -> bool {
        self.pos == 0
    }

    /// Snapshot the current position.
    pub fn mark(&self) -> Marker {
        Marker(self.pos)
    }

    /// Restore a previously captured position; fails on out-of-range or
    /// mid-rune markers.
    pub fn to_marker(&mut self, m: Marker) -> bool {
        if m.0 > self.full.len() || !self.full.is_char_boundary(m.0) {
            return false;
        }
        self.set_pos(m.0);
        true
    }

    pub fn to_end(&mut self) -> bool {
        self.set_pos(self.full.len());
        true
    }

    pub fn to_start(&mut self) -> bool {
        self.set_pos(0);
        true
    }

    /// The substring between `m` and the current position.
    pub fn since(&self, m: Marker) -> &'a str {
        self.get(Token::new(m, self.mark()))
    }

    /// The substring a token points at.
    pub fn get(&self, t: Token) -> &'a str {
        &self.full[t.from.0..t.to.0]
    }

    /// 1-based line and column of the current position. Tabs count as
    /// `tab_width` columns; CRLF is normalized to LF before counting.
    pub fn line_col(&self, tab_width: usize) -> (usize, usize) {
        let head = self.head().replace("\r\n", "\n");
        let line = head.matches('\n').count() + 1;
        let last = head.rsplit('\n').next().unwrap_or("");
        let col = 1 + last
            .chars()
            .map(|c| if c == '\t' { tab_width } else { 1 })
            .sum::<usize>();
        (line, col)
    }

    /// Read exactly `n` runes. Reports `false` without advancing if fewer
    /// than `n` runes are available; the returned slice is then the whole
    /// remaining tail.
    pub fn scan_string(&mut self, n: usize) -> (&'a str, bool) {
        let tail = self.tail();
        let mut count = 0;
        for (i, _) in tail.char_indices() {
            if count == n {
                self.advance(i);
                return (&tail[..i], true);
            }
            count += 1;
        }
        if count == n {
            self.to_end();
            return (tail, true);
        }
        (tail, false)
    }

    // ----------------------------------------------------------------- string

    /// Match the exact prefix `str`.
    pub fn if_str(&mut self, str: &str) -> bool {
        if self.tail().starts_with(str) {
            return self.advance(str.len());
        }
        false
    }

    /// Match the first of `strs` that is an exact prefix.
    pub fn if_any(&mut self, strs: &[&str]) -> bool {
        strs.iter().any(|str| self.if_str(str))
    }

    /// Advance to the first occurrence of `str` without consuming it.
    pub fn to_str(&mut self, str: &str) -> bool {
        if let Some(i) = self.tail().find(str) {
            return self.advance(i);
        }
        false
    }

    // ------------------------------------------------------------------- fold

    /// Match any prefix that equals `str` under case folding.
    pub fn if_fold(&mut self, str: &str) -> bool {
        if let Some(n) = fold_prefix_len(self.tail(), str) {
            return self.advance(n);
        }
        false
    }

    /// Advance to the first occurrence of `str` under case folding without
    /// consuming it.
    pub fn to_fold(&mut self, str: &str) -> bool {
        let tail = self.tail();
        for i in boundaries(tail) {
            if fold_prefix_len(&tail[i..], str).is_some() {
                return self.advance(i);
            }
        }
        false
    }
}

pub(crate) fn eq_fold(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte length of the prefix of `inp` that folds to `str`, if any.
pub(crate) fn fold_prefix_len(inp: &str, str: &str) -> Option<usize> {
    let mut n = 0;
    let mut chars = inp.chars();
    for p in str.chars() {
        let c = chars.next()?;
        if !eq_fold(c, p) {
            return None;
        }
        n += c.len_utf8();
    }
    Some(n)
}

/// All rune boundaries of `str` in order, including the end.
fn boundaries(str: &str) -> impl Iterator<Item = usize> + '_ {
    str.char_indices().map(|(i, _)| i).chain(Some(str.len()))
}
