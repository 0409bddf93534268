use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::ReadError;
use crate::grammar::{Grammar, Rule};
use crate::reader::{IntoReader, Reader};
use crate::scanner::Scanner;
use crate::segment::Segment;
use crate::token::Marker;

/// Observer that is notified whenever a scanner moves backwards.
///
/// The callback runs synchronously on the scanner's call stack and must not
/// re-enter the scanner.
pub trait Tracker {
    fn update(&self, m: Marker);
}

/// A backtrack-aware collection of labeled spans.
///
/// Segments are appended by [`pick`] readers when their sub-reader
/// succeeds. Installed as the scanner's tracker, the basket discards every
/// segment that ends behind the position a backtrack retreats to, so the
/// collection never contains a span the parser later un-consumed.
#[derive(Default)]
pub struct Basket {
    segments: RefCell<Vec<Segment>>,
}

impl Basket {
    pub fn new() -> Rc<Basket> {
        Rc::new(Basket::default())
    }

    pub fn add(&self, seg: Segment) {
        self.segments.borrow_mut().push(seg);
    }

    /// The collected segments, in completion order.
    pub fn picked(&self) -> Vec<Segment> {
        self.segments.borrow().clone()
    }

    /// Decorate the readers of all `rules` to pick into this basket; returns
    /// the basket for chaining.
    pub fn pick_with(self: Rc<Self>, rules: &[Rule]) -> Rc<Basket> {
        for rule in rules {
            rule.pick(&self);
        }
        self
    }
}

impl Tracker for Basket {
    /// Truncate to the longest prefix whose segments all end at or before
    /// `m`.
    fn update(&self, m: Marker) {
        let mut segments = self.segments.borrow_mut();
        let keep = segments
            .iter()
            .rposition(|seg| seg.token.to <= m)
            .map_or(0, |i| i + 1);
        segments.truncate(keep);
    }
}

impl fmt::Display for Basket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments = self.segments.borrow();
        let mut first = true;
        for seg in segments.iter() {
            if !first {
                write!(f, ";")?;
            }
            write!(f, "{}", seg)?;
            first = false;
        }
        Ok(())
    }
}

struct PickReader {
    info: String,
    basket: Rc<Basket>,
    sub: Rc<dyn Reader>,
}

impl Reader for PickReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let t = sca.tokenize_use(self.sub.as_ref())?;
        self.basket.add(Segment::new(&self.info[..], t));
        Ok(())
    }

    fn what(&self) -> String {
        self.sub.what()
    }
}

/// Wrap `sub` so every successful read appends its span to the basket,
/// labeled with `info`.
pub fn pick(sub: impl IntoReader, basket: &Rc<Basket>, info: &str) -> Rc<dyn Reader> {
    Rc::new(PickReader {
        info: info.to_string(),
        basket: Rc::clone(basket),
        sub: sub.into_reader(),
    })
}

impl<'a> Scanner<'a> {
    /// Create an empty basket and install it as this scanner's tracker.
    pub fn new_basket(&mut self) -> Rc<Basket> {
        let basket = Basket::new();
        self.set_tracker(basket.clone());
        basket
    }

    /// Like [`new_basket`][Scanner::new_basket], additionally decorating
    /// every rule of `grammar` to pick into the basket.
    pub fn new_basket_for(&mut self, grammar: &dyn Grammar) -> Rc<Basket> {
        self.new_basket().pick_with(&grammar.rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;
    use crate::{any, digit, lit, many, seq};
    use pretty_assertions::assert_eq;

    fn s(info: &str, from: usize, to: usize) -> Segment {
        Segment::new(info, Token::new(Marker(from), Marker(to)))
    }

    #[test]
    fn picks_successful_reads() {
        let mut sca = Scanner::new("12;34");
        let basket = sca.new_basket();
        let num = pick(many(digit()), &basket, "num");
        let row = seq!(num.clone(), ';', num);
        assert!(sca.use_reader(&*row).is_ok());
        assert_eq!(basket.picked(), vec![s("num", 0, 2), s("num", 3, 5)]);
    }

    #[test]
    fn failed_reads_pick_nothing() {
        let mut sca = Scanner::new("ab");
        let basket = sca.new_basket();
        let num = pick(many(digit()), &basket, "num");
        assert!(sca.use_reader(&*num).is_err());
        assert!(basket.picked().is_empty());
    }

    #[test]
    fn backtracking_prunes_picked_segments() {
        // the first branch picks two numbers and then fails on the
        // terminator, the second branch keeps only the re-read first number
        let mut sca = Scanner::new("12,34;");
        let basket = sca.new_basket();
        let num = pick(many(digit()), &basket, "num");
        let reader = any!(
            seq!(num.clone(), ',', num.clone(), '!'),
            seq!(num.clone(), ',')
        );
        assert!(sca.use_reader(&*reader).is_ok());
        assert_eq!(basket.picked(), vec![s("num", 0, 2)]);
    }

    #[test]
    fn update_truncates_from_the_tail() {
        let basket = Basket::new();
        basket.add(s("a", 0, 2));
        basket.add(s("b", 2, 5));
        basket.add(s("c", 5, 9));
        basket.update(Marker(5));
        assert_eq!(basket.picked(), vec![s("a", 0, 2), s("b", 2, 5)]);
        basket.update(Marker(0));
        assert!(basket.picked().is_empty());
    }

    #[test]
    fn renders_picked_segments() {
        let basket = Basket::new();
        basket.add(s("key", 1, 4));
        basket.add(s("val", 5, 8));
        assert_eq!(basket.to_string(), "key@1..4;val@5..8");
    }

    #[test]
    fn lookahead_discards_picks() {
        let mut sca = Scanner::new("42");
        let basket = sca.new_basket();
        let num = pick(many(digit()), &basket, "num");
        let reader = seq!(crate::at(num.clone()), lit("42"));
        assert!(sca.use_reader(&*reader).is_ok());
        assert!(basket.picked().is_empty());
    }
}
