use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::basket::{pick, Basket};
use crate::error::{GrammarError, ReadError, INVALID_READER};
use crate::monitor::{monitor, Log};
use crate::reader::compose::{map, named, zom};
use crate::reader::primitive::{any_rune, between_any};
use crate::reader::{IntoReader, Reader};
use crate::scanner::Scanner;
use crate::token::Token;
use crate::{any, seq};

struct RuleInner {
    name: RefCell<String>,
    reader: RefCell<Option<Rc<dyn Reader>>>,
}

impl RuleInner {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let sub = self
            .reader
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("rule {:?} has no reader", self.name.borrow()));
        sub.read(sca)
    }
}

/// A named, late-bound reader.
///
/// A rule is addressable by identity before its reader is assigned, so
/// recursive grammars can be wired up in any order: allocate the rules
/// first, then fill their reader slots. Matching a rule that never got a
/// reader is a programming error that [`check_rules`] reports at
/// grammar-build time.
///
/// `Rule` is a cheap handle; clones refer to the same rule. Readers built
/// from a `&Rule` hold a weak reference, so cyclic grammars do not leak —
/// the grammar carrier keeps the strong handles alive.
#[derive(Clone)]
pub struct Rule {
    inner: Rc<RuleInner>,
}

impl Rule {
    pub fn named(name: &str) -> Rule {
        Rule {
            inner: Rc::new(RuleInner {
                name: RefCell::new(name.to_string()),
                reader: RefCell::new(None),
            }),
        }
    }

    pub fn name(&self) -> String {
        self.inner.name.borrow().clone()
    }

    pub fn set_name(&self, name: &str) {
        *self.inner.name.borrow_mut() = name.to_string();
    }

    /// Assign the reader of this rule.
    pub fn set(&self, sub: impl IntoReader) {
        *self.inner.reader.borrow_mut() = Some(sub.into_reader());
    }

    pub fn is_bound(&self) -> bool {
        self.inner.reader.borrow().is_some()
    }

    /// The grammar line of this rule in the form `name: what()`.
    pub fn line(&self) -> String {
        let what = match &*self.inner.reader.borrow() {
            Some(sub) => sub.what(),
            None => format!("{}{{unbound}}", INVALID_READER),
        };
        format!("{}: {}", self.name(), what)
    }

    fn decorate(&self, wrap: impl FnOnce(Rc<dyn Reader>) -> Rc<dyn Reader>) {
        let mut slot = self.inner.reader.borrow_mut();
        let sub = slot
            .take()
            .unwrap_or_else(|| panic!("rule {:?} has no reader", self.name()));
        *slot = Some(wrap(sub));
    }

    /// Decorate this rule's reader to pick its spans into `basket`, labeled
    /// with the rule name.
    pub fn pick(&self, basket: &Rc<Basket>) {
        let info = self.name();
        self.decorate(|sub| pick(sub, basket, &info));
    }

    /// Decorate this rule's reader to report into `log` under the rule
    /// name.
    pub fn monitor(&self, log: &Rc<Log>) {
        let info = self.name();
        self.decorate(|sub| monitor(sub, log, &info));
    }

    /// Decorate this rule's reader to call `f` with the matched token and
    /// its text on every successful read.
    pub fn map(&self, f: impl Fn(Token, &str) + 'static) {
        self.decorate(|sub| map(sub, f));
    }
}

impl Reader for Rule {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        self.inner.read(sca)
    }

    fn what(&self) -> String {
        self.name()
    }
}

/// Late-bound delegate used when a rule is referenced inside a reader tree.
struct RuleRef {
    inner: Weak<RuleInner>,
}

impl Reader for RuleRef {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let inner = self.inner.upgrade().expect("rule dropped while matching");
        inner.read(sca)
    }

    fn what(&self) -> String {
        match self.inner.upgrade() {
            Some(inner) => inner.name.borrow().clone(),
            None => format!("{}{{dropped rule}}", INVALID_READER),
        }
    }
}

impl IntoReader for &Rule {
    fn into_reader(self) -> Rc<dyn Reader> {
        Rc::new(RuleRef {
            inner: Rc::downgrade(&self.inner),
        })
    }
}

impl IntoReader for Rule {
    fn into_reader(self) -> Rc<dyn Reader> {
        Rc::new(self)
    }
}

/// A set of rules exposed by a host object, in declaration order.
pub trait Grammar {
    fn rules(&self) -> Vec<Rule>;
}

/// A reusable reader for legal rule names.
pub fn rule_name() -> Rc<dyn Reader> {
    named(
        "rule-name",
        seq!(
            between_any("a-zA-Z"),
            zom(any!(between_any("a-zA-Z0-9"), any_rune("+-._")))
        ),
    )
}

/// Verify that `name` is a legal rule name: `[A-Za-z][A-Za-z0-9+\-._]*`.
pub fn check_rule_name(name: &str) -> Result<(), GrammarError> {
    let mut sca = Scanner::new(name);
    let ok = sca.use_reader(&*rule_name()).is_ok() && sca.at_end();
    if ok {
        Ok(())
    } else {
        Err(GrammarError::InvalidRuleName(name.to_string()))
    }
}

/// Verify that every rule of `grammar` has a legal name and a reader.
pub fn check_rules(grammar: &dyn Grammar) -> Result<(), GrammarError> {
    for rule in grammar.rules() {
        check_rule_name(&rule.name())?;
        if !rule.is_bound() {
            return Err(GrammarError::UnboundRule(rule.name()));
        }
    }
    Ok(())
}

/// One line per rule in the form `name: what()`; a line containing the
/// [`INVALID_READER`] sentinel indicates a construction bug.
pub fn grammar_lines(grammar: &dyn Grammar) -> Vec<String> {
    grammar.rules().iter().map(|rule| rule.line()).collect()
}
