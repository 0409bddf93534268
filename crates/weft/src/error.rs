use crate::scanner::Scanner;
use crate::token::Marker;

/// Sentinel that marks the `what()` of a reader that could not be built.
///
/// Construction problems are deferred into readers that always fail, so a
/// grammar can be assembled in any case; printing the grammar and searching
/// for this sentinel detects such problems statically.
pub const INVALID_READER: &str = "::INVALID-READER::";

/// Produced by every reader failure.
///
/// `marker` is the deepest position that was reached during the failed read;
/// ordered choice uses it to keep the most informative failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not able to read {what:?} at byte {marker}")]
pub struct ReadError {
    pub what: String,
    pub marker: Marker,
}

impl ReadError {
    pub fn new<S: Into<String>>(what: S, marker: Marker) -> ReadError {
        ReadError {
            what: what.into(),
            marker,
        }
    }

    /// Reports if this failure reached at least as deep as `oth`.
    pub fn later(&self, oth: &ReadError) -> bool {
        self.marker >= oth.marker
    }
}

/// Raised by [`check_rules`][crate::check_rules] at grammar-build time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("invalid rule name {0:?}")]
    InvalidRuleName(String),
    #[error("rule {0:?} has no reader")]
    UnboundRule(String),
}

impl<'a> Scanner<'a> {
    /// Build a [`ReadError`] for `what` at the current position.
    pub fn error_for(&self, what: &str) -> ReadError {
        ReadError::new(what, self.mark())
    }

    /// Map a primitive result onto a read result: `Ok` on `true`, a fresh
    /// error for `what` on `false`.
    pub fn bool_error_for(&self, ok: bool, what: &str) -> Result<(), ReadError> {
        if ok {
            Ok(())
        } else {
            Err(self.error_for(what))
        }
    }
}
