use std::cell::RefCell;
use std::rc::Rc;

use super::{IntoReader, Reader};
use crate::error::ReadError;
use crate::scanner::Scanner;

struct JanusBegin {
    name: String,
    sub: Rc<dyn Reader>,
    capture: Rc<RefCell<String>>,
}

impl Reader for JanusBegin {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let m = sca.mark();
        match self.sub.read(sca) {
            Ok(()) => {
                *self.capture.borrow_mut() = sca.since(m).to_string();
                Ok(())
            }
            Err(e) => {
                self.capture.borrow_mut().clear();
                Err(e)
            }
        }
    }

    fn what(&self) -> String {
        format!("${}<{}", self.name, self.sub.what())
    }
}

struct JanusEnd {
    name: String,
    capture: Rc<RefCell<String>>,
}

impl Reader for JanusEnd {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let captured = self.capture.borrow().clone();
        if sca.if_str(&captured) {
            self.capture.borrow_mut().clear();
            Ok(())
        } else {
            Err(sca.error_for(&self.what()))
        }
    }

    fn what(&self) -> String {
        format!("${}", self.name)
    }
}

/// A contextual back-reference pair.
///
/// The returned `begin` reader runs `sub` and captures the substring it
/// consumed; the paired `end` reader matches iff the current position has a
/// prefix equal to that capture. After `end` succeeds the capture is
/// cleared, so later independent uses of the pair start fresh; a failing
/// `begin` leaves the capture empty.
///
/// This models lexical features like Lua long-bracket strings
/// `[==[ ... ]==]` whose closing delimiter must repeat the opening one
/// exactly.
pub fn janus(name: &str, sub: impl IntoReader) -> (Rc<dyn Reader>, Rc<dyn Reader>) {
    let capture = Rc::new(RefCell::new(String::new()));
    let begin = JanusBegin {
        name: name.to_string(),
        sub: sub.into_reader(),
        capture: Rc::clone(&capture),
    };
    let end = JanusEnd {
        name: name.to_string(),
        capture,
    };
    (Rc::new(begin), Rc::new(end))
}
