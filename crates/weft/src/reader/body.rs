use std::rc::Rc;

use super::{IntoReader, Reader};
use crate::error::ReadError;
use crate::scanner::Scanner;
use crate::token::Token;

struct BodyReader {
    body: Rc<dyn Reader>,
    tail: Rc<dyn Reader>,
    consume_tail: bool,
}

impl Reader for BodyReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let entry = sca.mark();
        loop {
            let here = sca.mark();
            if self.tail.read(sca).is_ok() {
                // the traversed prefix must be fully consumed by the body
                let prefix = sca.get(Token::new(entry, here));
                let mut sub = Scanner::new(prefix);
                if self.body.read(&mut sub).is_ok() && sub.at_end() {
                    if !self.consume_tail {
                        sca.to_marker(here);
                    }
                    return Ok(());
                }
                sca.to_marker(here);
            }
            if sca.at_end() {
                sca.to_marker(entry);
                return Err(sca.error_for(&self.what()));
            }
            sca.move_runes(1);
        }
    }

    fn what(&self) -> String {
        let glue = if self.consume_tail { "-->" } else { "->" };
        format!("body{{ {} {} {} }}", self.body.what(), glue, self.tail.what())
    }
}

/// Scans forward rune by rune, speculatively attempting `tail` at each
/// position. When `tail` matches and the traversed prefix is fully consumed
/// by `body` on a fresh scanner, the read stops *before* the tail.
pub fn body(body: impl IntoReader, tail: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(BodyReader {
        body: body.into_reader(),
        tail: tail.into_reader(),
        consume_tail: false,
    })
}

/// Like [`body`], but stops *after* the tail.
pub fn body_tail(body: impl IntoReader, tail: impl IntoReader) -> Rc<dyn Reader> {
    Rc::new(BodyReader {
        body: body.into_reader(),
        tail: tail.into_reader(),
        consume_tail: true,
    })
}
