pub mod body;
pub mod compose;
pub mod janus;
pub mod lexical;
pub mod primitive;

use std::rc::Rc;

use crate::error::ReadError;
use crate::scanner::Scanner;
use crate::token::Token;

/// A composable recognizer.
///
/// `read` either consumes input and reports `Ok`, or restores the scanner to
/// where it was entered and reports the failure, carrying the deepest
/// position that was reached. `what` renders the reader for diagnostics and
/// grammar printing.
pub trait Reader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError>;
    fn what(&self) -> String;
}

/// Conversion into a shared reader, so composite constructors accept plain
/// values: a `char` becomes a rune reader, a `&str` a literal reader and a
/// [`Rule`][crate::Rule] reference a late-bound delegate.
pub trait IntoReader {
    fn into_reader(self) -> Rc<dyn Reader>;
}

impl IntoReader for Rc<dyn Reader> {
    fn into_reader(self) -> Rc<dyn Reader> {
        self
    }
}

impl IntoReader for &Rc<dyn Reader> {
    fn into_reader(self) -> Rc<dyn Reader> {
        Rc::clone(self)
    }
}

impl IntoReader for char {
    fn into_reader(self) -> Rc<dyn Reader> {
        primitive::rune(self)
    }
}

impl IntoReader for &str {
    fn into_reader(self) -> Rc<dyn Reader> {
        primitive::lit(self)
    }
}

impl IntoReader for String {
    fn into_reader(self) -> Rc<dyn Reader> {
        primitive::lit(&self)
    }
}

impl<'a> Scanner<'a> {
    /// Drive `reader` at the current position.
    pub fn use_reader(&mut self, reader: &dyn Reader) -> Result<(), ReadError> {
        reader.read(self)
    }

    /// Drive `reader` and return the substring it consumed.
    pub fn traced_use(&mut self, reader: &dyn Reader) -> Result<&'a str, ReadError> {
        let m = self.mark();
        reader.read(self)?;
        Ok(self.since(m))
    }

    /// Drive `reader` and return a token of the region it consumed.
    pub fn tokenize_use(&mut self, reader: &dyn Reader) -> Result<Token, ReadError> {
        let m = self.mark();
        reader.read(self)?;
        Ok(Token::new(m, self.mark()))
    }
}
