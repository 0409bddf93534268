use std::rc::Rc;

use super::Reader;
use crate::error::{ReadError, INVALID_READER};
use crate::scanner::Scanner;

struct RuneReader {
    r: char,
}

impl Reader for RuneReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_rune(self.r);
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        format!("'{}'", self.r)
    }
}

/// Reads exactly the rune `r`.
pub fn rune(r: char) -> Rc<dyn Reader> {
    Rc::new(RuneReader { r })
}

struct LitReader {
    str: String,
}

impl Reader for LitReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_str(&self.str);
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        format!("\"{}\"", self.str)
    }
}

/// Reads exactly the byte sequence `str`.
pub fn lit(str: &str) -> Rc<dyn Reader> {
    Rc::new(LitReader {
        str: str.to_string(),
    })
}

struct FoldReader {
    str: String,
}

impl Reader for FoldReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_fold(&self.str);
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        format!("~\"{}\"", self.str)
    }
}

/// Reads any byte sequence that equals `str` under case folding.
pub fn fold(str: &str) -> Rc<dyn Reader> {
    Rc::new(FoldReader {
        str: str.to_string(),
    })
}

struct AnyRuneReader {
    set: String,
}

impl Reader for AnyRuneReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_any_rune(&self.set);
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        format!("[<{}>]", self.set)
    }
}

/// Reads one rune that is present in `set`.
pub fn any_rune(set: &str) -> Rc<dyn Reader> {
    Rc::new(AnyRuneReader {
        set: set.to_string(),
    })
}

struct BetweenReader {
    min: char,
    max: char,
}

impl Reader for BetweenReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_between(self.min, self.max);
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        format!("<{}{}>", self.min, self.max)
    }
}

/// Reads one rune in the inclusive range `[min, max]`.
pub fn between(min: char, max: char) -> Rc<dyn Reader> {
    Rc::new(BetweenReader { min, max })
}

struct HoleyReader {
    min: char,
    max: char,
    holes: String,
}

impl Reader for HoleyReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_match(|c| self.min <= c && c <= self.max && !self.holes.contains(c));
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        format!("<{}{}^{}>", self.min, self.max, self.holes)
    }
}

/// Reads one rune in `[min, max]` that is not one of the `holes`.
pub fn holey(min: char, max: char, holes: &str) -> Rc<dyn Reader> {
    Rc::new(HoleyReader {
        min,
        max,
        holes: holes.to_string(),
    })
}

struct SetReader {
    ranges: Vec<(char, char)>,
    singles: String,
}

impl Reader for SetReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_match(|c| {
            self.ranges.iter().any(|(min, max)| *min <= c && c <= *max)
                || self.singles.contains(c)
        });
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        let mut groups: Vec<String> = self
            .ranges
            .iter()
            .map(|(min, max)| format!("{}{}", min, max))
            .collect();
        if !self.singles.is_empty() {
            groups.push(self.singles.clone());
        }
        format!("[< {} >]", groups.join(" "))
    }
}

/// Reads one rune in the union of the declared ranges and single runes.
/// The runes in `ranges` are taken pairwise as min/max; an odd number of
/// runes yields an invalid reader.
pub fn set(ranges: &str, singles: &str) -> Rc<dyn Reader> {
    let runes: Vec<char> = ranges.chars().collect();
    if runes.len() % 2 != 0 {
        return invalid_reader(&format!("odd number of range runes in {:?}", ranges));
    }
    let mut pairs = Vec::with_capacity(runes.len() / 2);
    for pair in runes.chunks(2) {
        if pair[0] > pair[1] {
            return invalid_reader(&format!("empty range {}-{} in {:?}", pair[0], pair[1], ranges));
        }
        pairs.push((pair[0], pair[1]));
    }
    Rc::new(SetReader {
        ranges: pairs,
        singles: singles.to_string(),
    })
}

/// Reads one rune in the union of the ranges declared like `"a-zA-Z0-9"`;
/// a malformed spec yields an invalid reader.
pub fn between_any(spec: &str) -> Rc<dyn Reader> {
    let runes: Vec<char> = spec.chars().collect();
    if runes.len() % 3 != 0 {
        return invalid_reader(&format!("malformed between-any spec {:?}", spec));
    }
    let mut ranges = String::new();
    for triple in runes.chunks(3) {
        if triple[1] != '-' {
            return invalid_reader(&format!("malformed between-any spec {:?}", spec));
        }
        ranges.push(triple[0]);
        ranges.push(triple[2]);
    }
    set(&ranges, "")
}

struct MatchReader {
    what: String,
    check: Box<dyn Fn(char) -> bool>,
}

impl Reader for MatchReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_match(&self.check);
        sca.bool_error_for(ok, &self.what)
    }

    fn what(&self) -> String {
        self.what.clone()
    }
}

/// Reads one rune that passes `check`; `what` names the reader.
pub fn match_rune(what: &str, check: impl Fn(char) -> bool + 'static) -> Rc<dyn Reader> {
    Rc::new(MatchReader {
        what: what.to_string(),
        check: Box::new(check),
    })
}

struct DigitReader;

impl Reader for DigitReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_between('0', '9');
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        "[0-9]".to_string()
    }
}

/// Reads one decimal digit.
pub fn digit() -> Rc<dyn Reader> {
    Rc::new(DigitReader)
}

struct HexDigitReader;

impl Reader for HexDigitReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_between('0', '9')
            || sca.if_between('a', 'f')
            || sca.if_between('A', 'F');
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        "[0-9a-fA-F]".to_string()
    }
}

/// Reads one hexadecimal digit.
pub fn hex_digit() -> Rc<dyn Reader> {
    Rc::new(HexDigitReader)
}

struct WsReader;

impl Reader for WsReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_any_rune(" \r\n\t");
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        "WS".to_string()
    }
}

/// Reads one whitespace rune.
pub fn ws() -> Rc<dyn Reader> {
    Rc::new(WsReader)
}

struct NlReader;

impl Reader for NlReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        let ok = sca.if_any(&["\n", "\r\n"]);
        sca.bool_error_for(ok, &self.what())
    }

    fn what(&self) -> String {
        "NL".to_string()
    }
}

/// Reads one newline, LF or CRLF.
pub fn nl() -> Rc<dyn Reader> {
    Rc::new(NlReader)
}

struct InvalidReader {
    msg: String,
}

impl Reader for InvalidReader {
    fn read(&self, sca: &mut Scanner<'_>) -> Result<(), ReadError> {
        Err(sca.error_for(&self.what()))
    }

    fn what(&self) -> String {
        format!("{}{{{}}}", INVALID_READER, self.msg)
    }
}

/// A placeholder for a reader that could not be built; it always fails, and
/// its `what()` carries the [`INVALID_READER`] sentinel so the problem can
/// be detected in a grammar printout.
pub fn invalid_reader(msg: &str) -> Rc<dyn Reader> {
    Rc::new(InvalidReader {
        msg: msg.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[track_caller]
    fn read_ok(r: &Rc<dyn Reader>, inp: &str, tail: &str) {
        let mut sca = Scanner::new(inp);
        assert!(r.read(&mut sca).is_ok(), "{} on {:?}", r.what(), inp);
        assert_eq!(sca.tail(), tail, "{} on {:?}", r.what(), inp);
    }

    #[track_caller]
    fn read_err(r: &Rc<dyn Reader>, inp: &str) {
        let mut sca = Scanner::new(inp);
        assert!(r.read(&mut sca).is_err(), "{} on {:?}", r.what(), inp);
        assert_eq!(sca.tail(), inp, "{} on {:?}", r.what(), inp);
    }

    #[test]
    fn single_rune_readers() {
        read_ok(&rune('a'), "ab", "b");
        read_err(&rune('a'), "ba");
        read_ok(&any_rune(",;"), ";x", "x");
        read_err(&any_rune(",;"), "x;");
        read_ok(&between('0', '9'), "42", "2");
        read_err(&between('0', '9'), "x");
        read_ok(&holey(' ', char::MAX, "\"\\"), "a", "");
        read_err(&holey(' ', char::MAX, "\"\\"), "\"");
        read_ok(&digit(), "7", "");
        read_ok(&hex_digit(), "fx", "x");
        read_err(&hex_digit(), "gx");
        read_ok(&ws(), "\tx", "x");
        read_ok(&nl(), "\r\nx", "x");
        read_ok(&nl(), "\nx", "x");
        read_err(&nl(), "\rx");
        read_ok(&match_rune("upper", |c| c.is_uppercase()), "Ab", "b");
        read_err(&match_rune("upper", |c| c.is_uppercase()), "ab");
    }

    #[test]
    fn string_readers() {
        read_ok(&lit("var"), "var i", " i");
        read_err(&lit("var"), "va");
        read_ok(&fold("select"), "SELECT *", " *");
        read_err(&fold("select"), "selec");
        assert_eq!(lit("var").what(), "\"var\"");
        assert_eq!(fold("var").what(), "~\"var\"");
    }

    #[test]
    fn set_readers() {
        let ident = between_any("a-zA-Z0-9");
        read_ok(&ident, "x1", "1");
        read_ok(&ident, "G", "");
        read_err(&ident, "-");
        assert_eq!(ident.what(), "[< az AZ 09 >]");

        let r = set("az09", "+-._");
        read_ok(&r, "z", "");
        read_ok(&r, ".", "");
        read_err(&r, "Z");
        assert_eq!(r.what(), "[< az 09 +-._ >]");
    }

    #[test]
    fn malformed_set_specs() {
        for bad in [between_any("a-zA-"), between_any("az"), set("azA", "")] {
            read_err(&bad, "a");
            assert!(bad.what().contains(INVALID_READER), "what: {}", bad.what());
        }
    }
}
