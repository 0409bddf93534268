use super::Scanner;

impl<'a> Scanner<'a> {
    /// First rune of the tail, if any.
    pub(crate) fn peek(&self) -> Option<char> {
        self.tail().chars().next()
    }

    fn if_first(&mut self, check: impl Fn(char) -> bool) -> bool {
        match self.peek() {
            Some(c) if check(c) => self.advance(c.len_utf8()),
            _ => false,
        }
    }

    fn to_first(&mut self, check: impl Fn(char) -> bool) -> bool {
        if let Some((i, _)) = self.tail().char_indices().find(|(_, c)| check(*c)) {
            return self.advance(i);
        }
        false
    }

    fn while_first(&mut self, check: impl Fn(char) -> bool) -> bool {
        let tail = self.tail();
        let end = tail
            .char_indices()
            .find(|(_, c)| !check(*c))
            .map_or(tail.len(), |(i, _)| i);
        if end == 0 {
            return false;
        }
        self.advance(end)
    }

    // ------------------------------------------------------------------- rune

    /// Match exactly the rune `r`.
    pub fn if_rune(&mut self, r: char) -> bool {
        self.if_first(|c| c == r)
    }

    /// Advance to the next occurrence of `r` without consuming it.
    pub fn to_rune(&mut self, r: char) -> bool {
        self.to_first(|c| c == r)
    }

    /// Advance over leading occurrences of `r`; fails without progress.
    pub fn while_rune(&mut self, r: char) -> bool {
        self.while_first(|c| c == r)
    }

    // --------------------------------------------------------------- anyrune

    /// Match one rune that is present in `set`.
    pub fn if_any_rune(&mut self, set: &str) -> bool {
        self.if_first(|c| set.contains(c))
    }

    pub fn to_any_rune(&mut self, set: &str) -> bool {
        self.to_first(|c| set.contains(c))
    }

    pub fn while_any_rune(&mut self, set: &str) -> bool {
        self.while_first(|c| set.contains(c))
    }

    // --------------------------------------------------------------- between

    /// Match one rune in the inclusive range `[min, max]`.
    pub fn if_between(&mut self, min: char, max: char) -> bool {
        self.if_first(|c| in_range(min, c, max))
    }

    pub fn to_between(&mut self, min: char, max: char) -> bool {
        self.to_first(|c| in_range(min, c, max))
    }

    pub fn while_between(&mut self, min: char, max: char) -> bool {
        self.while_first(|c| in_range(min, c, max))
    }

    // ----------------------------------------------------------------- match

    /// Match one rune that passes `check`.
    pub fn if_match(&mut self, check: impl Fn(char) -> bool) -> bool {
        self.if_first(check)
    }

    pub fn to_match(&mut self, check: impl Fn(char) -> bool) -> bool {
        self.to_first(check)
    }

    pub fn while_match(&mut self, check: impl Fn(char) -> bool) -> bool {
        self.while_first(check)
    }
}

pub(crate) fn in_range(min: char, val: char, max: char) -> bool {
    min <= val && val <= max
}
