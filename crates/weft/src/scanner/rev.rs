use super::{eq_fold, Scanner};

/// Rune boundaries of `head` in descending order, starting at its end.
fn rev_boundaries(head: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(head.len()).chain(head.char_indices().rev().map(|(i, _)| i))
}

/// Byte length of the suffix of `head` that folds to `str`, if any.
fn fold_suffix_len(head: &str, str: &str) -> Option<usize> {
    let mut n = 0;
    let mut chars = head.chars();
    for p in str.chars().rev() {
        let c = chars.next_back()?;
        if !eq_fold(c, p) {
            return None;
        }
        n += c.len_utf8();
    }
    Some(n)
}

/// The reverse duals of the forward operations: they inspect the head side
/// of the scanner and move the position backwards.
impl<'a> Scanner<'a> {
    fn rev_to_where(&mut self, check: impl Fn(&str) -> bool) -> bool {
        let full = self.input();
        if let Some(i) = rev_boundaries(self.head()).find(|i| check(&full[..*i])) {
            self.set_pos(i);
            return true;
        }
        false
    }

    fn rev_while_where(&mut self, check: impl Fn(char) -> bool) -> bool {
        let head = self.head();
        let start = head
            .char_indices()
            .rev()
            .take_while(|(_, c)| check(*c))
            .last()
            .map(|(i, _)| i);
        match start {
            Some(i) => {
                self.set_pos(i);
                true
            }
            None => false,
        }
    }

    // ----------------------------------------------------------------- string

    /// Match the exact suffix `str` of the head.
    pub fn rev_if(&mut self, str: &str) -> bool {
        if self.head().ends_with(str) {
            return self.retreat(str.len());
        }
        false
    }

    pub fn rev_if_any(&mut self, strs: &[&str]) -> bool {
        strs.iter().any(|str| self.rev_if(str))
    }

    /// Retreat until the head ends with `str`, without consuming it.
    pub fn rev_to(&mut self, str: &str) -> bool {
        self.rev_to_where(|head| head.ends_with(str))
    }

    // ------------------------------------------------------------------- fold

    pub fn rev_if_fold(&mut self, str: &str) -> bool {
        if let Some(n) = fold_suffix_len(self.head(), str) {
            return self.retreat(n);
        }
        false
    }

    pub fn rev_to_fold(&mut self, str: &str) -> bool {
        self.rev_to_where(|head| fold_suffix_len(head, str).is_some())
    }

    // ------------------------------------------------------------------- rune

    pub fn rev_if_rune(&mut self, r: char) -> bool {
        if self.head().ends_with(r) {
            return self.retreat(r.len_utf8());
        }
        false
    }

    pub fn rev_to_rune(&mut self, r: char) -> bool {
        self.rev_to_where(|head| head.ends_with(r))
    }

    pub fn rev_while_rune(&mut self, r: char) -> bool {
        self.rev_while_where(|c| c == r)
    }

    // --------------------------------------------------------------- anyrune

    pub fn rev_if_any_rune(&mut self, set: &str) -> bool {
        match self.head().chars().next_back() {
            Some(c) if set.contains(c) => self.retreat(c.len_utf8()),
            _ => false,
        }
    }

    pub fn rev_to_any_rune(&mut self, set: &str) -> bool {
        self.rev_to_where(|head| head.chars().next_back().is_some_and(|c| set.contains(c)))
    }

    pub fn rev_while_any_rune(&mut self, set: &str) -> bool {
        self.rev_while_where(|c| set.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[track_caller]
    fn check(sca: &Scanner<'_>, head: &str, tail: &str) {
        assert_eq!(sca.head(), head);
        assert_eq!(sca.tail(), tail);
    }

    #[test]
    fn rev_if_matches_suffix() {
        let mut sca = Scanner::new_rev("select *");
        assert!(sca.rev_if(" *"));
        check(&sca, "select", " *");
        assert!(!sca.rev_if(" *"));
        assert!(sca.rev_if_any(&["insert", "select"]));
        check(&sca, "", "select *");
    }

    #[test]
    fn rev_to_stops_after_match() {
        let mut sca = Scanner::new_rev("select * from events");
        assert!(sca.rev_to("from"));
        check(&sca, "select * from", " events");
        // already just after an occurrence: no motion
        assert!(sca.rev_to("from"));
        check(&sca, "select * from", " events");
        assert!(!sca.rev_to("with"));
        check(&sca, "select * from", " events");
    }

    #[test]
    fn rev_fold_family() {
        let mut sca = Scanner::new_rev("select *");
        assert!(sca.rev_if_fold(" *"));
        assert!(sca.rev_if_fold("SeLeCt"));
        check(&sca, "", "select *");

        for str in ["from", "From", "FROM"] {
            let mut sca = Scanner::new_rev("select * from events");
            assert!(sca.rev_to_fold(str));
            check(&sca, "select * from", " events");
        }
    }

    #[test]
    fn rev_rune_family() {
        let mut sca = Scanner::new_rev("a世z");
        assert!(sca.rev_if_rune('z'));
        check(&sca, "a世", "z");
        assert!(!sca.rev_if_rune('z'));
        assert!(sca.rev_if_rune('世'));
        check(&sca, "a", "世z");

        let mut sca = Scanner::new_rev("i am.");
        assert!(sca.rev_to_rune(' '));
        check(&sca, "i ", "am.");

        let cases = [
            ("123----", '-', true, "123", "----"),
            ("----", '-', true, "", "----"),
            ("123", '-', false, "123", ""),
            ("", '-', false, "", ""),
        ];
        for (inp, r, res, head, tail) in cases {
            let mut sca = Scanner::new_rev(inp);
            assert_eq!(sca.rev_while_rune(r), res, "input {:?}", inp);
            check(&sca, head, tail);
        }
    }

    #[test]
    fn rev_any_rune_family() {
        let mut sca = Scanner::new_rev("12+3");
        assert!(!sca.rev_if_any_rune("+-"));
        assert!(sca.rev_if_any_rune("0123456789"));
        check(&sca, "12+", "3");
        assert!(sca.rev_if_any_rune("+-"));
        check(&sca, "12", "+3");

        let mut sca = Scanner::new_rev("256,0");
        assert!(sca.rev_while_any_rune("1234567890"));
        check(&sca, "256,", "0");
        assert!(sca.rev_if_any_rune(","));
        check(&sca, "256", ",0");
        assert!(sca.rev_while_any_rune("1234567890"));
        check(&sca, "", "256,0");

        let mut sca = Scanner::new_rev("ab12cd");
        assert!(sca.rev_to_any_rune("1234567890"));
        check(&sca, "ab12", "cd");
    }
}
