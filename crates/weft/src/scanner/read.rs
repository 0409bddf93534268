use super::Scanner;
use crate::error::ReadError;

fn int_bounds(bit_size: u32) -> Option<(i64, i64)> {
    match bit_size {
        8 => Some((i8::MIN as i64, i8::MAX as i64)),
        16 => Some((i16::MIN as i64, i16::MAX as i64)),
        32 => Some((i32::MIN as i64, i32::MAX as i64)),
        64 => Some((i64::MIN, i64::MAX)),
        _ => None,
    }
}

fn uint_bound(bit_size: u32) -> Option<u64> {
    match bit_size {
        8 => Some(u8::MAX as u64),
        16 => Some(u16::MAX as u64),
        32 => Some(u32::MAX as u64),
        64 => Some(u64::MAX),
        _ => None,
    }
}

fn valid_base(base: u32) -> bool {
    matches!(base, 8 | 10 | 16)
}

impl<'a> Scanner<'a> {
    /// Read one rune.
    pub fn read_rune(&mut self) -> Result<char, ReadError> {
        match self.peek() {
            Some(c) => {
                self.advance(c.len_utf8());
                Ok(c)
            }
            None => Err(self.error_for("rune")),
        }
    }

    /// Read one rune from the head side, moving backwards.
    pub fn rev_read_rune(&mut self) -> Result<char, ReadError> {
        match self.head().chars().next_back() {
            Some(c) => {
                self.retreat(c.len_utf8());
                Ok(c)
            }
            None => Err(self.error_for("rune")),
        }
    }

    /// Read a bool value. Valid format values are
    /// - `"l"` for `true` and `false`
    /// - `"U"` for `TRUE` and `FALSE`
    /// - `"Cc"` for `True` and `False`
    /// - `"*"` or `""` for all of the above
    pub fn read_bool(&mut self, format: &str) -> Result<bool, ReadError> {
        let (trues, falses): (&[&str], &[&str]) = match format {
            "" | "*" => (&["true", "True", "TRUE"], &["false", "False", "FALSE"]),
            "l" => (&["true"], &["false"]),
            "U" => (&["TRUE"], &["FALSE"]),
            "Cc" => (&["True"], &["False"]),
            _ => return Err(self.error_for("bool format")),
        };
        if self.if_any(trues) {
            Ok(true)
        } else if self.if_any(falses) {
            Ok(false)
        } else {
            Err(self.error_for("bool"))
        }
    }

    /// Read a signed integer value with an optional leading sign.
    ///
    /// Valid `base` values are 8, 10 and 16; valid `bit_size` values are 8,
    /// 16, 32 and 64. The read is greedy but stops before the first digit
    /// that would overflow the signed range; at least one digit is required.
    pub fn read_int(&mut self, base: u32, bit_size: u32) -> Result<i64, ReadError> {
        if !valid_base(base) {
            return Err(self.error_for("integer base"));
        }
        let Some((min, max)) = int_bounds(bit_size) else {
            return Err(self.error_for("integer size"));
        };

        let marker = self.mark();
        let neg = if self.if_rune('-') {
            true
        } else {
            self.if_rune('+');
            false
        };

        let mut val: i64 = 0;
        let mut end = None;
        for (i, r) in self.tail().char_indices() {
            let Some(v) = r.to_digit(base) else { break };
            let next = val
                .checked_mul(base as i64)
                .and_then(|x| {
                    if neg {
                        x.checked_sub(v as i64)
                    } else {
                        x.checked_add(v as i64)
                    }
                })
                .filter(|x| min <= *x && *x <= max);
            match next {
                Some(x) => val = x,
                None => break,
            }
            end = Some(i + r.len_utf8());
        }
        match end {
            Some(n) => {
                self.advance(n);
                Ok(val)
            }
            None => {
                self.to_marker(marker);
                Err(self.error_for("integer"))
            }
        }
    }

    /// Read an unsigned integer value; same base, size and overflow-stop
    /// rules as [`read_int`][Scanner::read_int], without a sign.
    pub fn read_uint(&mut self, base: u32, bit_size: u32) -> Result<u64, ReadError> {
        if !valid_base(base) {
            return Err(self.error_for("unsigned integer base"));
        }
        let Some(max) = uint_bound(bit_size) else {
            return Err(self.error_for("unsigned integer size"));
        };

        let mut val: u64 = 0;
        let mut end = None;
        for (i, r) in self.tail().char_indices() {
            let Some(v) = r.to_digit(base) else { break };
            let next = val
                .checked_mul(base as u64)
                .and_then(|x| x.checked_add(v as u64))
                .filter(|x| *x <= max);
            match next {
                Some(x) => val = x,
                None => break,
            }
            end = Some(i + r.len_utf8());
        }
        match end {
            Some(n) => {
                self.advance(n);
                Ok(val)
            }
            None => Err(self.error_for("unsigned integer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn read_rune_decodes() {
        let mut sca = Scanner::new("世z");
        assert_eq!(sca.read_rune(), Ok('世'));
        assert_eq!(sca.read_rune(), Ok('z'));
        assert!(sca.read_rune().is_err());

        let mut sca = Scanner::new_rev("a世");
        assert_eq!(sca.rev_read_rune(), Ok('世'));
        assert_eq!(sca.rev_read_rune(), Ok('a'));
        assert!(sca.rev_read_rune().is_err());
    }

    #[test]
    fn read_bool_formats() {
        let cases = [
            ("true rest", "", Some(true), " rest"),
            ("FALSE rest", "*", Some(false), " rest"),
            ("TRUE rest", "*", Some(true), " rest"),
            ("True rest", "Cc", Some(true), " rest"),
            ("TRUE rest", "l", None, "TRUE rest"),
            ("yes", "*", None, "yes"),
        ];
        for (inp, format, exp, tail) in cases {
            let mut sca = Scanner::new(inp);
            assert_eq!(sca.read_bool(format).ok(), exp, "input {:?}", inp);
            assert_eq!(sca.tail(), tail, "input {:?}", inp);
        }

        let mut sca = Scanner::new("true");
        assert!(sca.read_bool("yY").is_err());
    }

    #[test]
    fn read_int_values() {
        let cases: &[(&str, u32, u32, i64, &str)] = &[
            // 8 bit
            ("22", 10, 8, 22, ""),
            ("1c", 16, 8, 28, ""),
            ("0", 16, 8, 0, ""),
            ("-70", 8, 8, -56, ""),
            ("-128", 10, 8, -128, ""),
            ("127", 10, 8, 127, ""),
            ("-2345", 10, 8, -23, "45"),
            ("128", 10, 8, 12, "8"),
            ("-0046", 10, 8, -46, ""),
            ("32-blocks", 10, 8, 32, "-blocks"),
            // 16 bit
            ("18", 10, 16, 18, ""),
            ("30df", 16, 16, 12511, ""),
            ("-4E3", 16, 16, -1251, ""),
            ("7561", 8, 16, 3953, ""),
            ("-32768", 10, 16, i16::MIN as i64, ""),
            ("32767", 10, 16, i16::MAX as i64, ""),
            ("32768", 10, 16, 3276, "8"),
            ("345wxyz", 10, 16, 345, "wxyz"),
            // 32 bit
            ("-2147483648", 10, 32, i32::MIN as i64, ""),
            ("2147483647", 10, 32, i32::MAX as i64, ""),
            ("-2147483649", 10, 32, -214748364, "9"),
            // 64 bit
            ("42", 10, 64, 42, ""),
            ("aBcD", 16, 64, 43981, ""),
            ("-4a3F", 16, 64, -19007, ""),
            ("-9223372036854775808", 10, 64, i64::MIN, ""),
            ("9223372036854775807", 10, 64, i64::MAX, ""),
            ("9223372036854775808", 10, 64, 922337203685477580, "8"),
            ("777 oth", 10, 64, 777, " oth"),
        ];
        for (inp, base, bit_size, exp, tail) in cases {
            let mut sca = Scanner::new(inp);
            assert_eq!(sca.read_int(*base, *bit_size), Ok(*exp), "input {:?}", inp);
            assert_eq!(sca.tail(), *tail, "input {:?}", inp);
        }
    }

    #[test]
    fn read_int_failures() {
        let mut sca = Scanner::new("-abcd");
        assert!(sca.read_int(10, 64).is_err());
        assert_eq!(sca.tail(), "-abcd");

        let mut sca = Scanner::new("123");
        assert!(sca.read_int(7, 64).is_err());
        assert!(sca.read_int(10, 24).is_err());
        assert_eq!(sca.tail(), "123");
    }

    #[test]
    fn read_uint_values() {
        let cases: &[(&str, u32, u32, u64, &str)] = &[
            ("18", 10, 8, 18, ""),
            ("1c", 16, 8, 28, ""),
            ("F0", 16, 8, 240, ""),
            ("70", 8, 8, 56, ""),
            ("0", 10, 8, 0, ""),
            ("255", 10, 8, 255, ""),
            ("2345", 10, 8, 234, "5"),
            ("256", 10, 8, 25, "6"),
            ("00460", 10, 8, 46, "0"),
            ("65535", 10, 16, 65535, ""),
            ("65536", 10, 16, 6553, "6"),
            ("4294967295", 10, 32, u32::MAX as u64, ""),
            ("4294967296", 10, 32, 429496729, "6"),
            ("30df", 16, 64, 12511, ""),
            ("7561", 8, 64, 3953, ""),
            ("18446744073709551615,0", 10, 64, u64::MAX, ",0"),
            ("1170343number", 10, 64, 1170343, "number"),
        ];
        for (inp, base, bit_size, exp, tail) in cases {
            let mut sca = Scanner::new(inp);
            assert_eq!(sca.read_uint(*base, *bit_size), Ok(*exp), "input {:?}", inp);
            assert_eq!(sca.tail(), *tail, "input {:?}", inp);
        }

        let mut sca = Scanner::new("-12");
        assert!(sca.read_uint(10, 64).is_err());
        assert_eq!(sca.tail(), "-12");
    }
}
