//! Strict RFC 8259 JSON decoder.
//!
//! A hand-written recursive-descent parser: no lookahead beyond a single
//! byte, no backtracking. Numbers are tokenized through an explicit state
//! machine rather than `str::parse`, so every rejection (a bare `-`, a
//! leading zero followed by more digits, a dangling exponent sign) matches
//! the grammar exactly instead of whatever the underlying float parser
//! happens to tolerate.

use crate::dynamic::DynamicData;
use crate::error::{Error, Result};
use tracing::{instrument, trace};

/// Parses a complete JSON document into a [`DynamicData`] tree.
///
/// The entire input must be consumed: trailing non-whitespace after the
/// top-level value is a `Parse` error.
#[instrument(level = "debug", skip(input), fields(len = input.len()))]
pub fn decode(input: &str) -> Result<DynamicData> {
    let bytes = input.as_bytes();
    let mut cursor = Cursor { bytes, pos: 0 };
    cursor.skip_whitespace();
    let value = cursor.parse_value()?;
    cursor.skip_whitespace();
    if cursor.pos != bytes.len() {
        return Err(Error::parse(cursor.pos, "trailing characters after document"));
    }
    trace!(kind = ?value.kind(), "decoded document");
    Ok(value)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        match self.advance() {
            Some(b) if b == expected => Ok(()),
            Some(b) => Err(Error::parse(
                self.pos - 1,
                format!("expected '{}', found '{}'", expected as char, b as char),
            )),
            None => Err(Error::parse(self.pos, format!("expected '{}', found end of input", expected as char))),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn parse_value(&mut self) -> Result<DynamicData> {
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Ok(DynamicData::from(self.parse_string()?)),
            Some(b't') => self.parse_literal("true", DynamicData::from(true)),
            Some(b'f') => self.parse_literal("false", DynamicData::from(false)),
            Some(b'n') => self.parse_literal("null", DynamicData::default()),
            Some(b'-') | Some(b'0'..=b'9') => self.parse_number(),
            Some(b) => Err(Error::parse(self.pos, format!("unexpected character '{}'", b as char))),
            None => Err(Error::parse(self.pos, "unexpected end of input")),
        }
    }

    fn parse_literal(&mut self, text: &str, value: DynamicData) -> Result<DynamicData> {
        let end = self.pos + text.len();
        if end <= self.bytes.len() && &self.bytes[self.pos..end] == text.as_bytes() {
            self.pos = end;
            Ok(value)
        } else {
            Err(Error::parse(self.pos, format!("expected literal '{text}'")))
        }
    }

    fn parse_object(&mut self) -> Result<DynamicData> {
        self.expect(b'{')?;
        let mut data = DynamicData::object();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(data);
        }
        let mut element_required = true;
        loop {
            self.skip_whitespace();
            if !element_required {
                if self.peek() == Some(b'}') {
                    self.pos += 1;
                    break;
                }
            }
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(Error::parse(self.pos, "expected string key"));
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            data.add_member(key, value).expect("freshly promoted object");
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    element_required = true;
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(b) => return Err(Error::parse(self.pos, format!("expected ',' or '}}', found '{}'", b as char))),
                None => return Err(Error::parse(self.pos, "unexpected end of input in object")),
            }
        }
        Ok(data)
    }

    fn parse_array(&mut self) -> Result<DynamicData> {
        self.expect(b'[')?;
        let mut data = DynamicData::array();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(data);
        }
        let mut element_required = true;
        loop {
            self.skip_whitespace();
            if !element_required && self.peek() == Some(b']') {
                self.pos += 1;
                break;
            }
            self.skip_whitespace();
            let value = self.parse_value()?;
            data.add(value).expect("freshly promoted array");
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    element_required = true;
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b) => return Err(Error::parse(self.pos, format!("expected ',' or ']', found '{}'", b as char))),
                None => return Err(Error::parse(self.pos, "unexpected end of input in array")),
            }
        }
        Ok(data)
    }

    fn parse_string(&mut self) -> Result<String> {
        self.expect(b'"')?;
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Err(Error::format(self.pos, "unterminated string")),
                Some(b'"') => break,
                Some(b'\\') => self.parse_escape(&mut out)?,
                Some(b) if b < 0x20 => {
                    return Err(Error::format(self.pos - 1, "control character in string"));
                }
                Some(b) if b < 0x80 => out.push(b as char),
                Some(b) => {
                    // multi-byte UTF-8 lead byte: copy the full sequence through.
                    let extra = if b >= 0xF0 {
                        3
                    } else if b >= 0xE0 {
                        2
                    } else {
                        1
                    };
                    let start = self.pos - 1;
                    let end = start + 1 + extra;
                    if end > self.bytes.len() {
                        return Err(Error::format(start, "truncated UTF-8 sequence"));
                    }
                    let slice = &self.bytes[start..end];
                    let s = std::str::from_utf8(slice)
                        .map_err(|_| Error::format(start, "invalid UTF-8 sequence"))?;
                    out.push_str(s);
                    self.pos = end;
                }
            }
        }
        Ok(out)
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<()> {
        match self.advance() {
            Some(b'"') => out.push('"'),
            Some(b'\\') => out.push('\\'),
            Some(b'/') => out.push('/'),
            Some(b'b') => out.push('\u{0008}'),
            Some(b'f') => out.push('\u{000C}'),
            Some(b'n') => out.push('\n'),
            Some(b'r') => out.push('\r'),
            Some(b't') => out.push('\t'),
            Some(b'u') => {
                let code = self.parse_hex4()?;
                // Independent decode: a lone high surrogate is re-encoded as
                // the UTF-8 replacement form rather than joined with a
                // following low surrogate. See DESIGN.md for the rationale.
                match char::from_u32(code) {
                    Some(c) => out.push(c),
                    None => out.push('\u{FFFD}'),
                }
            }
            Some(b) => return Err(Error::format(self.pos - 1, format!("invalid escape '\\{}'", b as char))),
            None => return Err(Error::format(self.pos, "unterminated escape")),
        }
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        if self.pos + 4 > self.bytes.len() {
            return Err(Error::format(self.pos, "truncated \\u escape"));
        }
        let slice = &self.bytes[self.pos..self.pos + 4];
        let s = std::str::from_utf8(slice).map_err(|_| Error::format(self.pos, "invalid \\u escape"))?;
        let code = u32::from_str_radix(s, 16).map_err(|_| Error::format(self.pos, "invalid \\u escape"))?;
        self.pos += 4;
        Ok(code)
    }

    /// Numeric grammar FSM per RFC 8259 `number`:
    ///   int     = "-"? ("0" | [1-9] DIGIT*)
    ///   frac    = "." DIGIT+
    ///   exp     = ("e"|"E") ("+"|"-")? DIGIT+
    /// States mirror the ten-state decision table of the original grammar
    /// walker: sign, leading digit, remaining int digits, '.', frac digits,
    /// exponent marker, exponent sign, exponent digits, done.
    fn parse_number(&mut self) -> Result<DynamicData> {
        let start = self.pos;
        let mut is_float = false;
        let mut negative = false;

        if self.peek() == Some(b'-') {
            negative = true;
            self.pos += 1;
        }

        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
            }
            Some(b'1'..=b'9') => {
                self.pos += 1;
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            }
            _ => return Err(Error::number(start, "expected digit after sign")),
        }

        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            let frac_start = self.pos;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
            if self.pos == frac_start {
                return Err(Error::number(self.pos, "expected digit after decimal point"));
            }
        }

        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
            if self.pos == exp_start {
                return Err(Error::number(self.pos, "expected digit in exponent"));
            }
        }

        // A number token must be followed by whitespace, a structural
        // delimiter, or end-of-input — anything else (e.g. a second '.' as
        // in "1.23456.7") means the token itself is malformed, not merely
        // followed by garbage.
        match self.peek() {
            None | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b',') | Some(b']') | Some(b'}') => {}
            Some(b) => {
                return Err(Error::number(
                    self.pos,
                    format!("unexpected character '{}' in number", b as char),
                ))
            }
        }

        let text = std::str::from_utf8(&self.bytes[start..self.pos]).expect("ASCII number slice");

        if is_float {
            let value: f64 = text.parse().map_err(|_| Error::number(start, "malformed float literal"))?;
            Ok(DynamicData::from(value))
        } else if negative {
            let value: i64 = text.parse().map_err(|_| Error::number(start, "integer literal out of range"))?;
            Ok(DynamicData::from(value))
        } else {
            let value: u64 = text.parse().map_err(|_| Error::number(start, "integer literal out of range"))?;
            Ok(DynamicData::from(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scalars() {
        assert!(decode("null").unwrap().is_null());
        assert!(decode("true").unwrap().as_bool().unwrap());
        assert!(!decode("false").unwrap().as_bool().unwrap());
        assert_eq!(decode("42").unwrap().as_int().unwrap(), 42);
        assert_eq!(decode("-7").unwrap().as_int().unwrap(), -7);
        assert_eq!(decode("3.25").unwrap().as_double().unwrap(), 3.25);
        assert_eq!(decode("1e3").unwrap().as_double().unwrap(), 1000.0);
        assert_eq!(decode("\"hi\"").unwrap().as_string().unwrap(), "hi");
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(decode("-").is_err());
        assert!(decode("01").is_err());
        assert!(decode("1.").is_err());
        assert!(decode(".1").is_err());
        assert!(decode("1e").is_err());
        assert!(decode("1e+").is_err());
    }

    #[test]
    fn decodes_nested_structures_preserving_order() {
        let doc = decode(r#"{"b": 1, "a": [1, 2, 3], "c": {"x": true}}"#).unwrap();
        assert_eq!(doc.member_names().unwrap(), vec!["b", "a", "c"]);
        assert_eq!(doc["a"].count(), 3);
        assert_eq!(doc["a"][1].as_int().unwrap(), 2);
        assert!(doc["c"]["x"].as_bool().unwrap());
    }

    #[test]
    fn rejects_trailing_commas() {
        assert!(decode(r#"[1, 2,]"#).is_err());
        assert!(decode(r#"{"a": 1,}"#).is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(decode("123 abc").is_err());
    }

    #[test]
    fn decodes_string_escapes() {
        let doc = decode(r#""a\tb\nc\"d\\e""#).unwrap();
        assert_eq!(doc.as_string().unwrap(), "a\tb\nc\"d\\e");
    }

    #[test]
    fn decodes_unicode_escape_independently() {
        let doc = decode(r#""é""#).unwrap();
        assert_eq!(doc.as_string().unwrap(), "\u{00e9}");

        // Lone surrogate: decoded independently, not joined with a sibling.
        let lone = decode(r#""\ud800""#).unwrap();
        assert_eq!(lone.as_string().unwrap(), "\u{FFFD}");
    }

    #[test]
    fn decodes_literal_multibyte_utf8() {
        let doc = decode("\"caf\u{00e9}\"").unwrap();
        assert_eq!(doc.as_string().unwrap(), "caf\u{00e9}");
    }

    #[test]
    fn empty_object_and_array() {
        let obj = decode("{}").unwrap();
        assert_eq!(obj.count(), 0);
        assert!(obj.is_object());
        let arr = decode("[]").unwrap();
        assert_eq!(arr.count(), 0);
        assert!(arr.is_array());
    }

    #[test]
    fn duplicate_keys_keep_last_value_at_first_position() {
        let doc = decode(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        assert_eq!(doc.member_names().unwrap(), vec!["a", "b"]);
        assert_eq!(doc["a"].as_int().unwrap(), 3);
    }
}
