//! Tagged scalar/string/reference cell with conversions.
//!
//! [`Variant`] is the eight-kinded scalar subset of [`crate::DynamicData`]:
//! it never holds Array or Object content. It is cheap to construct, cheap
//! to clone (cloning duplicates owned `String` storage), and total for
//! every conversion except the handful documented on each method.

use crate::error::{ConversionError, Error, Result};
use std::fmt;

/// Discriminant for the active content of a [`Variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    Double,
    Pointer,
    String,
}

impl Kind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::Pointer => "pointer",
            Kind::String => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell holding exactly one of eight scalar kinds.
///
/// Default-constructed as `Null`. Assignment (`From`/the setters on
/// [`crate::DynamicData`]) always replaces the active kind wholesale —
/// there is no notion of a stale payload left behind from a prior kind.
#[derive(Debug, Clone)]
pub enum Variant {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f32),
    Double(f64),
    Pointer(usize),
    String(String),
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Null
    }
}

impl PartialEq for Variant {
    /// Equality only ever holds across identical kinds; cross-kind
    /// comparisons are `false`, never an implicit coercion.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Variant::Null, Variant::Null) => true,
            (Variant::Bool(a), Variant::Bool(b)) => a == b,
            (Variant::Int(a), Variant::Int(b)) => a == b,
            (Variant::Uint(a), Variant::Uint(b)) => a == b,
            (Variant::Float(a), Variant::Float(b)) => a == b,
            (Variant::Double(a), Variant::Double(b)) => a == b,
            (Variant::Pointer(a), Variant::Pointer(b)) => a == b,
            (Variant::String(a), Variant::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Variant {
    /// Returns the discriminant of the active content.
    pub fn kind(&self) -> Kind {
        match self {
            Variant::Null => Kind::Null,
            Variant::Bool(_) => Kind::Bool,
            Variant::Int(_) => Kind::Int,
            Variant::Uint(_) => Kind::Uint,
            Variant::Float(_) => Kind::Float,
            Variant::Double(_) => Kind::Double,
            Variant::Pointer(_) => Kind::Pointer,
            Variant::String(_) => Kind::String,
        }
    }

    /// `Null -> false`; numeric kinds are non-zero (floats use an epsilon
    /// comparison); `Pointer` is non-null; `String` follows the
    /// `"true"/"1"` / `"false"/"0"/"null"` / non-empty rule. Total.
    pub fn as_bool(&self) -> bool {
        match self {
            Variant::Null => false,
            Variant::Bool(b) => *b,
            Variant::Int(i) => *i != 0,
            Variant::Uint(u) => *u != 0,
            Variant::Float(f) => f.abs() > 1e-3,
            Variant::Double(d) => d.abs() > 1e-4,
            Variant::Pointer(p) => *p != 0,
            Variant::String(s) => match s.as_str() {
                "true" | "1" => true,
                "false" | "0" | "null" => false,
                _ => !s.is_empty(),
            },
        }
    }

    /// Signed 64-bit conversion. Fails only on `Null`.
    pub fn as_int(&self) -> Result<i64> {
        match self {
            Variant::Null => Err(Error::Conversion(ConversionError {
                from: "null",
                to: "int",
            })),
            Variant::Bool(b) => Ok(*b as i64),
            Variant::Int(i) => Ok(*i),
            Variant::Uint(u) => Ok(*u as i64),
            Variant::Float(f) => Ok(*f as i64),
            Variant::Double(d) => Ok(*d as i64),
            Variant::Pointer(p) => Ok(*p as i64),
            Variant::String(s) => Ok(parse_leading_int(s)),
        }
    }

    /// `f64` conversion. Fails only on `Null`.
    pub fn as_double(&self) -> Result<f64> {
        match self {
            Variant::Null => Err(Error::Conversion(ConversionError {
                from: "null",
                to: "double",
            })),
            Variant::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Variant::Int(i) => Ok(*i as f64),
            Variant::Uint(u) => Ok(*u as f64),
            Variant::Float(f) => Ok(*f as f64),
            Variant::Double(d) => Ok(*d),
            Variant::Pointer(p) => Ok(*p as f64),
            Variant::String(s) => Ok(parse_leading_double(s)),
        }
    }

    /// Every kind is totalizable to a `String`. Numbers use the shortest
    /// representation that round-trips at their precision.
    pub fn as_string(&self) -> String {
        match self {
            Variant::Null => "null".to_string(),
            Variant::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Variant::Int(i) => i.to_string(),
            Variant::Uint(u) => u.to_string(),
            Variant::Float(f) => format_f32(*f),
            Variant::Double(d) => format_f64(*d),
            Variant::Pointer(p) => format!("0x{:x}", p),
            Variant::String(s) => s.clone(),
        }
    }

    /// Only `Null` (maps to `0`) and `Pointer` succeed.
    pub fn as_pointer(&self) -> Result<usize> {
        match self {
            Variant::Null => Ok(0),
            Variant::Pointer(p) => Ok(*p),
            other => Err(Error::Conversion(ConversionError {
                from: other.kind().as_str(),
                to: "pointer",
            })),
        }
    }
}

/// Shortest decimal that round-trips through `f32::from_str`.
fn format_f32(value: f32) -> String {
    if value == value.trunc() && value.abs() < 1e9 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Shortest decimal that round-trips through `f64::from_str`.
fn format_f64(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// `strtol`-style best-effort parse of the longest valid leading integer
/// literal (optional sign, then digits). Returns `0` rather than panicking
/// if nothing matches.
fn parse_leading_int(s: &str) -> i64 {
    let trimmed = s.trim_start();
    let mut end = 0;
    let bytes = trimmed.as_bytes();
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }
    trimmed[..end].parse().unwrap_or(0)
}

/// `strtod`-style best-effort parse of the longest valid leading float
/// literal. Returns `0.0` if nothing matches.
fn parse_leading_double(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut saw_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        saw_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            saw_digit = true;
        }
    }
    if !saw_digit {
        return 0.0;
    }
    let mantissa_end = end;
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        } else {
            end = mantissa_end;
        }
    }
    trimmed[..end].parse().unwrap_or(0.0)
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}
impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Variant::Int(v)
    }
}
impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Variant::Int(v as i64)
    }
}
impl From<u64> for Variant {
    fn from(v: u64) -> Self {
        Variant::Uint(v)
    }
}
impl From<u32> for Variant {
    fn from(v: u32) -> Self {
        Variant::Uint(v as u64)
    }
}
impl From<f32> for Variant {
    fn from(v: f32) -> Self {
        Variant::Float(v)
    }
}
impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Double(v)
    }
}
impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::String(v)
    }
}
impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_null() {
        assert_eq!(Variant::default().kind(), Kind::Null);
    }

    #[test]
    fn as_bool_follows_epsilon_and_string_rules() {
        assert!(!Variant::Null.as_bool());
        assert!(Variant::Double(0.001).as_bool());
        assert!(!Variant::Float(0.0001).as_bool());
        assert!(Variant::from("1").as_bool());
        assert!(!Variant::from("false").as_bool());
        assert!(Variant::from("anything").as_bool());
        assert!(!Variant::from("").as_bool());
    }

    #[test]
    fn as_int_fails_only_on_null() {
        assert!(Variant::Null.as_int().is_err());
        assert_eq!(Variant::Bool(true).as_int().unwrap(), 1);
        assert_eq!(Variant::Double(3.9).as_int().unwrap(), 3);
        assert_eq!(Variant::from("42abc").as_int().unwrap(), 42);
        assert_eq!(Variant::from("notanumber").as_int().unwrap(), 0);
    }

    #[test]
    fn as_pointer_only_null_and_pointer() {
        assert_eq!(Variant::Null.as_pointer().unwrap(), 0);
        assert_eq!(Variant::Pointer(42).as_pointer().unwrap(), 42);
        assert!(Variant::Int(1).as_pointer().is_err());
    }

    #[test]
    fn as_string_is_total() {
        assert_eq!(Variant::Null.as_string(), "null");
        assert_eq!(Variant::Bool(true).as_string(), "true");
        assert_eq!(Variant::Uint(7).as_string(), "7");
        assert_eq!(Variant::Double(1.42).as_string(), "1.42");
    }

    #[test]
    fn cross_kind_equality_is_false() {
        assert_ne!(Variant::Int(0), Variant::Uint(0));
        assert_ne!(Variant::Int(1), Variant::Bool(true));
    }
}
