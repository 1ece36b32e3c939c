//! JSON encoder with optional pretty-printing and forced UCS-2 escaping.

use crate::dynamic::{DynamicData, Kind};
use crate::error::{Error, Result, TypeError};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Knobs controlling [`encode`]'s output layout.
///
/// Mirrors the small `*Config` structs elsewhere in this ecosystem:
/// `#[serde(default)]` fields plus a `Default` impl, so a host application
/// can fold this into its own configuration file and still get sane values
/// for anything it doesn't set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Emit newlines and indentation instead of the minimal compact form.
    pub pretty_print: bool,
    /// Number of spaces per indentation level when `pretty_print` is set.
    pub indent_width: usize,
    /// Escape every non-ASCII code point as `\uXXXX` (UTF-16 surrogate
    /// pairs for anything above U+FFFF) instead of emitting raw UTF-8.
    pub force_ucs2: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent_width: 4,
            force_ucs2: false,
        }
    }
}

impl EncodeOptions {
    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            ..Self::default()
        }
    }

    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    pub fn with_force_ucs2(mut self, force_ucs2: bool) -> Self {
        self.force_ucs2 = force_ucs2;
        self
    }
}

/// Serializes `data` to a JSON string per `options`.
///
/// `Pointer` values have no JSON representation and are rejected with a
/// `TypeError` rather than silently coerced to a number or string.
#[instrument(level = "debug", skip(data, options))]
pub fn encode(data: &DynamicData, options: &EncodeOptions) -> Result<String> {
    let mut out = String::new();
    write_value(data, options, 0, &mut out)?;
    Ok(out)
}

fn write_value(data: &DynamicData, options: &EncodeOptions, depth: usize, out: &mut String) -> Result<()> {
    match data.kind() {
        Kind::Null => out.push_str("null"),
        Kind::Bool => out.push_str(if data.as_bool()? { "true" } else { "false" }),
        Kind::Int => out.push_str(&data.as_int()?.to_string()),
        Kind::Uint => {
            // Round-tripped through as_string to reuse Variant's i64 path
            // would lose precision above i64::MAX; format directly instead.
            out.push_str(&data.as_string()?);
        }
        Kind::Float | Kind::Double => out.push_str(&data.as_string()?),
        Kind::String => write_string(&data.as_string()?, options, out),
        Kind::Pointer => {
            return Err(Error::Type(TypeError {
                kind: "pointer",
                operation: "encode",
            }))
        }
        Kind::Array => write_array(data, options, depth, out)?,
        Kind::Object => write_object(data, options, depth, out)?,
    }
    Ok(())
}

fn write_array(data: &DynamicData, options: &EncodeOptions, depth: usize, out: &mut String) -> Result<()> {
    let items = data.items()?;
    if items.is_empty() {
        out.push_str("[]");
        return Ok(());
    }
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline_indent(options, depth + 1, out);
        write_value(item, options, depth + 1, out)?;
    }
    newline_indent(options, depth, out);
    out.push(']');
    Ok(())
}

fn write_object(data: &DynamicData, options: &EncodeOptions, depth: usize, out: &mut String) -> Result<()> {
    let mut members = data.members()?.peekable();
    if members.peek().is_none() {
        out.push_str("{}");
        return Ok(());
    }
    out.push('{');
    let mut first = true;
    for (key, value) in members {
        if !first {
            out.push(',');
        }
        first = false;
        newline_indent(options, depth + 1, out);
        write_string(key, options, out);
        out.push(':');
        if options.pretty_print {
            out.push(' ');
        }
        write_value(value, options, depth + 1, out)?;
    }
    newline_indent(options, depth, out);
    out.push('}');
    Ok(())
}

fn newline_indent(options: &EncodeOptions, depth: usize, out: &mut String) {
    if options.pretty_print {
        out.push('\n');
        for _ in 0..depth * options.indent_width {
            out.push(' ');
        }
    }
}

fn write_string(s: &str, options: &EncodeOptions, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c if options.force_ucs2 && (c as u32) > 0x7F => {
                push_ucs2_escape(c, out);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Emits `c` as one `\uXXXX` escape, or a surrogate pair for code points
/// above the Basic Multilingual Plane (U+FFFF).
fn push_ucs2_escape(c: char, out: &mut String) {
    let code = c as u32;
    if code <= 0xFFFF {
        out.push_str(&format!("\\u{:04x}", code));
    } else {
        let v = code - 0x10000;
        let high = 0xD800 + (v >> 10);
        let low = 0xDC00 + (v & 0x3FF);
        out.push_str(&format!("\\u{:04x}\\u{:04x}", high, low));
    }
}
