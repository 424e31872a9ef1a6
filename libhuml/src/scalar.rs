//! Value Parser
//!
//! Parses scalars at the cursor:
//! - Strings: single-line `"..."`, trimmed `"""` blocks, raw ``` blocks
//! - Numbers: decimal, float, `0x`/`0o`/`0b` integers, signed infinity
//! - Keywords: `true`, `false`, `null`, `nan`, `inf`
//! - Empty collection leaves `[]` and `{}`
//!
//! Keys share the string syntax, so `parse_key` lives here too.

use num_bigint::BigInt;

use crate::error::Result;
use crate::lexical;
use crate::scanner::Scanner;
use crate::value::{Dict, Value};

/// How the lines of a multiline string block are cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockStyle {
    /// `"""`: every line is stripped of surrounding whitespace.
    Trimmed,
    /// ```` ``` ````: exactly `key_indent + 2` leading spaces are removed.
    Raw,
}

impl BlockStyle {
    fn delimiter(self) -> &'static str {
        match self {
            BlockStyle::Trimmed => "\"\"\"",
            BlockStyle::Raw => "```",
        }
    }

    fn clean(self, line: &str, key_indent: usize) -> String {
        match self {
            BlockStyle::Trimmed => line.trim().to_string(),
            BlockStyle::Raw => {
                let required = key_indent + 2;
                match line.get(..required) {
                    Some(prefix) if prefix.bytes().all(|b| b == b' ') => {
                        line[required..].to_string()
                    }
                    _ => line.to_string(),
                }
            }
        }
    }
}

/// Whether the cursor sits on the opening delimiter of a multiline string.
pub fn at_multiline_string(sc: &Scanner) -> bool {
    sc.peek_str(BlockStyle::Trimmed.delimiter()) || sc.peek_str(BlockStyle::Raw.delimiter())
}

/// Parse one value at the cursor. `key_indent` is the indentation of the line
/// owning the value; multiline strings align their closing delimiter to it.
pub fn parse_value(sc: &mut Scanner, key_indent: usize) -> Result<Value> {
    let Some(first) = sc.peek() else {
        return Err(sc.error("unexpected end of input, expected a value"));
    };

    if sc.peek_str("[]") {
        sc.advance(2);
        return Ok(Value::List(Vec::new()));
    }
    if sc.peek_str("{}") {
        sc.advance(2);
        return Ok(Value::Dict(Dict::new()));
    }

    if first == b'"' {
        if sc.peek_str(BlockStyle::Trimmed.delimiter()) {
            return parse_multiline_string(sc, key_indent, BlockStyle::Trimmed)
                .map(Value::String);
        }
        return parse_string(sc).map(Value::String);
    }
    if sc.peek_str(BlockStyle::Raw.delimiter()) {
        return parse_multiline_string(sc, key_indent, BlockStyle::Raw).map(Value::String);
    }

    if let Some((len, value)) = lexical::special_literal(sc.rest()) {
        sc.advance(len);
        return Ok(value);
    }

    match first {
        b'+' | b'-' => {
            if sc.peek_str_at(1, "inf") {
                sc.advance(4);
                let inf = if first == b'-' {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                };
                return Ok(Value::Float(inf));
            }
            if matches!(sc.peek_at(1), Some(b'0'..=b'9')) {
                return parse_number(sc);
            }
            Err(sc.error(format!("invalid character after '{}'", first as char)))
        }
        b'0'..=b'9' => parse_number(sc),
        _ => {
            let c = sc.current_char().unwrap_or(first as char);
            Err(sc.error(format!("unexpected character '{}' when parsing value", c)))
        }
    }
}

/// Parse a dict key: a quoted string or a run of `[A-Za-z0-9_-]`.
pub fn parse_key(sc: &mut Scanner) -> Result<String> {
    sc.skip_spaces();
    if sc.peek() == Some(b'"') {
        return parse_string(sc);
    }

    let start = sc.pos();
    while sc.peek().is_some_and(lexical::is_key_char) {
        sc.advance(1);
    }
    if sc.pos() == start {
        return Err(sc.error("expected a key"));
    }
    Ok(sc.slice(start, sc.pos()).to_string())
}

/// Parse a single-line double-quoted string, cursor on the opening quote.
pub fn parse_string(sc: &mut Scanner) -> Result<String> {
    sc.advance(1);

    let mut result = String::new();
    while let Some(c) = sc.current_char() {
        match c {
            '"' => {
                sc.advance(1);
                return Ok(result);
            }
            '\n' => return Err(sc.error("newlines not allowed in single-line strings")),
            '\\' => {
                sc.advance(1);
                let Some(escape) = sc.current_char() else {
                    return Err(sc.error("incomplete escape sequence"));
                };
                match lexical::unescape(escape) {
                    Some(unescaped) => result.push(unescaped),
                    None => {
                        return Err(sc.error(format!("invalid escape character '\\{}'", escape)))
                    }
                }
                sc.advance(escape.len_utf8());
            }
            c => {
                result.push(c);
                sc.advance(c.len_utf8());
            }
        }
    }

    Err(sc.error("unclosed string"))
}

/// Parse a `"""` or ``` block. Consumes through the closing delimiter's line.
fn parse_multiline_string(
    sc: &mut Scanner,
    key_indent: usize,
    style: BlockStyle,
) -> Result<String> {
    let delimiter = style.delimiter();
    sc.advance(delimiter.len());
    sc.consume_line()?;

    let mut lines = Vec::new();
    while !sc.done() {
        let line_start = sc.mark();
        sc.skip_spaces();
        let line_indent = sc.column();

        if sc.peek_str(delimiter) {
            if line_indent != key_indent {
                return Err(sc.error(format!(
                    "multiline closing delimiter must be at same indentation as the key ({} spaces)",
                    key_indent
                )));
            }
            sc.advance(delimiter.len());
            sc.consume_line()?;
            return Ok(lines.join("\n"));
        }

        sc.reset(line_start);
        let content = sc.consume_line_content();
        lines.push(style.clean(content, key_indent));
    }

    Err(sc.error("unclosed multiline string"))
}

/// Parse a numeric literal, cursor on the sign or first digit.
pub fn parse_number(sc: &mut Scanner) -> Result<Value> {
    let start = sc.pos();
    let negative = sc.peek() == Some(b'-');
    if matches!(sc.peek(), Some(b'+' | b'-')) {
        sc.advance(1);
    }

    for (prefix, radix) in lexical::NUMBER_BASES {
        if sc.peek_str(prefix) {
            sc.advance(prefix.len());
            return parse_radix_digits(sc, radix, negative);
        }
    }

    let mut float = false;
    while let Some(b) = sc.peek() {
        match b {
            b'0'..=b'9' | b'_' => sc.advance(1),
            b'.' => {
                float = true;
                sc.advance(1);
            }
            b'e' | b'E' => {
                float = true;
                sc.advance(1);
                if matches!(sc.peek(), Some(b'+' | b'-')) {
                    sc.advance(1);
                }
            }
            _ => break,
        }
    }

    let literal = sc.slice(start, sc.pos()).replace('_', "");
    let invalid = || sc.error(format!("invalid number literal '{}'", literal));

    if float {
        if !lexical::is_float_literal(&literal) {
            return Err(invalid());
        }
        return literal
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid());
    }

    let digits = literal.trim_start_matches(['+', '-']);
    let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
    Ok(Value::Integer(if negative { -magnitude } else { magnitude }))
}

/// Digits after a `0x`/`0o`/`0b` prefix. The sign is applied to the
/// magnitude afterwards.
fn parse_radix_digits(sc: &mut Scanner, radix: u32, negative: bool) -> Result<Value> {
    let start = sc.pos();
    while sc.peek().is_some_and(|b| lexical::is_radix_digit(b, radix)) {
        sc.advance(1);
    }
    if sc.pos() == start {
        return Err(sc.error("invalid number literal, requires digits after prefix"));
    }

    let digits = sc.slice(start, sc.pos());
    let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| sc.error(format!("invalid number literal '{}'", digits)))?;
    Ok(Value::Integer(if negative { -magnitude } else { magnitude }))
}
