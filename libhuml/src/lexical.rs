//! Lexical tables and character classes shared by the decoder and encoder.

use crate::value::Value;

/// The only version token accepted in a `%HUML` header.
pub const SUPPORTED_VERSION: &str = "v0.1.0";

/// Document header marker.
pub const HEADER: &str = "%HUML";

/// Integer base prefixes, tried in order after an optional sign.
pub const NUMBER_BASES: [(&str, u32); 3] = [("0x", 16), ("0o", 8), ("0b", 2)];

/// Keyword literals, matched by prefix in this order.
const SPECIAL_LITERALS: [&str; 5] = ["true", "false", "null", "nan", "inf"];

/// Match a keyword literal at the start of `rest`.
/// Returns the literal's length and value.
pub fn special_literal(rest: &str) -> Option<(usize, Value)> {
    let lit = SPECIAL_LITERALS.iter().find(|lit| rest.starts_with(**lit))?;
    let value = match *lit {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "nan" => Value::Float(f64::NAN),
        "inf" => Value::Float(f64::INFINITY),
        _ => Value::Null,
    };
    Some((lit.len(), value))
}

/// Map the character after a backslash to the character it stands for.
pub fn unescape(c: char) -> Option<char> {
    match c {
        '"' => Some('"'),
        '\\' => Some('\\'),
        '/' => Some('/'),
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'f' => Some('\x0c'),
        'v' => Some('\x0b'),
        _ => None,
    }
}

/// Inverse of [`unescape`] for the characters the encoder escapes.
/// `/` is left bare.
pub fn escape(c: char) -> Option<&'static str> {
    match c {
        '"' => Some("\\\""),
        '\\' => Some("\\\\"),
        '\n' => Some("\\n"),
        '\t' => Some("\\t"),
        '\r' => Some("\\r"),
        '\x0c' => Some("\\f"),
        '\x0b' => Some("\\v"),
        _ => None,
    }
}

/// Characters allowed in a bare key.
pub fn is_key_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Whether `b` is a valid digit in the given base.
pub fn is_radix_digit(b: u8, radix: u32) -> bool {
    match radix {
        16 => b.is_ascii_hexdigit(),
        8 => (b'0'..=b'7').contains(&b),
        2 => b == b'0' || b == b'1',
        _ => b.is_ascii_digit(),
    }
}

/// Whether `key` can be written without quotes: `[A-Za-z][A-Za-z0-9_-]*`.
pub fn is_bare_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() => bytes[1..].iter().all(|&b| is_key_char(b)),
        _ => false,
    }
}

/// Check a decimal float literal with underscores already removed:
/// `[+-]? digits ('.' digits)? ([eE] [+-]? digits)?` with at least a
/// fraction or an exponent.
pub fn is_float_literal(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(e) => (&s[..e], Some(&s[e + 1..])),
        None => (s, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    if let Some(exp) = exponent {
        let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if !all_digits(exp) {
            return false;
        }
    }

    match mantissa.split_once('.') {
        Some((int, frac)) => all_digits(int) && all_digits(frac),
        None => exponent.is_some() && all_digits(mantissa),
    }
}
