//! Structure Parser
//!
//! Recursive descent over the shared scanner. It handles:
//! - The optional `%HUML` version header
//! - Root shape detection: inline dict, multiline dict, empty vectors,
//!   multiline list, inline list, scalar
//! - Multiline dicts and lists, nested through `::`
//! - Inline vectors: `[]`, `{}`, `a: 1, b: 2`, `1, 2, 3`

use crate::error::{Error, Result};
use crate::lexical::{HEADER, SUPPORTED_VERSION};
use crate::scalar::{at_multiline_string, parse_key, parse_value};
use crate::scanner::Scanner;
use crate::value::{Dict, Value};

/// A decoded document together with its header.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Version token from a `%HUML` header line, if one was given.
    pub version: Option<String>,
    /// The root value.
    pub root: Value,
}

/// Shape of the document root, decided by looking ahead from the first
/// content line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootType {
    InlineDict,
    MultilineDict,
    EmptyList,
    EmptyDict,
    MultilineList,
    InlineList,
    Scalar,
}

/// Which multiline collection follows a bare `::`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VectorKind {
    List,
    Dict,
}

/// Separators found on a line outside of quoted strings and comments.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LineShape {
    comma: bool,
    colon: bool,
    double_colon: bool,
}

impl LineShape {
    fn scan(line: &str) -> Self {
        let bytes = line.as_bytes();
        let mut shape = LineShape::default();
        let mut in_string = false;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            if in_string {
                match b {
                    b'\\' => i += 1,
                    b'"' => in_string = false,
                    _ => {}
                }
            } else {
                match b {
                    b'"' => in_string = true,
                    b'#' => break,
                    b',' => shape.comma = true,
                    b':' if bytes.get(i + 1) == Some(&b':') => {
                        shape.double_colon = true;
                        i += 1;
                    }
                    b':' => shape.colon = true,
                    _ => {}
                }
            }
            i += 1;
        }

        shape
    }
}

/// Parse a complete document.
pub fn parse_document(src: &str) -> Result<Document> {
    if src.is_empty() {
        return Err(Error::syntax(1, "empty document is undefined"));
    }

    let mut sc = Scanner::new(src);
    let version = parse_header(&mut sc)?;
    let root = parse_root(&mut sc)?;
    Ok(Document { version, root })
}

/// Consume a `%HUML[ version]` line if the document starts with one.
fn parse_header(sc: &mut Scanner) -> Result<Option<String>> {
    if !sc.peek_str(HEADER) {
        return Ok(None);
    }
    sc.advance(HEADER.len());

    let mut version = None;
    if sc.peek() == Some(b' ') {
        let before_space = sc.mark();
        sc.advance(1);
        let start = sc.pos();
        while !matches!(sc.peek(), None | Some(b' ' | b'\n' | b'#')) {
            sc.advance(1);
        }

        let token = sc.slice(start, sc.pos());
        if token.is_empty() {
            sc.reset(before_space);
        } else if token != SUPPORTED_VERSION {
            return Err(Error::VersionMismatch {
                line: sc.line(),
                found: token.to_string(),
            });
        } else {
            version = Some(token.to_string());
        }
    }

    sc.consume_line()?;
    Ok(version)
}

// ============================================================================
// Root
// ============================================================================

fn parse_root(sc: &mut Scanner) -> Result<Value> {
    sc.skip_blank_lines()?;

    if sc.done() {
        return Err(sc.error("empty document is undefined"));
    }
    if sc.current_indent() != 0 {
        return Err(sc.error("root element must not be indented"));
    }
    if sc.peek_str("::") {
        return Err(sc.error("'::' indicator not allowed at document root"));
    }
    if sc.peek() == Some(b':') {
        return Err(sc.error("':' indicator not allowed at document root"));
    }

    match root_type(sc) {
        RootType::InlineDict => {
            let dict = parse_inline_vector_contents(sc, VectorKind::Dict)?;
            assert_root_end(sc, dict, "root inline dict")
        }
        RootType::MultilineDict => parse_multiline_dict(sc, 0),
        RootType::EmptyList => {
            sc.advance(2);
            sc.consume_line()?;
            assert_root_end(sc, Value::List(Vec::new()), "root list")
        }
        RootType::EmptyDict => {
            sc.advance(2);
            sc.consume_line()?;
            assert_root_end(sc, Value::Dict(Dict::new()), "root dict")
        }
        RootType::MultilineList => parse_multiline_list(sc, 0),
        RootType::InlineList => {
            let list = parse_inline_vector_contents(sc, VectorKind::List)?;
            assert_root_end(sc, list, "root inline list")
        }
        RootType::Scalar => {
            let multiline = at_multiline_string(sc);
            let value = parse_value(sc, 0)?;
            if !multiline {
                sc.consume_line()?;
            }
            assert_root_end(sc, value, "root scalar value")
        }
    }
}

fn root_type(sc: &mut Scanner) -> RootType {
    let shape = LineShape::scan(sc.rest_of_line());

    if is_key_value_pair(sc) {
        let inline = shape.comma
            && shape.colon
            && !shape.double_colon
            && !has_content_lines(sc.after_line());
        return if inline {
            RootType::InlineDict
        } else {
            RootType::MultilineDict
        };
    }
    if sc.peek_str("[]") {
        return RootType::EmptyList;
    }
    if sc.peek_str("{}") {
        return RootType::EmptyDict;
    }
    if sc.peek() == Some(b'-') && matches!(sc.peek_at(1), None | Some(b' ' | b'\n')) {
        return RootType::MultilineList;
    }
    if shape.comma && !shape.colon && !shape.double_colon {
        return RootType::InlineList;
    }
    RootType::Scalar
}

/// Whether any line of `rest` holds something other than whitespace or a
/// comment.
fn has_content_lines(rest: &str) -> bool {
    rest.lines().any(|line| {
        let trimmed = line.trim();
        !trimmed.is_empty() && !trimmed.starts_with('#')
    })
}

/// Probe for `key:` at the cursor without moving it.
fn is_key_value_pair(sc: &mut Scanner) -> bool {
    sc.lookahead(|sc| {
        parse_key(sc)?;
        Ok(sc.peek() == Some(b':'))
    })
    .unwrap_or(false)
}

fn assert_root_end(sc: &mut Scanner, value: Value, description: &str) -> Result<Value> {
    sc.skip_blank_lines()?;
    if !sc.done() {
        return Err(sc.error(format!("unexpected content after {}", description)));
    }
    Ok(value)
}

// ============================================================================
// Multiline Collections
// ============================================================================

fn parse_multiline_dict(sc: &mut Scanner, indent: usize) -> Result<Value> {
    let mut dict = Dict::new();

    loop {
        sc.skip_blank_lines()?;
        if sc.done() || sc.current_indent() < indent {
            break;
        }
        if sc.current_indent() != indent {
            return Err(sc.error(format!(
                "bad indent {}, expected {}",
                sc.current_indent(),
                indent
            )));
        }

        match sc.peek() {
            Some(b) if b == b'"' || b.is_ascii_alphabetic() => {}
            _ => {
                let c = sc.current_char().unwrap_or(' ');
                return Err(sc.error(format!("invalid character '{}', expected key", c)));
            }
        }

        let key = parse_key(sc)?;
        if dict.contains_key(&key) {
            return Err(sc.error(format!("duplicate key '{}' in dict", key)));
        }

        let value = match parse_indicator(sc)? {
            Indicator::Scalar => {
                sc.assert_space("after ':'")?;
                let multiline = at_multiline_string(sc);
                let value = parse_value(sc, indent)?;
                if !multiline {
                    sc.consume_line()?;
                }
                value
            }
            Indicator::Vector => parse_vector(sc, indent + 2)?,
        };
        dict.insert(key, value);
    }

    Ok(Value::Dict(dict))
}

fn parse_multiline_list(sc: &mut Scanner, indent: usize) -> Result<Value> {
    let mut list = Vec::new();

    loop {
        sc.skip_blank_lines()?;
        if sc.done() || sc.current_indent() < indent {
            break;
        }
        if sc.current_indent() != indent {
            return Err(sc.error(format!(
                "bad indent {}, expected {}",
                sc.current_indent(),
                indent
            )));
        }
        if sc.peek() != Some(b'-') {
            break;
        }

        sc.advance(1);
        sc.assert_space("after '-'")?;

        if sc.peek_str("::") {
            sc.advance(2);
            list.push(parse_vector(sc, indent + 2)?);
        } else {
            let multiline = at_multiline_string(sc);
            list.push(parse_value(sc, indent)?);
            if !multiline {
                sc.consume_line()?;
            }
        }
    }

    Ok(Value::List(list))
}

/// Indicator following a dict key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Indicator {
    /// `:` introduces a scalar.
    Scalar,
    /// `::` introduces a vector.
    Vector,
}

fn parse_indicator(sc: &mut Scanner) -> Result<Indicator> {
    if sc.peek() != Some(b':') {
        return Err(sc.error("expected ':' or '::' after key"));
    }
    sc.advance(1);
    if sc.peek() == Some(b':') {
        sc.advance(1);
        return Ok(Indicator::Vector);
    }
    Ok(Indicator::Scalar)
}

// ============================================================================
// Vectors
// ============================================================================

/// Parse whatever follows `::`. A blank remainder of line means a multiline
/// vector whose entries sit at `indent`.
fn parse_vector(sc: &mut Scanner, indent: usize) -> Result<Value> {
    let start = sc.mark();
    sc.skip_spaces();

    if matches!(sc.peek(), None | Some(b'\n' | b'#')) {
        sc.reset(start);
        sc.consume_line()?;
        return match multiline_vector_kind(sc, indent)? {
            VectorKind::List => parse_multiline_list(sc, indent),
            VectorKind::Dict => parse_multiline_dict(sc, indent),
        };
    }

    sc.reset(start);
    sc.assert_space("after '::'")?;
    parse_inline_vector(sc)
}

fn multiline_vector_kind(sc: &mut Scanner, indent: usize) -> Result<VectorKind> {
    sc.skip_blank_lines()?;

    if sc.done() || sc.current_indent() < indent {
        return Err(sc.error("ambiguous empty vector after '::'. Use [] or {}."));
    }
    if sc.current_indent() > indent {
        return Err(sc.error(format!(
            "bad indent {}, expected {}",
            sc.current_indent(),
            indent
        )));
    }

    if sc.peek() == Some(b'-') {
        Ok(VectorKind::List)
    } else {
        Ok(VectorKind::Dict)
    }
}

fn parse_inline_vector(sc: &mut Scanner) -> Result<Value> {
    if sc.peek_str("[]") {
        sc.advance(2);
        sc.consume_line()?;
        return Ok(Value::List(Vec::new()));
    }
    if sc.peek_str("{}") {
        sc.advance(2);
        sc.consume_line()?;
        return Ok(Value::Dict(Dict::new()));
    }

    if LineShape::scan(sc.rest_of_line()).colon {
        parse_inline_vector_contents(sc, VectorKind::Dict)
    } else {
        parse_inline_vector_contents(sc, VectorKind::List)
    }
}

/// Parse `, `-separated entries up to the end of the line, then finish the
/// line.
fn parse_inline_vector_contents(sc: &mut Scanner, kind: VectorKind) -> Result<Value> {
    let mut list = Vec::new();
    let mut dict = Dict::new();
    let mut first = true;

    while !matches!(sc.peek(), None | Some(b'\n' | b'#')) {
        if !first {
            sc.expect_comma()?;
        }
        first = false;

        match kind {
            VectorKind::Dict => {
                let key = parse_key(sc)?;
                if sc.peek() != Some(b':') {
                    return Err(sc.error("expected ':' in inline dict"));
                }
                sc.advance(1);
                sc.assert_space("in inline dict")?;

                if dict.contains_key(&key) {
                    return Err(sc.error(format!("duplicate key '{}' in dict", key)));
                }
                let value = parse_inline_entry(sc)?;
                dict.insert(key, value);
            }
            VectorKind::List => list.push(parse_inline_entry(sc)?),
        }

        if sc.peek() == Some(b' ') {
            let spaces = sc.rest().bytes().take_while(|&b| b == b' ').count();
            if sc.peek_at(spaces) == Some(b',') {
                sc.skip_spaces();
            } else {
                break;
            }
        }
    }

    sc.consume_line()?;
    Ok(match kind {
        VectorKind::List => Value::List(list),
        VectorKind::Dict => Value::Dict(dict),
    })
}

fn parse_inline_entry(sc: &mut Scanner) -> Result<Value> {
    if at_multiline_string(sc) {
        return Err(sc.error("multiline strings are not allowed in inline collections"));
    }
    parse_value(sc, 0)
}
