//! Encode values as canonical HUML text.
//!
//! Output is deterministic: dict keys are sorted, non-empty collections are
//! always written in block form, and empty ones inline as `[]` / `{}`.

use serde::Serialize;

use crate::error::Result;
use crate::lexical::{self, HEADER, SUPPORTED_VERSION};
use crate::options::EncodeOptions;
use crate::ser::to_value;
use crate::value::{Dict, Value};

const FENCE: &str = "```";

/// Encode a value tree as a HUML document. The output ends with a newline.
pub fn stringify(value: &Value, options: &EncodeOptions) -> String {
    let mut encoder = Encoder::default();
    if options.include_version {
        encoder.lines.push(format!("{} {}", HEADER, SUPPORTED_VERSION));
        encoder.lines.push(String::new());
    }

    match value {
        Value::List(items) if !items.is_empty() => encoder.write_list(items, 0),
        Value::Dict(dict) if !dict.is_empty() => encoder.write_dict(dict, 0),
        _ => {
            encoder.lines.push(String::new());
            encoder.write_inline(value, 0);
        }
    }

    encoder.lines.push(String::new());
    encoder.lines.join("\n")
}

/// Encode any serializable value as a HUML document.
pub fn encode<T>(value: &T, options: &EncodeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(stringify(&to_value(value)?, options))
}

/// Line buffer. Inline writes append to the last line; block writes push
/// new lines.
#[derive(Default)]
struct Encoder {
    lines: Vec<String>,
}

impl Encoder {
    fn current(&mut self) -> &mut String {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    fn push_line(&mut self, indent: usize, text: &str) {
        self.lines.push(format!("{}{}", " ".repeat(indent), text));
    }

    /// Write a value that fits after `key: ` or `- `. `indent` is the
    /// indentation of the owning line, which multiline strings need.
    fn write_inline(&mut self, value: &Value, indent: usize) {
        let text = match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => return self.write_string(s, indent),
            Value::List(_) => "[]".to_string(),
            Value::Dict(_) => "{}".to_string(),
        };
        self.current().push_str(&text);
    }

    /// Write the lines of a non-empty collection at `indent`.
    fn write_block(&mut self, value: &Value, indent: usize) {
        match value {
            Value::List(items) => self.write_list(items, indent),
            Value::Dict(dict) => self.write_dict(dict, indent),
            _ => self.write_inline(value, indent),
        }
    }

    fn write_list(&mut self, items: &[Value], indent: usize) {
        for item in items {
            if is_block(item) {
                self.push_line(indent, "- ::");
                self.write_block(item, indent + 2);
            } else {
                self.push_line(indent, "- ");
                self.write_inline(item, indent);
            }
        }
    }

    fn write_dict(&mut self, dict: &Dict, indent: usize) {
        let mut entries: Vec<(&String, &Value)> = dict.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (key, value) in entries {
            let key = encode_key(key);
            if is_block(value) {
                self.push_line(indent, &format!("{}::", key));
                self.write_block(value, indent + 2);
            } else {
                self.push_line(indent, &format!("{}: ", key));
                self.write_inline(value, indent);
            }
        }
    }

    fn write_string(&mut self, s: &str, indent: usize) {
        if !s.contains('\n') || !fits_raw_block(s) {
            let quoted = quote(s);
            self.current().push_str(&quoted);
            return;
        }

        self.current().push_str(FENCE);
        let mut lines: Vec<&str> = s.split('\n').collect();
        if lines.last() == Some(&"") {
            lines.pop();
        }
        for line in lines {
            if line.is_empty() {
                self.lines.push(String::new());
            } else {
                self.push_line(indent + 2, line);
            }
        }
        self.push_line(indent, FENCE);
    }
}

/// Non-empty lists and dicts are written as indented blocks.
fn is_block(value: &Value) -> bool {
    match value {
        Value::List(items) => !items.is_empty(),
        Value::Dict(dict) => !dict.is_empty(),
        _ => false,
    }
}

/// A raw block cannot hold a line that would read as its closing fence.
fn fits_raw_block(s: &str) -> bool {
    s.split('\n')
        .all(|line| !line.trim_start_matches(' ').starts_with(FENCE))
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else {
        format!("{:?}", f)
    }
}

fn encode_key(key: &str) -> String {
    if lexical::is_bare_key(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match lexical::escape(c) {
            Some(escaped) => result.push_str(escaped),
            None => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn huml(value: &Value) -> String {
        stringify(value, &EncodeOptions::new())
    }

    fn dict(entries: Vec<(&str, Value)>) -> Value {
        entries.into_iter().collect()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(huml(&Value::Null), "null\n");
        assert_eq!(huml(&Value::from(true)), "true\n");
        assert_eq!(huml(&Value::from(-42i64)), "-42\n");
        assert_eq!(huml(&Value::Float(1.0)), "1.0\n");
        assert_eq!(huml(&Value::Float(0.1)), "0.1\n");
        assert_eq!(huml(&Value::Float(1e21)), "1e21\n");
        assert_eq!(huml(&Value::Float(f64::NAN)), "nan\n");
        assert_eq!(huml(&Value::Float(f64::INFINITY)), "inf\n");
        assert_eq!(huml(&Value::Float(f64::NEG_INFINITY)), "-inf\n");
        assert_eq!(huml(&Value::List(Vec::new())), "[]\n");
        assert_eq!(huml(&Value::Dict(Dict::new())), "{}\n");
    }

    #[test]
    fn test_version_header() {
        let options = EncodeOptions::new().with_version(true);
        assert_eq!(
            stringify(&dict(vec![("a", Value::from(1i64))]), &options),
            "%HUML v0.1.0\n\na: 1\n"
        );
    }

    #[test]
    fn test_string_quoting() {
        assert_eq!(huml(&Value::from("")), "\"\"\n");
        assert_eq!(
            huml(&Value::from("say \"hi\"\t\\ a/b")),
            "\"say \\\"hi\\\"\\t\\\\ a/b\"\n"
        );
        assert_eq!(huml(&Value::from("\r\x0c\x0b")), "\"\\r\\f\\v\"\n");
    }

    #[test]
    fn test_multiline_string_blocks() {
        assert_eq!(huml(&Value::from("a\n  b")), "```\n  a\n    b\n```\n");
        assert_eq!(huml(&Value::from("a\n\nb\n")), "```\n  a\n\n  b\n```\n");

        let v = dict(vec![("text", Value::from("x\ny"))]);
        assert_eq!(huml(&v), "text: ```\n  x\n  y\n```\n");

        let v = dict(vec![(
            "outer",
            dict(vec![("text", Value::from("x\ny"))]),
        )]);
        assert_eq!(huml(&v), "outer::\n  text: ```\n    x\n    y\n  ```\n");

        let v = Value::List(vec![Value::from("x\ny")]);
        assert_eq!(huml(&v), "- ```\n  x\n  y\n```\n");
    }

    #[test]
    fn test_fence_inside_string_falls_back_to_quotes() {
        let v = Value::from("code:\n```\nend");
        assert_eq!(huml(&v), "\"code:\\n```\\nend\"\n");
    }

    #[test]
    fn test_dicts_sorted_and_nested() {
        let v = dict(vec![
            ("zeta", Value::from(1i64)),
            ("alpha", Value::List(vec![Value::from(1i64), Value::from(2i64)])),
            ("empty", Value::List(Vec::new())),
            ("none", Value::Dict(Dict::new())),
            ("with space", Value::Null),
            ("9lives", Value::from(true)),
        ]);
        let expected = "\
\"9lives\": true
alpha::
  - 1
  - 2
empty: []
none: {}
\"with space\": null
zeta: 1
";
        assert_eq!(huml(&v), expected);
    }

    #[test]
    fn test_lists_of_collections() {
        let v = Value::List(vec![
            Value::List(vec![Value::from(1i64)]),
            dict(vec![("k", Value::from("v"))]),
            Value::List(Vec::new()),
            Value::Dict(Dict::new()),
        ]);
        assert_eq!(huml(&v), "- ::\n  - 1\n- ::\n  k: \"v\"\n- []\n- {}\n");
    }

    #[test]
    fn test_output_decodes_to_same_tree() {
        let v = dict(vec![
            ("name", Value::from("huml")),
            ("ratio", Value::Float(0.5)),
            ("big", Value::from(i64::MAX)),
            ("lines", Value::from("one\n  two\nthree")),
            (
                "nested",
                Value::List(vec![
                    dict(vec![("deep", Value::from("a\nb"))]),
                    Value::List(vec![Value::from("c\nd"), Value::Null]),
                ]),
            ),
            ("quote key", Value::from("with \"quotes\"")),
        ]);
        let text = huml(&v);
        let decoded = parse_document(&text).unwrap().root;
        assert_eq!(decoded, v);
        assert_eq!(huml(&decoded), text);
    }
}
