//! Append-only JSON writer.

use crate::error::{JsonError, JsonErrorKind, Result};
use crate::options::SerializeOptions;
use crate::source::CharSink;
use crate::value::{Number, Value};

#[derive(Debug, Clone, Copy)]
enum Frame {
    Map { first: bool, expecting_key: bool },
    List { first: bool },
}

/// A JSON writer over a [`CharSink`].
///
/// Separators are emitted from an explicit stack of open containers, so
/// callers never write `,` or `:` themselves. Operations that would produce
/// broken JSON fail with [`JsonErrorKind::MalformedStructure`]. A document
/// holds exactly one top-level value.
pub struct Writer<W> {
    sink: W,
    stack: Vec<Frame>,
    wrote_root: bool,
    options: SerializeOptions,
}

impl<W: CharSink> Writer<W> {
    /// Create a writer with default (compact) options.
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, SerializeOptions::default())
    }

    /// Create a writer with the given options.
    pub const fn with_options(sink: W, options: SerializeOptions) -> Self {
        Self {
            sink,
            stack: Vec::new(),
            wrote_root: false,
            options,
        }
    }

    /// Check that one complete value was written and hand back the sink.
    pub fn finish(self) -> Result<W> {
        if let Some(frame) = self.stack.last() {
            return Err(misuse(construct(frame), "the container to be closed", "end of output"));
        }
        if !self.wrote_root {
            return Err(misuse("document", "a value", "nothing"));
        }
        Ok(self.sink)
    }

    /// Current nesting depth (for indentation).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Write a newline and indentation if in pretty mode.
    fn write_indent(&mut self) {
        if self.options.pretty {
            self.sink.write_char('\n');
            for _ in 0..self.stack.len() {
                self.sink.write_str(self.options.indent);
            }
        }
    }

    fn before_value(&mut self, what: &'static str) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::List { first }) => {
                let needs_comma = !*first;
                *first = false;
                if needs_comma {
                    self.sink.write_char(',');
                }
                self.write_indent();
            }
            Some(Frame::Map {
                expecting_key: true,
                ..
            }) => return Err(misuse("map", "a string key", what)),
            Some(Frame::Map { expecting_key, .. }) => *expecting_key = true,
            None if self.wrote_root => return Err(misuse("document", "end of output", what)),
            None => self.wrote_root = true,
        }
        Ok(())
    }

    fn write_escaped(&mut self, s: &str) {
        self.sink.write_char('"');
        for c in s.chars() {
            match c {
                '"' => self.sink.write_str("\\\""),
                '\\' => self.sink.write_str("\\\\"),
                '\n' => self.sink.write_str("\\n"),
                '\r' => self.sink.write_str("\\r"),
                '\t' => self.sink.write_str("\\t"),
                '\u{08}' => self.sink.write_str("\\b"),
                '\u{0C}' => self.sink.write_str("\\f"),
                c if (c as u32) < 0x20 => {
                    const HEX: &[u8; 16] = b"0123456789abcdef";
                    let code = c as u32 as usize;
                    self.sink.write_str("\\u00");
                    self.sink.write_char(char::from(HEX[code >> 4]));
                    self.sink.write_char(char::from(HEX[code & 0xF]));
                }
                c => self.sink.write_char(c),
            }
        }
        self.sink.write_char('"');
    }

    /// Write a map key. The next value written is the entry's value.
    pub fn write_map_key(&mut self, key: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Map {
                first,
                expecting_key,
            }) if *expecting_key => {
                let needs_comma = !*first;
                *first = false;
                *expecting_key = false;
                if needs_comma {
                    self.sink.write_char(',');
                }
            }
            Some(Frame::Map { .. }) => return Err(misuse("map", "a value", "a key")),
            Some(Frame::List { .. }) => return Err(misuse("list", "a value", "a key")),
            None => return Err(misuse("document", "a value", "a key")),
        }
        self.write_indent();
        self.write_escaped(key);
        self.sink.write_char(':');
        if self.options.pretty {
            self.sink.write_char(' ');
        }
        Ok(())
    }

    /// Write a string. Where a map key is expected, this writes the key.
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        if let Some(Frame::Map {
            expecting_key: true,
            ..
        }) = self.stack.last()
        {
            return self.write_map_key(s);
        }
        self.before_value("a string")?;
        self.write_escaped(s);
        Ok(())
    }

    /// Write an integer of any width.
    pub fn write_integer<T: itoa::Integer>(&mut self, v: T) -> Result<()> {
        self.before_value("a number")?;
        self.sink.write_str(itoa::Buffer::new().format(v));
        Ok(())
    }

    /// Write an `f64`. NaN and infinities have no JSON form and are refused.
    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        if !v.is_finite() {
            return Err(JsonError::without_offset(JsonErrorKind::NonFiniteNumber {
                value: v,
            }));
        }
        self.before_value("a number")?;
        self.sink.write_str(ryu::Buffer::new().format_finite(v));
        Ok(())
    }

    /// Write an `f32`. NaN and infinities have no JSON form and are refused.
    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        if !v.is_finite() {
            return Err(JsonError::without_offset(JsonErrorKind::NonFiniteNumber {
                value: f64::from(v),
            }));
        }
        self.before_value("a number")?;
        self.sink.write_str(ryu::Buffer::new().format_finite(v));
        Ok(())
    }

    /// Write `true` or `false`.
    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.before_value("a boolean")?;
        self.sink.write_str(if v { "true" } else { "false" });
        Ok(())
    }

    /// Write `null`.
    pub fn write_null(&mut self) -> Result<()> {
        self.before_value("null")?;
        self.sink.write_str("null");
        Ok(())
    }

    /// Write `{` and enter a map.
    pub fn write_map_start(&mut self) -> Result<()> {
        self.before_value("a map")?;
        self.sink.write_char('{');
        self.stack.push(Frame::Map {
            first: true,
            expecting_key: true,
        });
        trace!(depth = self.stack.len(), "write map start");
        Ok(())
    }

    /// Write `}` and leave the map.
    pub fn write_map_end(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(Frame::Map {
                first,
                expecting_key: true,
            }) => {
                let first = *first;
                self.stack.pop();
                // Only add newline/indent before closing brace if map was non-empty
                if !first {
                    self.write_indent();
                }
                self.sink.write_char('}');
                Ok(())
            }
            Some(Frame::Map { .. }) => Err(misuse("map", "a value", "'}'")),
            Some(Frame::List { .. }) => Err(misuse("list", "']'", "'}'")),
            None => Err(misuse("document", "a value", "'}'")),
        }
    }

    /// Write `[` and enter a list.
    pub fn write_list_start(&mut self) -> Result<()> {
        self.before_value("a list")?;
        self.sink.write_char('[');
        self.stack.push(Frame::List { first: true });
        trace!(depth = self.stack.len(), "write list start");
        Ok(())
    }

    /// Write `]` and leave the list.
    pub fn write_list_end(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(Frame::List { first }) => {
                let first = *first;
                self.stack.pop();
                if !first {
                    self.write_indent();
                }
                self.sink.write_char(']');
                Ok(())
            }
            Some(Frame::Map { .. }) => Err(misuse("map", "'}'", "']'")),
            None => Err(misuse("document", "a value", "']'")),
        }
    }

    /// Write one map entry: the key, then whatever `f` writes as its value.
    pub fn write_map_element<F>(&mut self, key: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.write_map_key(key)?;
        f(self)?;
        match self.stack.last() {
            Some(Frame::Map {
                expecting_key: false,
                ..
            }) => Err(misuse("map", "a value", "nothing")),
            _ => Ok(()),
        }
    }

    /// Write a whole map; `f` writes the entries.
    pub fn write_into_map<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.write_map_start()?;
        f(self)?;
        self.write_map_end()
    }

    /// Write a whole list; `f` writes the elements.
    pub fn write_into_list<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.write_list_start()?;
        f(self)?;
        self.write_list_end()
    }

    /// Write a dynamic [`Value`].
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(v) => self.write_bool(*v),
            Value::Number(Number::I64(v)) => self.write_integer(*v),
            Value::Number(Number::U64(v)) => self.write_integer(*v),
            Value::Number(Number::F64(v)) => self.write_f64(*v),
            Value::String(s) => self.write_string(s),
            Value::List(items) => self.write_into_list(|w| {
                for item in items {
                    w.write_value(item)?;
                }
                Ok(())
            }),
            Value::Map(map) => self.write_into_map(|w| {
                for (key, item) in map {
                    w.write_map_element(key, |w| w.write_value(item))?;
                }
                Ok(())
            }),
        }
    }
}

const fn construct(frame: &Frame) -> &'static str {
    match frame {
        Frame::Map { .. } => "map",
        Frame::List { .. } => "list",
    }
}

fn misuse(construct: &'static str, expected: &'static str, got: &str) -> JsonError {
    JsonError::without_offset(JsonErrorKind::MalformedStructure {
        construct,
        expected,
        got: got.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coda_testhelpers::test;
    use insta::assert_snapshot;

    fn compact(f: impl FnOnce(&mut Writer<String>) -> Result<()>) -> String {
        let mut w = Writer::new(String::new());
        f(&mut w).unwrap();
        w.finish().unwrap()
    }

    #[test]
    fn separators_come_from_the_stack() {
        let out = compact(|w| {
            w.write_into_map(|w| {
                w.write_map_element("a", |w| w.write_integer(1u8))?;
                w.write_map_element("b", |w| {
                    w.write_into_list(|w| {
                        w.write_bool(true)?;
                        w.write_null()?;
                        w.write_f64(1.5)
                    })
                })?;
                w.write_string("c")?;
                w.write_string("d")
            })
        });
        assert_eq!(out, r#"{"a":1,"b":[true,null,1.5],"c":"d"}"#);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(compact(|w| w.write_into_map(|_| Ok(()))), "{}");
        assert_eq!(compact(|w| w.write_into_list(|_| Ok(()))), "[]");
    }

    #[test]
    fn strings_are_escaped() {
        let out = compact(|w| w.write_string("q\"b\\n\n\u{1}\u{1f}é"));
        assert_eq!(out, r#""q\"b\\n\n\u0001\u001fé""#);
    }

    #[test]
    fn non_finite_floats_are_refused() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut w = Writer::new(String::new());
            let err = w.write_f64(v).unwrap_err();
            assert_eq!(err.kind.code(), "json::non_finite_number");
        }
        let mut w = Writer::new(String::new());
        assert!(w.write_f32(f32::NAN).is_err());
        // the refused value does not count as the document
        w.write_f32(0.5).unwrap();
        assert_eq!(w.finish().unwrap(), "0.5");
    }

    #[test]
    fn a_document_is_exactly_one_value() {
        let mut w = Writer::new(String::new());
        w.write_integer(1).unwrap();
        let err = w.write_string("x").unwrap_err();
        assert_snapshot!(
            err.to_string(),
            @"malformed document: expected end of output, got a string"
        );
        assert!(w.write_list_start().is_err());
        assert_eq!(w.finish().unwrap(), "1");

        let mut w = Writer::new(String::new());
        w.write_into_list(|_| Ok(())).unwrap();
        assert!(w.write_null().is_err());

        let err = Writer::new(String::new()).finish().unwrap_err();
        assert_snapshot!(err.to_string(), @"malformed document: expected a value, got nothing");
    }

    #[test]
    fn misuse_is_an_error_not_broken_output() {
        let mut w = Writer::new(String::new());
        w.write_map_start().unwrap();
        let err = w.write_integer(1).unwrap_err();
        assert_snapshot!(err.to_string(), @"malformed map: expected a string key, got a number");
        assert!(w.write_list_end().is_err());

        w.write_map_key("k").unwrap();
        assert!(w.write_map_end().is_err());
        w.write_null().unwrap();
        w.write_map_end().unwrap();
        assert!(w.write_map_end().is_err());

        let mut w = Writer::new(String::new());
        w.write_list_start().unwrap();
        assert!(w.write_map_key("k").is_err());
        assert!(w.finish().is_err());
    }

    #[test]
    fn pretty_printing() {
        let mut w = Writer::with_options(String::new(), SerializeOptions::new().pretty());
        w.write_into_map(|w| {
            w.write_map_element("a", |w| w.write_into_list(|w| w.write_integer(1)))?;
            w.write_map_element("b", |w| w.write_into_map(|_| Ok(())))
        })
        .unwrap();
        assert_snapshot!(w.finish().unwrap(), @r#"
        {
          "a": [
            1
          ],
          "b": {}
        }
        "#);
    }

    #[test]
    fn custom_indent() {
        let mut w = Writer::with_options(String::new(), SerializeOptions::new().indent("\t"));
        w.write_into_list(|w| w.write_into_list(|w| w.write_bool(false))).unwrap();
        assert_eq!(w.finish().unwrap(), "[\n\t[\n\t\tfalse\n\t]\n]");
    }
}
