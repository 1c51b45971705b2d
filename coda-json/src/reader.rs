//! Pull-based JSON reader with one character of lookahead.
//!
//! The reader tracks where it is inside maps and lists with an explicit frame
//! stack, so separators are consumed on behalf of the caller and a value read
//! in the wrong place fails instead of silently desynchronizing.

use core::str::FromStr;

use indexmap::IndexMap;

use crate::character::{
    Character, is_control, is_digit, is_value_boundary, is_whitespace, parse_hex_digit,
};
use crate::error::{JsonError, JsonErrorKind, Result, describe};
use crate::number::NumberLiteral;
use crate::options::DeserializeOptions;
use crate::source::CharSource;
use crate::value::Value;

/// What the next token is, without consuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    MapStart,
    /// `}`
    MapEnd,
    /// `[`
    ListStart,
    /// `]`
    ListEnd,
    /// A string literal
    String,
    /// A number literal
    Number,
    /// `true` or `false`
    Boolean,
    /// `null`
    Null,
    /// End of input
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapState {
    /// Just after `{`
    KeyOrEnd,
    /// An entry was opened; its key comes next
    Key,
    /// The key is being read; `:` follows it
    Colon,
    /// The value comes next
    Value,
    /// A full entry was read
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    /// Just after `[`
    ValueOrEnd,
    /// An element was opened
    Value,
    /// A full element was read
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Map(MapState),
    List(ListState),
}

/// A streaming JSON reader over a [`CharSource`].
pub struct Reader<S> {
    source: S,
    peeked: Character,
    offset: usize,
    frames: Vec<Frame>,
    max_depth: usize,
}

impl<S: CharSource> Reader<S> {
    /// Create a reader with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, &DeserializeOptions::default())
    }

    /// Create a reader with the given options.
    pub fn with_options(mut source: S, options: &DeserializeOptions) -> Self {
        let peeked = source.next();
        Self {
            source,
            peeked,
            offset: 0,
            frames: Vec::new(),
            max_depth: options.max_depth,
        }
    }

    /// Offset of the next unread character, counted in characters.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// How many maps and lists are currently open.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    // ------------------------------------------------------------------
    // cursor
    // ------------------------------------------------------------------

    fn bump(&mut self) -> Character {
        let current = self.peeked;
        if current.is_some() {
            self.peeked = self.source.next();
            self.offset += 1;
        }
        current
    }

    fn skip_whitespace(&mut self) {
        while is_whitespace(self.peeked) {
            self.bump();
        }
    }

    fn error(&self, kind: JsonErrorKind) -> JsonError {
        JsonError::new(kind, self.offset)
    }

    fn locate(err: JsonError, offset: usize) -> JsonError {
        JsonError {
            offset: err.offset.or(Some(offset)),
            ..err
        }
    }

    fn unexpected(&self, expected: &'static str) -> JsonError {
        self.error(JsonErrorKind::UnexpectedToken {
            got: describe(self.peeked),
            expected,
        })
    }

    fn malformed(&self, construct: &'static str, expected: &'static str) -> JsonError {
        self.error(JsonErrorKind::MalformedStructure {
            construct,
            expected,
            got: describe(self.peeked),
        })
    }

    // ------------------------------------------------------------------
    // structural bookkeeping
    // ------------------------------------------------------------------

    /// Account for a value about to be read in the current container.
    fn begin_value(&mut self) -> Result<()> {
        let Some(frame) = self.frames.last().copied() else {
            return Ok(());
        };
        let next = match frame {
            Frame::Map(MapState::Key) => {
                self.skip_whitespace();
                if self.peeked != Some('"') {
                    return Err(self.malformed("map", "a string key"));
                }
                Frame::Map(MapState::Colon)
            }
            Frame::Map(MapState::Value) => Frame::Map(MapState::CommaOrEnd),
            Frame::List(ListState::Value) => Frame::List(ListState::CommaOrEnd),
            Frame::Map(_) => return Err(self.malformed("map", "',' or '}'")),
            Frame::List(_) => return Err(self.malformed("list", "',' or ']'")),
        };
        self.set_top(next);
        Ok(())
    }

    /// After a complete value: if it was a map key, consume the `:`.
    fn end_value(&mut self) -> Result<()> {
        if let Some(Frame::Map(MapState::Colon)) = self.frames.last() {
            self.skip_whitespace();
            if self.peeked != Some(':') {
                return Err(self.malformed("map", "':'"));
            }
            self.bump();
            self.set_top(Frame::Map(MapState::Value));
        }
        Ok(())
    }

    fn push_frame(&mut self, frame: Frame) -> Result<()> {
        if self.frames.len() >= self.max_depth {
            return Err(self.error(JsonErrorKind::MalformedStructure {
                construct: "document",
                expected: "nesting within the depth limit",
                got: format!("depth {}", self.frames.len() + 1),
            }));
        }
        self.frames.push(frame);
        Ok(())
    }

    // ------------------------------------------------------------------
    // scalars
    // ------------------------------------------------------------------

    /// Classify the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<TokenKind> {
        self.skip_whitespace();
        Ok(match self.peeked {
            Some('{') => TokenKind::MapStart,
            Some('}') => TokenKind::MapEnd,
            Some('[') => TokenKind::ListStart,
            Some(']') => TokenKind::ListEnd,
            Some('"') => TokenKind::String,
            Some('-') => TokenKind::Number,
            c if is_digit(c) => TokenKind::Number,
            Some('t' | 'f') => TokenKind::Boolean,
            Some('n') => TokenKind::Null,
            None => TokenKind::End,
            Some(_) => return Err(self.unexpected("a value")),
        })
    }

    /// Whether the next character could end a scalar value.
    pub const fn is_at_value_boundary(&self) -> bool {
        is_value_boundary(self.peeked)
    }

    /// Read a string literal, decoding escapes.
    pub fn read_string(&mut self) -> Result<String> {
        self.begin_value()?;
        let s = self.scan_string(true)?;
        self.end_value()?;
        Ok(s)
    }

    /// Scan a string literal, keeping its content only if asked to.
    fn scan_string(&mut self, keep: bool) -> Result<String> {
        self.skip_whitespace();
        if self.peeked != Some('"') {
            return Err(self.unexpected("a string"));
        }
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.malformed_string(out, "unterminated string")),
                Some('"') => break,
                Some('\\') => {
                    let c = self.read_escape(&out)?;
                    if keep {
                        out.push(c);
                    }
                }
                c @ Some(ch) => {
                    if is_control(c) {
                        return Err(self.malformed_string(out, "unescaped control character"));
                    }
                    if keep {
                        out.push(ch);
                    }
                }
            }
        }
        Ok(out)
    }

    fn malformed_string(&self, raw: String, reason: &'static str) -> JsonError {
        self.error(JsonErrorKind::MalformedString { raw, reason })
    }

    fn read_escape(&mut self, raw: &str) -> Result<char> {
        let c = match self.bump() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{08}',
            Some('f') => '\u{0c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => return self.read_unicode_escape(raw),
            None => return Err(self.malformed_string(raw.into(), "unterminated string")),
            Some(_) => return Err(self.malformed_string(raw.into(), "invalid escape")),
        };
        Ok(c)
    }

    fn read_hex4(&mut self, raw: &str) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = parse_hex_digit(self.peeked)
                .map_err(|_| self.malformed_string(raw.into(), "invalid \\u escape"))?;
            self.bump();
            code = (code << 4) | u32::from(digit);
        }
        Ok(code)
    }

    fn read_unicode_escape(&mut self, raw: &str) -> Result<char> {
        let first = self.read_hex4(raw)?;
        let code = match first {
            0xD800..=0xDBFF => {
                if self.bump() != Some('\\') || self.bump() != Some('u') {
                    return Err(self.malformed_string(raw.into(), "lone surrogate"));
                }
                let second = self.read_hex4(raw)?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(self.malformed_string(raw.into(), "lone surrogate"));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(self.malformed_string(raw.into(), "lone surrogate"));
            }
            code => code,
        };
        char::from_u32(code).ok_or_else(|| self.malformed_string(raw.into(), "invalid \\u escape"))
    }

    /// Read a number literal, validating it against the JSON grammar.
    pub fn read_number(&mut self) -> Result<NumberLiteral> {
        self.begin_value()?;
        self.skip_whitespace();
        if !(self.peeked == Some('-') || is_digit(self.peeked)) {
            return Err(self.unexpected("a number"));
        }

        let mut text = String::new();
        if self.peeked == Some('-') {
            self.take(&mut text);
        }

        match self.peeked {
            Some('0') => {
                self.take(&mut text);
                if is_digit(self.peeked) {
                    return Err(self.malformed_number(text));
                }
            }
            c if is_digit(c) => self.take_digits(&mut text),
            _ => return Err(self.malformed_number(text)),
        }

        if self.peeked == Some('.') {
            self.take(&mut text);
            if !is_digit(self.peeked) {
                return Err(self.malformed_number(text));
            }
            self.take_digits(&mut text);
        }

        if let Some('e' | 'E') = self.peeked {
            self.take(&mut text);
            if let Some('+' | '-') = self.peeked {
                self.take(&mut text);
            }
            if !is_digit(self.peeked) {
                return Err(self.malformed_number(text));
            }
            self.take_digits(&mut text);
        }

        if !is_value_boundary(self.peeked) {
            return Err(self.malformed_number(text));
        }

        self.end_value()?;
        Ok(NumberLiteral::new(text))
    }

    fn take(&mut self, text: &mut String) {
        if let Some(c) = self.bump() {
            text.push(c);
        }
    }

    fn take_digits(&mut self, text: &mut String) {
        while is_digit(self.peeked) {
            self.take(text);
        }
    }

    fn malformed_number(&self, mut raw: String) -> JsonError {
        if let Some(c) = self.peeked {
            raw.push(c);
        }
        self.error(JsonErrorKind::MalformedNumber { raw })
    }

    /// Read a number and interpret it as an integer type.
    pub fn read_integer<T: FromStr>(&mut self) -> Result<T> {
        let start = self.offset;
        self.read_number()?
            .to_integer::<T>()
            .map_err(|e| Self::locate(e, start))
    }

    /// Read a number as an `i64`.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_integer()
    }

    /// Read a number as an `f64`.
    pub fn read_f64(&mut self) -> Result<f64> {
        let start = self.offset;
        self.read_number()?
            .to_f64()
            .map_err(|e| Self::locate(e, start))
    }

    /// Read a number as an `f32`.
    pub fn read_f32(&mut self) -> Result<f32> {
        let start = self.offset;
        self.read_number()?
            .to_f32()
            .map_err(|e| Self::locate(e, start))
    }

    fn expect_keyword(&mut self, keyword: &'static str) -> Result<()> {
        let mut got = String::new();
        for expected in keyword.chars() {
            if self.peeked != Some(expected) {
                if let Some(c) = self.peeked {
                    got.push(c);
                }
                return Err(self.error(JsonErrorKind::UnexpectedToken {
                    got: format!("`{got}`"),
                    expected: keyword,
                }));
            }
            self.take(&mut got);
        }
        if !is_value_boundary(self.peeked) {
            return Err(self.error(JsonErrorKind::UnexpectedToken {
                got: format!("`{got}{}`", self.peeked.unwrap_or_default()),
                expected: keyword,
            }));
        }
        Ok(())
    }

    /// Read `true` or `false`.
    pub fn read_boolean(&mut self) -> Result<bool> {
        self.begin_value()?;
        self.skip_whitespace();
        let value = match self.peeked {
            Some('t') => {
                self.expect_keyword("true")?;
                true
            }
            Some('f') => {
                self.expect_keyword("false")?;
                false
            }
            _ => return Err(self.unexpected("a boolean")),
        };
        self.end_value()?;
        Ok(value)
    }

    /// Read `null`.
    pub fn read_null(&mut self) -> Result<()> {
        self.begin_value()?;
        self.skip_whitespace();
        if self.peeked != Some('n') {
            return Err(self.unexpected("null"));
        }
        self.expect_keyword("null")?;
        self.end_value()
    }

    // ------------------------------------------------------------------
    // maps
    // ------------------------------------------------------------------

    /// Consume `{` and enter the map.
    pub fn read_map_start(&mut self) -> Result<()> {
        self.begin_value()?;
        self.skip_whitespace();
        if self.peeked != Some('{') {
            return Err(self.unexpected("'{'"));
        }
        self.push_frame(Frame::Map(MapState::KeyOrEnd))?;
        self.bump();
        trace!(depth = self.frames.len(), "map start");
        Ok(())
    }

    /// Advance to the next entry, consuming a `,` if needed.
    ///
    /// Returns `false` when the closing `}` is next; it is left for
    /// [`read_map_end`](Self::read_map_end).
    pub fn next_map_entry(&mut self) -> Result<bool> {
        self.skip_whitespace();
        let Some(Frame::Map(state)) = self.frames.last().copied() else {
            return Err(self.malformed("map", "to be inside a map"));
        };
        match state {
            MapState::KeyOrEnd => {
                if self.peeked == Some('}') {
                    return Ok(false);
                }
            }
            MapState::CommaOrEnd => match self.peeked {
                Some('}') => return Ok(false),
                Some(',') => {
                    self.bump();
                    self.skip_whitespace();
                    if self.peeked == Some('}') {
                        return Err(self.malformed("map", "a key after ','"));
                    }
                }
                _ => return Err(self.malformed("map", "',' or '}'")),
            },
            MapState::Key | MapState::Colon | MapState::Value => {
                return Err(self.incomplete_entry("map"));
            }
        }
        self.set_top(Frame::Map(MapState::Key));
        Ok(true)
    }

    /// Consume `}` and leave the map.
    pub fn read_map_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.frames.last() {
            Some(Frame::Map(MapState::KeyOrEnd | MapState::CommaOrEnd)) => {}
            Some(Frame::Map(_)) => return Err(self.incomplete_entry("map")),
            _ => return Err(self.malformed("map", "to be inside a map")),
        }
        if self.peeked != Some('}') {
            return Err(self.malformed("map", "'}'"));
        }
        self.bump();
        self.frames.pop();
        trace!(depth = self.frames.len(), "map end");
        self.end_value()
    }

    fn incomplete_entry(&self, construct: &'static str) -> JsonError {
        self.error(JsonErrorKind::MalformedStructure {
            construct,
            expected: "each entry to be read in full",
            got: describe(self.peeked),
        })
    }

    fn set_top(&mut self, frame: Frame) {
        if let Some(top) = self.frames.last_mut() {
            *top = frame;
        }
    }

    /// Read a whole map, calling `f` once per entry. The callback reads the
    /// key and then the value; the reader handles `:` and `,`.
    pub fn read_map_by_element<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        self.read_map_start()?;
        while self.next_map_entry()? {
            f(self)?;
        }
        self.read_map_end()
    }

    /// Read a whole map, reading each key for the callback.
    pub fn read_map_entries<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self, String) -> Result<()>,
    {
        self.read_map_by_element(|reader| {
            let key = reader.read_string()?;
            f(reader, key)
        })
    }

    // ------------------------------------------------------------------
    // lists
    // ------------------------------------------------------------------

    /// Consume `[` and enter the list.
    pub fn read_list_start(&mut self) -> Result<()> {
        self.begin_value()?;
        self.skip_whitespace();
        if self.peeked != Some('[') {
            return Err(self.unexpected("'['"));
        }
        self.push_frame(Frame::List(ListState::ValueOrEnd))?;
        self.bump();
        trace!(depth = self.frames.len(), "list start");
        Ok(())
    }

    /// Advance to the next element, consuming a `,` if needed.
    ///
    /// Returns `false` when the closing `]` is next.
    pub fn next_list_element(&mut self) -> Result<bool> {
        self.skip_whitespace();
        let Some(Frame::List(state)) = self.frames.last().copied() else {
            return Err(self.malformed("list", "to be inside a list"));
        };
        match state {
            ListState::ValueOrEnd => {
                if self.peeked == Some(']') {
                    return Ok(false);
                }
            }
            ListState::CommaOrEnd => match self.peeked {
                Some(']') => return Ok(false),
                Some(',') => {
                    self.bump();
                    self.skip_whitespace();
                    if self.peeked == Some(']') {
                        return Err(self.malformed("list", "a value after ','"));
                    }
                }
                _ => return Err(self.malformed("list", "',' or ']'")),
            },
            ListState::Value => return Err(self.incomplete_entry("list")),
        }
        self.set_top(Frame::List(ListState::Value));
        Ok(true)
    }

    /// Consume `]` and leave the list.
    pub fn read_list_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.frames.last() {
            Some(Frame::List(ListState::ValueOrEnd | ListState::CommaOrEnd)) => {}
            Some(Frame::List(ListState::Value)) => return Err(self.incomplete_entry("list")),
            _ => return Err(self.malformed("list", "to be inside a list")),
        }
        if self.peeked != Some(']') {
            return Err(self.malformed("list", "']'"));
        }
        self.bump();
        self.frames.pop();
        trace!(depth = self.frames.len(), "list end");
        self.end_value()
    }

    /// Read a whole list, calling `f` once per element.
    pub fn read_list_by_element<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        self.read_list_start()?;
        while self.next_list_element()? {
            f(self)?;
        }
        self.read_list_end()
    }

    // ------------------------------------------------------------------
    // whole values
    // ------------------------------------------------------------------

    /// Discard the next value, however deeply nested, without building it.
    pub fn skip_value(&mut self) -> Result<()> {
        match self.peek_token()? {
            TokenKind::MapStart => self.read_map_by_element(|reader| {
                reader.skip_value()?;
                reader.skip_value()
            }),
            TokenKind::ListStart => self.read_list_by_element(|reader| reader.skip_value()),
            TokenKind::String => {
                self.begin_value()?;
                self.scan_string(false)?;
                self.end_value()
            }
            TokenKind::Number => self.read_number().map(drop),
            TokenKind::Boolean => self.read_boolean().map(drop),
            TokenKind::Null => self.read_null(),
            TokenKind::MapEnd | TokenKind::ListEnd | TokenKind::End => {
                Err(self.unexpected("a value"))
            }
        }
    }

    /// Read any value into a dynamic [`Value`].
    pub fn read_value(&mut self) -> Result<Value> {
        Ok(match self.peek_token()? {
            TokenKind::MapStart => {
                let mut map = IndexMap::new();
                self.read_map_entries(|reader, key| {
                    let value = reader.read_value()?;
                    map.insert(key, value);
                    Ok(())
                })?;
                Value::Map(map)
            }
            TokenKind::ListStart => {
                let mut items = Vec::new();
                self.read_list_by_element(|reader| {
                    items.push(reader.read_value()?);
                    Ok(())
                })?;
                Value::List(items)
            }
            TokenKind::String => Value::String(self.read_string()?),
            TokenKind::Number => {
                let start = self.offset;
                let literal = self.read_number()?;
                Value::Number(literal.to_number().map_err(|e| Self::locate(e, start))?)
            }
            TokenKind::Boolean => Value::Bool(self.read_boolean()?),
            TokenKind::Null => {
                self.read_null()?;
                Value::Null
            }
            TokenKind::MapEnd | TokenKind::ListEnd | TokenKind::End => {
                return Err(self.unexpected("a value"));
            }
        })
    }

    /// Require that only whitespace remains.
    pub fn read_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.frames.last() {
            Some(Frame::Map(_)) => return Err(self.malformed("map", "'}'")),
            Some(Frame::List(_)) => return Err(self.malformed("list", "']'")),
            None => {}
        }
        if self.peeked.is_some() {
            return Err(self.unexpected("end of input"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coda_testhelpers::test;
    use core::str::Chars;

    fn reader(input: &str) -> Reader<Chars<'_>> {
        Reader::new(input.chars())
    }

    #[test]
    fn strings_decode_every_escape() {
        let mut r = reader(r#""a\"b\\c\/d\b\f\n\r\té😀""#);
        assert_eq!(r.read_string().unwrap(), "a\"b\\c/d\u{8}\u{c}\n\r\té😀");
        r.read_end().unwrap();
    }

    #[test]
    fn malformed_strings_are_rejected() {
        for (input, reason) in [
            (r#""abc"#, "unterminated string"),
            (r#""a\x""#, "invalid escape"),
            ("\"a\u{1}\"", "unescaped control character"),
            (r#""\ud800""#, "lone surrogate"),
            (r#""\udc00""#, "lone surrogate"),
            (r#""\u12g4""#, "invalid \\u escape"),
        ] {
            let err = reader(input).read_string().unwrap_err();
            match err.kind {
                JsonErrorKind::MalformedString { reason: got, .. } => {
                    assert_eq!(got, reason, "{input}")
                }
                other => panic!("{input}: {other:?}"),
            }
        }
    }

    #[test]
    fn number_grammar() {
        for ok in ["0", "-0", "12", "-3.25", "1e10", "1E+2", "6.02e-23"] {
            assert_eq!(reader(ok).read_number().unwrap().as_str(), ok);
        }
        for bad in ["01", "-", "1.", ".5", "1e", "1e+", "12a", "--1", "1.2.3"] {
            let err = reader(bad).read_number().unwrap_err();
            assert!(
                matches!(
                    err.kind,
                    JsonErrorKind::MalformedNumber { .. } | JsonErrorKind::UnexpectedToken { .. }
                ),
                "{bad}: {err:?}"
            );
        }
        assert_eq!(
            reader("12a").read_number().unwrap_err().kind,
            JsonErrorKind::MalformedNumber { raw: "12a".into() }
        );
    }

    #[test]
    fn keywords_need_a_boundary() {
        assert!(reader("true").read_boolean().unwrap());
        assert!(!reader(" false ").read_boolean().unwrap());
        reader("null").read_null().unwrap();

        let err = reader("truex").read_boolean().unwrap_err();
        assert_eq!(err.kind.code(), "json::unexpected_token");
        assert_eq!(err.to_string(), "unexpected token: got `truex`, expected true");
        assert!(reader("nul").read_null().is_err());
        assert!(reader("nulll").read_null().is_err());
    }

    #[test]
    fn maps_track_separators() {
        let mut r = reader(r#"{"a": 1, "b" : [true, null]}"#);
        let mut seen = Vec::new();
        r.read_map_entries(|r, key| {
            seen.push(key);
            r.skip_value()
        })
        .unwrap();
        r.read_end().unwrap();
        assert_eq!(seen, ["a", "b"]);
    }

    #[test]
    fn structural_errors() {
        for input in [
            r#"{"a" 1}"#,
            r#"{"a": 1 "b": 2}"#,
            r#"{"a": 1,}"#,
            r#"{1: 2}"#,
            "[1 2]",
            "[1,]",
            r#"{"a": 1"#,
        ] {
            let err = reader(input).skip_value().unwrap_err();
            assert_eq!(err.kind.code(), "json::malformed_structure", "{input}: {err}");
        }
    }

    #[test]
    fn depth_limit_is_enforced() {
        let options = DeserializeOptions::default().max_depth(2);
        let mut r = Reader::with_options("[[1]]".chars(), &options);
        r.skip_value().unwrap();

        let mut r = Reader::with_options("[[[1]]]".chars(), &options);
        let err = r.skip_value().unwrap_err();
        assert_eq!(err.kind.code(), "json::malformed_structure");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut r = reader("  [null]");
        assert_eq!(r.peek_token().unwrap(), TokenKind::ListStart);
        r.read_list_start().unwrap();
        assert!(r.next_list_element().unwrap());
        assert_eq!(r.peek_token().unwrap(), TokenKind::Null);
        assert_eq!(r.peek_token().unwrap(), TokenKind::Null);
        r.read_null().unwrap();
        assert!(!r.next_list_element().unwrap());
        r.read_list_end().unwrap();
        assert_eq!(r.peek_token().unwrap(), TokenKind::End);
    }

    #[test]
    fn trailing_data_is_detected() {
        let mut r = reader("1 2");
        assert_eq!(r.read_i64().unwrap(), 1);
        assert_eq!(r.read_end().unwrap_err().kind.code(), "json::unexpected_token");
    }

    #[test]
    fn errors_carry_offsets() {
        let err = reader(r#"{"a":1 x"#).skip_value().unwrap_err();
        assert_eq!(err.offset, Some(7));

        let err = reader("[300]")
            .read_list_by_element(|r| r.read_integer::<u8>().map(drop))
            .unwrap_err();
        assert_eq!(err.offset, Some(1));
    }
}
