//! Where characters come from, and where they go.

/// A pull source of characters.
///
/// Anything that iterates `char`s is a source, so `"[1, 2]".chars()` can be
/// handed straight to [`decode`](crate::decode).
pub trait CharSource: Iterator<Item = char> {}

impl<I: Iterator<Item = char>> CharSource for I {}

/// An append-only character sink.
pub trait CharSink {
    /// Append one character.
    fn write_char(&mut self, c: char);

    /// Append a run of characters.
    fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
        }
    }
}

impl CharSink for String {
    fn write_char(&mut self, c: char) {
        self.push(c);
    }

    fn write_str(&mut self, s: &str) {
        self.push_str(s);
    }
}

impl<S: CharSink + ?Sized> CharSink for &mut S {
    fn write_char(&mut self, c: char) {
        (**self).write_char(c);
    }

    fn write_str(&mut self, s: &str) {
        (**self).write_str(s);
    }
}
