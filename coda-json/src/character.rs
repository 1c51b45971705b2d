//! Classification of single characters, with end-of-input as a first-class value.
//!
//! Every function here is total: it accepts any `char` and [`END`].

use crate::error::{JsonError, JsonErrorKind, describe};

/// A character, or [`END`] when the input is exhausted.
pub type Character = Option<char>;

/// The end-of-input sentinel.
pub const END: Character = None;

/// U+0000 through U+001F. These may not appear unescaped inside a string.
pub const fn is_control(c: Character) -> bool {
    matches!(c, Some('\u{0}'..='\u{1f}'))
}

/// ASCII `0` through `9`.
pub const fn is_digit(c: Character) -> bool {
    matches!(c, Some('0'..='9'))
}

/// ASCII hex digits, either case.
pub const fn is_hex_digit(c: Character) -> bool {
    matches!(c, Some('0'..='9' | 'a'..='f' | 'A'..='F'))
}

/// The numeric value of a hex digit.
pub fn parse_hex_digit(c: Character) -> Result<u8, JsonError> {
    match c {
        Some(d @ '0'..='9') => Ok(d as u8 - b'0'),
        Some(d @ 'a'..='f') => Ok(d as u8 - b'a' + 10),
        Some(d @ 'A'..='F') => Ok(d as u8 - b'A' + 10),
        other => Err(JsonError::without_offset(JsonErrorKind::InvalidCharacter {
            got: describe(other),
            expected: "a hex digit",
        })),
    }
}

/// Characters that may legally follow a complete scalar token.
pub const fn is_value_boundary(c: Character) -> bool {
    matches!(
        c,
        None | Some(',' | ':' | '{' | '[' | '}' | ']' | '\r' | '\t' | '\n' | ' ')
    )
}

/// JSON insignificant whitespace: space, `\n`, `\r`, `\t`. Nothing else.
pub const fn is_whitespace(c: Character) -> bool {
    matches!(c, Some(' ' | '\n' | '\r' | '\t'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coda_testhelpers::test;

    #[test]
    fn hex_digits_parse_in_both_cases() {
        assert_eq!(parse_hex_digit(Some('0')).unwrap(), 0);
        assert_eq!(parse_hex_digit(Some('9')).unwrap(), 9);
        assert_eq!(parse_hex_digit(Some('a')).unwrap(), 10);
        assert_eq!(parse_hex_digit(Some('F')).unwrap(), 15);

        let err = parse_hex_digit(Some('g')).unwrap_err();
        assert_eq!(err.kind.code(), "json::invalid_character");
        assert!(parse_hex_digit(END).is_err());
    }

    #[test]
    fn end_is_a_boundary_and_nothing_else() {
        assert!(is_value_boundary(END));
        assert!(!is_control(END));
        assert!(!is_digit(END));
        assert!(!is_hex_digit(END));
        assert!(!is_whitespace(END));
    }

    #[test]
    fn only_four_whitespace_characters() {
        assert!(is_whitespace(Some('\t')));
        assert!(!is_whitespace(Some('\u{0b}')));
        assert!(!is_whitespace(Some('\u{a0}')));
    }
}
