//! Error types for JSON reading, writing and codec resolution.

use core::fmt::{self, Display};

/// Error type for every decode and encode operation.
///
/// All failures abort the enclosing call; there are no partial results.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonError {
    /// The specific kind of error
    pub kind: JsonErrorKind,
    /// Character offset into the input where the error was detected, when
    /// the error comes from the reader
    pub offset: Option<usize>,
}

impl Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for JsonError {}

impl JsonError {
    /// Create an error detected at a character offset
    pub const fn new(kind: JsonErrorKind, offset: usize) -> Self {
        JsonError {
            kind,
            offset: Some(offset),
        }
    }

    /// Create an error without position information
    pub const fn without_offset(kind: JsonErrorKind) -> Self {
        JsonError { kind, offset: None }
    }

    /// Shorthand for [`JsonErrorKind::InvalidValue`].
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::without_offset(JsonErrorKind::InvalidValue {
            message: message.into(),
        })
    }

    /// Shorthand for [`JsonErrorKind::MissingRequiredField`].
    pub fn missing_field(field: &'static str, type_name: impl Into<String>) -> Self {
        Self::without_offset(JsonErrorKind::MissingRequiredField {
            field,
            type_name: type_name.into(),
        })
    }
}

impl From<JsonErrorKind> for JsonError {
    fn from(kind: JsonErrorKind) -> Self {
        JsonError::without_offset(kind)
    }
}

/// Specific error kinds
#[derive(Debug, Clone, PartialEq)]
pub enum JsonErrorKind {
    /// A string literal was unterminated, contained an invalid escape, or
    /// contained an unescaped control character
    MalformedString {
        /// The string content read so far
        raw: String,
        /// What was wrong with it
        reason: &'static str,
    },
    /// A number literal violated the JSON number grammar
    MalformedNumber {
        /// The literal text read so far, including the offending character
        raw: String,
    },
    /// A token other than the expected one was found
    UnexpectedToken {
        /// The token that was found
        got: String,
        /// What was expected instead
        expected: &'static str,
    },
    /// A map or list was missing a separator, had an extra one, was left
    /// unbalanced, or a structural operation was used out of order
    MalformedStructure {
        /// The construct being read or written ("map", "list", "document")
        construct: &'static str,
        /// What was expected
        expected: &'static str,
        /// What was found
        got: String,
    },
    /// A character failed a classifier-level parse (e.g. a hex digit)
    InvalidCharacter {
        /// The offending character, or "end of input"
        got: String,
        /// The character class that was expected
        expected: &'static str,
    },
    /// NaN or an infinite float was about to be written
    NonFiniteNumber {
        /// The refused value
        value: f64,
    },
    /// No codec is registered for a type under a context
    NoCodecRegistered {
        /// The requested type, with arguments
        type_name: String,
        /// The ambient context type
        context: &'static str,
        /// "decoder" or "encoder"
        capability: &'static str,
    },
    /// A required key was absent after a map was fully read
    MissingRequiredField {
        /// The missing key
        field: &'static str,
        /// The type being decoded
        type_name: String,
    },
    /// A closed-vocabulary codec saw a label it does not know
    UnknownValueForEnumeration {
        /// The label that was read
        value: String,
        /// The type being decoded
        type_name: String,
    },
    /// A syntactically valid number does not fit the requested type
    NumberOutOfRange {
        /// The number literal
        value: String,
        /// The target type that couldn't hold the value
        target_type: &'static str,
    },
    /// Domain validation failed inside a codec
    InvalidValue {
        /// Description of why the value is invalid
        message: String,
    },
    /// A codec asked for a context type the ambient context does not provide
    ContextUnavailable {
        /// The context type the codec asked for
        expected: &'static str,
        /// The ambient context type
        actual: &'static str,
    },
}

impl Display for JsonErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonErrorKind::MalformedString { raw, reason } => {
                write!(f, "malformed string \"{raw}\": {reason}")
            }
            JsonErrorKind::MalformedNumber { raw } => write!(f, "malformed number `{raw}`"),
            JsonErrorKind::UnexpectedToken { got, expected } => {
                write!(f, "unexpected token: got {got}, expected {expected}")
            }
            JsonErrorKind::MalformedStructure {
                construct,
                expected,
                got,
            } => write!(f, "malformed {construct}: expected {expected}, got {got}"),
            JsonErrorKind::InvalidCharacter { got, expected } => {
                write!(f, "invalid character {got}, expected {expected}")
            }
            JsonErrorKind::NonFiniteNumber { value } => {
                write!(f, "cannot write non-finite number {value}")
            }
            JsonErrorKind::NoCodecRegistered {
                type_name,
                context,
                capability,
            } => write!(
                f,
                "no {capability} codec registered for {type_name} under context {context}"
            ),
            JsonErrorKind::MissingRequiredField { field, type_name } => {
                write!(f, "missing required field `{field}` for {type_name}")
            }
            JsonErrorKind::UnknownValueForEnumeration { value, type_name } => {
                write!(f, "unknown value \"{value}\" for {type_name}")
            }
            JsonErrorKind::NumberOutOfRange { value, target_type } => {
                write!(f, "number `{value}` out of range for {target_type}")
            }
            JsonErrorKind::InvalidValue { message } => write!(f, "invalid value: {message}"),
            JsonErrorKind::ContextUnavailable { expected, actual } => {
                write!(f, "context {actual} does not provide {expected}")
            }
        }
    }
}

impl JsonErrorKind {
    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            JsonErrorKind::MalformedString { .. } => "json::malformed_string",
            JsonErrorKind::MalformedNumber { .. } => "json::malformed_number",
            JsonErrorKind::UnexpectedToken { .. } => "json::unexpected_token",
            JsonErrorKind::MalformedStructure { .. } => "json::malformed_structure",
            JsonErrorKind::InvalidCharacter { .. } => "json::invalid_character",
            JsonErrorKind::NonFiniteNumber { .. } => "json::non_finite_number",
            JsonErrorKind::NoCodecRegistered { .. } => "json::no_codec_registered",
            JsonErrorKind::MissingRequiredField { .. } => "json::missing_required_field",
            JsonErrorKind::UnknownValueForEnumeration { .. } => {
                "json::unknown_value_for_enumeration"
            }
            JsonErrorKind::NumberOutOfRange { .. } => "json::number_out_of_range",
            JsonErrorKind::InvalidValue { .. } => "json::invalid_value",
            JsonErrorKind::ContextUnavailable { .. } => "json::context_unavailable",
        }
    }

    /// A short label for the offending location, for use next to the input
    /// excerpt at [`JsonError::offset`].
    pub fn label(&self) -> String {
        match self {
            JsonErrorKind::MalformedString { reason, .. } => (*reason).into(),
            JsonErrorKind::MalformedNumber { .. } => "not a valid number".into(),
            JsonErrorKind::UnexpectedToken { expected, .. } => format!("expected {expected}"),
            JsonErrorKind::MalformedStructure { expected, .. } => format!("expected {expected}"),
            JsonErrorKind::InvalidCharacter { expected, .. } => format!("expected {expected}"),
            JsonErrorKind::NumberOutOfRange { target_type, .. } => {
                format!("does not fit {target_type}")
            }
            JsonErrorKind::MissingRequiredField { field, .. } => format!("`{field}` missing"),
            JsonErrorKind::UnknownValueForEnumeration { value, .. } => {
                format!("unknown value \"{value}\"")
            }
            JsonErrorKind::NonFiniteNumber { .. }
            | JsonErrorKind::NoCodecRegistered { .. }
            | JsonErrorKind::InvalidValue { .. }
            | JsonErrorKind::ContextUnavailable { .. } => self.to_string(),
        }
    }
}

/// Render a character-or-end for error messages.
pub(crate) fn describe(c: Option<char>) -> String {
    match c {
        Some(c) => format!("'{}'", c.escape_debug()),
        None => "end of input".into(),
    }
}

/// Result type for JSON operations
pub type Result<T> = core::result::Result<T, JsonError>;

#[cfg(test)]
mod tests {
    use super::*;
    use coda_testhelpers::test;
    use insta::assert_snapshot;

    #[test]
    fn messages_name_the_offending_input() {
        let err = JsonError::new(
            JsonErrorKind::MalformedStructure {
                construct: "map",
                expected: "',' or '}'",
                got: describe(Some('"')),
            },
            7,
        );
        assert_eq!(err.offset, Some(7));
        assert_snapshot!(err.to_string(), @r#"malformed map: expected ',' or '}', got '\"'"#);

        let err = JsonError::from(JsonErrorKind::NoCodecRegistered {
            type_name: "List<Point>".into(),
            context: "EmptyContext",
            capability: "decoder",
        });
        assert_eq!(err.offset, None);
        assert_snapshot!(
            err.to_string(),
            @"no decoder codec registered for List<Point> under context EmptyContext"
        );
    }

    #[test]
    fn codes_are_stable() {
        let kind = JsonErrorKind::MissingRequiredField {
            field: "start",
            type_name: "IntRange".into(),
        };
        assert_eq!(kind.code(), "json::missing_required_field");
        assert_eq!(kind.to_string(), "missing required field `start` for IntRange");
        assert_eq!(describe(None), "end of input");
        assert_eq!(describe(Some('\n')), "'\\n'");
    }

    #[test]
    fn labels_are_short() {
        let kind = JsonErrorKind::NumberOutOfRange {
            value: "300".into(),
            target_type: "u8",
        };
        assert_eq!(kind.label(), "does not fit u8");

        let kind = JsonErrorKind::MalformedString {
            raw: "ab".into(),
            reason: "unterminated string",
        };
        assert_eq!(kind.label(), "unterminated string");
    }
}
