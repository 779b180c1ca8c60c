//! Parse error type.

use thiserror::Error;

/// Field path used for failures that are not tied to a source line.
pub const PARSE_FIELD_PATH: &str = "<parse>";

/// A fatal failure turning source text into a [`RawDocument`].
///
/// Parsing stops at the first of these.
///
/// [`RawDocument`]: crate::policy::RawDocument
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_line(.file_path, .field_path, .message, .suggestion))]
pub struct PolicyParseError {
    /// File the text came from.
    pub file_path: String,
    /// `<parse>`, `<parse>:line:N`, or the dotted path of a duplicate key.
    pub field_path: String,
    /// Human-readable description.
    pub message: String,
    /// How to fix it.
    pub suggestion: Option<String>,
}

impl PolicyParseError {
    /// Error not tied to a particular line.
    #[must_use]
    pub fn general(
        file_path: &str,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.to_string(),
            field_path: PARSE_FIELD_PATH.to_string(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// YAML syntax error at a 1-based line.
    #[must_use]
    pub fn yaml_line(
        file_path: &str,
        line_number: usize,
        detail: &str,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.to_string(),
            field_path: format!("{PARSE_FIELD_PATH}:line:{line_number}"),
            message: format!("invalid YAML syntax at line {line_number}: {detail}"),
            suggestion: Some(suggestion.into()),
        }
    }
}

/// One finding as a single line: `<file> [<path>] <message> Suggestion: <text>`.
///
/// The suggestion clause is left out when there is none.
pub(crate) fn render_line(
    file_path: &str,
    field_path: &str,
    message: &str,
    suggestion: &Option<String>,
) -> String {
    match suggestion {
        Some(suggestion) if !suggestion.is_empty() => {
            format!("{file_path} [{field_path}] {message} Suggestion: {suggestion}")
        }
        _ => format!("{file_path} [{field_path}] {message}"),
    }
}

/// Failure coercing a single YAML scalar token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScalarError {
    /// Opening quote without a matching closing quote.
    #[error("unclosed quoted scalar")]
    UnclosedQuote,
}

impl ScalarError {
    /// Fix-it text for the error.
    #[must_use]
    pub fn suggestion(self) -> &'static str {
        match self {
            ScalarError::UnclosedQuote => "Close the quoted string with a matching quote.",
        }
    }
}
