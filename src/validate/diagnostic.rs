//! Diagnostics and the collector that accumulates them during one pass.

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::parser::{PolicyParseError, render_line};

/// Field path shown for findings about the document root.
pub const ROOT_FIELD_PATH: &str = "<root>";

/// One validation or parse finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// File the finding refers to.
    pub file_path: String,
    /// Dotted field path, `<root>`, or `<parse>[:line:N]`.
    pub field_path: String,
    /// What is wrong.
    pub message: String,
    /// How to fix it.
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Render as a single line: `<file> [<path>] <message> Suggestion: <text>`.
    #[must_use]
    pub fn render(&self) -> String {
        let location = if self.field_path.is_empty() {
            ROOT_FIELD_PATH
        } else {
            &self.field_path
        };
        render_line(&self.file_path, location, &self.message, &self.suggestion)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<PolicyParseError> for Diagnostic {
    fn from(err: PolicyParseError) -> Self {
        Self {
            file_path: err.file_path,
            field_path: err.field_path,
            message: err.message,
            suggestion: err.suggestion,
        }
    }
}

/// Every finding from one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_lines(.diagnostics))]
pub struct PolicyValidationError {
    diagnostics: Vec<Diagnostic>,
}

impl PolicyValidationError {
    /// Wrap diagnostics, or `None` if there are none.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Option<Self> {
        if diagnostics.is_empty() {
            None
        } else {
            Some(Self { diagnostics })
        }
    }

    /// Findings in collection order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take ownership of the findings.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Number of findings (at least one).
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether there are no findings.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl From<Diagnostic> for PolicyValidationError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<PolicyParseError> for PolicyValidationError {
    fn from(err: PolicyParseError) -> Self {
        Diagnostic::from(err).into()
    }
}

fn render_lines(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accumulates diagnostics for one file during one validation pass.
///
/// Checks append here instead of returning early; [`finish`](Self::finish)
/// raises everything at once.
#[derive(Debug)]
pub struct DiagnosticCollector {
    file_path: String,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Empty collector for `file_path`.
    #[must_use]
    pub fn new(file_path: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            diagnostics: Vec::new(),
        }
    }

    /// Record a finding.
    pub fn add(
        &mut self,
        field_path: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            file_path: self.file_path.clone(),
            field_path: field_path.into(),
            message: message.into(),
            suggestion,
        });
    }

    /// Number of findings so far.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// `Ok` when clean, otherwise every finding in one error.
    pub fn finish(self) -> Result<(), PolicyValidationError> {
        match PolicyValidationError::from_diagnostics(self.diagnostics) {
            None => Ok(()),
            Some(err) => {
                warn!("Validation of {} produced {} diagnostics", self.file_path, err.len());
                Err(err)
            }
        }
    }
}
