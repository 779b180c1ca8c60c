//! Policy document parsing.
//!
//! Turns policy text into a [`RawDocument`]. The file extension picks the
//! format:
//!
//! - `.yaml` / `.yml`: the restricted YAML dialect (see [`parse_yaml_subset`])
//! - `.toml`: TOML via the `toml` crate
//!
//! Parsing is fail-fast: the first malformation is returned as a
//! [`PolicyParseError`] and no partial document escapes.

mod error;
mod scalar;
mod toml_adapter;
mod yaml;

use std::fmt;
use std::path::Path;

use tracing::debug;

pub use error::{PARSE_FIELD_PATH, PolicyParseError, ScalarError};
pub(crate) use error::render_line;
pub use scalar::coerce_scalar;
pub use toml_adapter::parse_toml;
pub use yaml::{INDENT_STEP, parse_yaml_subset};

use crate::policy::RawDocument;

/// Source format of a policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyFormat {
    /// Restricted YAML subset.
    Yaml,
    /// TOML.
    Toml,
}

impl PolicyFormat {
    /// Pick the format from a file path's extension (case-insensitive).
    pub fn from_path(file_path: &str) -> Result<Self, PolicyParseError> {
        let extension = Path::new(file_path)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(PolicyFormat::Yaml),
            Some("toml") => Ok(PolicyFormat::Toml),
            other => {
                let shown = other
                    .map(|ext| format!(".{ext}"))
                    .unwrap_or_else(|| "<none>".to_string());
                Err(PolicyParseError::general(
                    file_path,
                    format!("unsupported policy file extension '{shown}'"),
                    "Use .yaml, .yml, or .toml for policy files.",
                ))
            }
        }
    }

    /// Parse text in this format.
    pub fn parse(self, text: &str, file_path: &str) -> Result<RawDocument, PolicyParseError> {
        match self {
            PolicyFormat::Yaml => parse_yaml_subset(text, file_path),
            PolicyFormat::Toml => parse_toml(text, file_path),
        }
    }
}

impl fmt::Display for PolicyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyFormat::Yaml => f.write_str("yaml"),
            PolicyFormat::Toml => f.write_str("toml"),
        }
    }
}

/// Parse policy text, choosing the format from `file_path`'s extension.
pub fn parse_policy_text(text: &str, file_path: &str) -> Result<RawDocument, PolicyParseError> {
    let format = PolicyFormat::from_path(file_path)?;
    debug!("Parsing {} as {}", file_path, format);
    format.parse(text, file_path)
}
