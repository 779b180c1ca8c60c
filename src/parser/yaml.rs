//! Parser for the restricted YAML dialect used by policy files.
//!
//! Only nested `key: value` mappings are accepted: two-space indentation,
//! scalar values, `#` comments. No sequences, anchors, flow collections or
//! multi-document streams.
//!
//! The parser is a state machine over a stack of open scopes. Each scope owns
//! the mapping being filled at its indentation level and is folded into its
//! parent once a line at the same or a shallower indentation closes it. Errors
//! always name the exact source line.

use tracing::{debug, trace};

use super::error::PolicyParseError;
use super::scalar::coerce_scalar;
use crate::policy::{RawDocument, RawValue};

/// Indentation step between a key and its children.
pub const INDENT_STEP: usize = 2;

/// Parse YAML-subset text into a raw document.
pub fn parse_yaml_subset(text: &str, file_path: &str) -> Result<RawDocument, PolicyParseError> {
    let mut scopes = ScopeStack::new();
    let mut line_count = 0;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        line_count = line_number;

        if raw_line.trim().is_empty() || raw_line.trim_start_matches(' ').starts_with('#') {
            continue;
        }

        let leading_len = raw_line.len() - raw_line.trim_start_matches([' ', '\t']).len();
        if raw_line[..leading_len].contains('\t') {
            return Err(PolicyParseError::yaml_line(
                file_path,
                line_number,
                "tab indentation is not supported",
                "Use spaces with 2-space indentation.",
            ));
        }

        let indent = raw_line.len() - raw_line.trim_start_matches(' ').len();
        if indent % INDENT_STEP != 0 {
            return Err(PolicyParseError::yaml_line(
                file_path,
                line_number,
                "indentation must use 2-space steps",
                "Align nested keys to multiples of 2 spaces.",
            ));
        }

        let content = strip_inline_comment(&raw_line[indent..]).trim();
        if content.is_empty() {
            continue;
        }

        let Some((key_part, value_part)) = content.split_once(':') else {
            return Err(PolicyParseError::yaml_line(
                file_path,
                line_number,
                "expected 'key: value' syntax",
                "Add ':' between the key and value.",
            ));
        };
        let key = key_part.trim();
        let value = value_part.trim();
        if key.is_empty() {
            return Err(PolicyParseError::yaml_line(
                file_path,
                line_number,
                "key cannot be empty",
                "Provide a non-empty key before ':'.",
            ));
        }

        let indent = indent as isize;
        scopes.close_to(indent);

        let parent = scopes.top();
        if indent > parent.indent + INDENT_STEP as isize {
            return Err(PolicyParseError::yaml_line(
                file_path,
                line_number,
                "indentation jumps over expected nesting level",
                "Nest child keys one level (2 spaces) deeper than parent.",
            ));
        }

        let field_path = parent.child_path(key);
        if parent.mapping.contains_key(key) {
            return Err(PolicyParseError {
                file_path: file_path.to_string(),
                field_path,
                message: "duplicate key in YAML mapping".to_string(),
                suggestion: Some("Remove or rename one of the duplicate keys.".to_string()),
            });
        }

        if value.is_empty() {
            trace!(line = line_number, path = %field_path, "Opening nested mapping");
            scopes.open(indent, key, field_path);
            continue;
        }

        let scalar = coerce_scalar(value).map_err(|err| {
            PolicyParseError::yaml_line(file_path, line_number, &err.to_string(), err.suggestion())
        })?;
        scopes.top_mut().mapping.insert(key.to_string(), scalar);
    }

    let root = scopes.finish();
    debug!(
        "Parsed YAML policy {}: {} lines, {} top-level keys",
        file_path,
        line_count,
        root.len()
    );
    Ok(root)
}

/// One open mapping on the scope stack.
struct Scope {
    /// Indentation of the key that opened this mapping (-1 for the root).
    indent: isize,
    /// Key under which the mapping is stored in its parent.
    key: Option<String>,
    /// Dotted path of the mapping.
    path: String,
    /// Entries collected so far.
    mapping: RawDocument,
}

impl Scope {
    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }
}

/// Stack of open scopes, never empty.
struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    fn new() -> Self {
        Self {
            scopes: vec![Scope {
                indent: -1,
                key: None,
                path: String::new(),
                mapping: RawDocument::new(),
            }],
        }
    }

    fn top(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    fn open(&mut self, indent: isize, key: &str, path: String) {
        self.scopes.push(Scope {
            indent,
            key: Some(key.to_string()),
            path,
            mapping: RawDocument::new(),
        });
    }

    /// Close every scope at `indent` or deeper.
    fn close_to(&mut self, indent: isize) {
        while self.scopes.len() > 1 && indent <= self.top().indent {
            self.pop_into_parent();
        }
    }

    fn pop_into_parent(&mut self) {
        if let Some(Scope {
            key: Some(key),
            mapping,
            ..
        }) = self.scopes.pop()
        {
            self.top_mut().mapping.insert(key, RawValue::Map(mapping));
        }
    }

    fn finish(mut self) -> RawDocument {
        while self.scopes.len() > 1 {
            self.pop_into_parent();
        }
        self.scopes
            .pop()
            .map(|root| root.mapping)
            .unwrap_or_default()
    }
}

/// Cut a trailing `# comment`, ignoring `#` inside quotes or glued to a word.
fn strip_inline_comment(content: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    let mut after_whitespace = true;

    for (index, ch) in content.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if !in_single && !in_double && after_whitespace => {
                return content[..index].trim_end();
            }
            _ => {}
        }
        after_whitespace = ch.is_whitespace();
    }

    content
}
