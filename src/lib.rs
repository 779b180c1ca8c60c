//! verzola-control: policy parsing and validation for the VERZOLA SMTP proxy
//!
//! This crate turns a human-authored policy document into a typed
//! [`PolicyConfig`](policy::PolicyConfig) that the render and report stages
//! consume.
//!
//! # Pipeline
//!
//! - **Parser**: restricted YAML subset or TOML -> [`RawDocument`](policy::RawDocument).
//!   Fail-fast, errors name the offending line.
//! - **Validator**: [`RawDocument`](policy::RawDocument) -> [`PolicyConfig`](policy::PolicyConfig).
//!   Fail-together, every problem is reported in one pass with a fix-it
//!   suggestion.
//!
//! Validation is a pure function of the document and
//! [`ValidateOptions`](validate::ValidateOptions); there is no global state and
//! no I/O.

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod parser;
pub mod policy;
pub mod validate;

pub use parser::{PolicyFormat, PolicyParseError, parse_policy_text};
pub use policy::{PolicyConfig, RawDocument, RawValue};
pub use validate::{
    Diagnostic, PolicyValidationError, ValidateOptions, validate_policy_data, validate_policy_text,
};
