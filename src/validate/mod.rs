//! Schema validation for policy documents.
//!
//! Validation is fail-together: every problem in a document is collected into
//! one [`PolicyValidationError`] so an author can fix them all from a single
//! run. Parsing, by contrast, stops at the first malformation.
//!
//! # Usage
//!
//! ```
//! use verzola_control::validate::{ValidateOptions, validate_policy_text};
//!
//! let text = "\
//! version: 1
//! listeners:
//!   inbound:
//!     mode: opportunistic
//!     allow_plaintext: true
//!   outbound:
//!     mode: require-tls
//!     allow_plaintext: false
//! ";
//!
//! let config = validate_policy_text(text, "policy.yaml", &ValidateOptions::default()).unwrap();
//! assert_eq!(config.version, 1);
//! ```

mod diagnostic;
mod domain;
mod engine;
mod options;
mod suggest;

pub use diagnostic::{Diagnostic, DiagnosticCollector, PolicyValidationError, ROOT_FIELD_PATH};
pub use domain::{DomainKeyError, DomainNormalizer, MAX_DOMAIN_LENGTH, normalize_domain};
pub use engine::{validate_policy_data, validate_policy_text};
pub use options::ValidateOptions;
pub use suggest::{SUGGESTION_CUTOFF, best_match, one_of_hint};
