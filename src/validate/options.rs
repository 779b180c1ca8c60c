//! Validation settings.

use serde::{Deserialize, Serialize};

/// Knobs for one validation pass.
///
/// Deserializes from a caller's own config file, e.g.
///
/// ```toml
/// [validate]
/// strict = false
/// ```
///
/// Missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Reject keys outside each object's allow-list. Defaults to `true`.
    pub strict: bool,
}

impl ValidateOptions {
    /// Unknown keys are errors.
    #[must_use]
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Unknown keys are ignored.
    #[must_use]
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self::strict()
    }
}
