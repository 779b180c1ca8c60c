//! Domain key normalization and collision detection.
//!
//! Keys are trimmed, lose one trailing dot, and are lower-cased before being
//! checked against the DNS hostname grammar: dot-separated labels of 1-63
//! `[a-z0-9-]` characters that neither start nor end with a hyphen, at most
//! 253 characters overall.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Longest accepted domain name, in characters.
pub const MAX_DOMAIN_LENGTH: usize = 253;

static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)*$",
    )
    .expect("hostname pattern is valid")
});

/// Canonical form of a domain key, or `None` if it is not a valid hostname.
#[must_use]
pub fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let normalized = trimmed
        .strip_suffix('.')
        .unwrap_or(trimmed)
        .to_lowercase();

    if normalized.is_empty() || normalized.len() > MAX_DOMAIN_LENGTH {
        return None;
    }
    HOSTNAME_RE.is_match(&normalized).then_some(normalized)
}

/// Why a domain key was not admitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainKeyError {
    /// Not a valid hostname after normalization.
    #[error("invalid domain key '{raw}'")]
    Invalid {
        /// Key as written.
        raw: String,
    },

    /// Normalizes to the same name as an earlier key.
    #[error("duplicate domain policy after normalization: '{raw}' conflicts with '{first}'")]
    Duplicate {
        /// Key as written.
        raw: String,
        /// Earlier key with the same normalized form.
        first: String,
    },
}

/// Tracks normalized domain keys seen in one document.
///
/// The first key admitted for a normalized name wins and later ones are
/// duplicates. The validator admits keys in [`RawDocument`] order, which is
/// sorted rather than source order: with both `example.com` and `Example.COM`
/// present, `Example.COM` is kept and `example.com` is reported no matter
/// which one the file lists first.
///
/// [`RawDocument`]: crate::policy::RawDocument
#[derive(Debug, Default)]
pub struct DomainNormalizer {
    /// Normalized name -> first raw key that produced it.
    seen: HashMap<String, String>,
}

impl DomainNormalizer {
    /// Empty normalizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `raw` and claim the result.
    ///
    /// Fails if the key is invalid or a previous key already claimed the same
    /// normalized name.
    pub fn admit(&mut self, raw: &str) -> Result<String, DomainKeyError> {
        let normalized = normalize_domain(raw).ok_or_else(|| DomainKeyError::Invalid {
            raw: raw.to_string(),
        })?;

        if let Some(first) = self.seen.get(&normalized) {
            return Err(DomainKeyError::Duplicate {
                raw: raw.to_string(),
                first: first.clone(),
            });
        }

        self.seen.insert(normalized.clone(), raw.to_string());
        Ok(normalized)
    }
}
