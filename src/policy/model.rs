//! Validated policy model.
//!
//! These types are only ever produced by the validation engine. A
//! [`PolicyConfig`] is built in one step after every section passed, so holding
//! one means the whole document was valid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::validate::normalize_domain;

/// The only schema version this release understands.
pub const SUPPORTED_SCHEMA_VERSION: i64 = 1;

/// TXT record label used when `capability_hints.dns_txt.label` is omitted.
pub const DEFAULT_DNS_TXT_LABEL: &str = "_verzola._tcp";

/// TLS posture applied to a listener or a destination domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyMode {
    /// Use TLS when the peer offers it, fall back to plaintext otherwise.
    Opportunistic,
    /// Refuse delivery unless TLS is negotiated.
    RequireTls,
    /// Refuse delivery unless a post-quantum key exchange is negotiated.
    RequirePq,
}

impl PolicyMode {
    /// Every mode, in documentation order.
    pub const ALL: [PolicyMode; 3] = [
        PolicyMode::Opportunistic,
        PolicyMode::RequireTls,
        PolicyMode::RequirePq,
    ];

    /// Wire spelling of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyMode::Opportunistic => "opportunistic",
            PolicyMode::RequireTls => "require-tls",
            PolicyMode::RequirePq => "require-pq",
        }
    }

    /// Whether this mode refuses plaintext sessions.
    #[must_use]
    pub fn requires_tls(self) -> bool {
        !matches!(self, PolicyMode::Opportunistic)
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PolicyMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or(())
    }
}

/// What to do when a `require-pq` peer cannot negotiate post-quantum TLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchAction {
    /// Temporarily fail so the sender retries later.
    Defer,
    /// Permanently fail the delivery.
    Reject,
}

impl MismatchAction {
    /// Every action, in documentation order.
    pub const ALL: [MismatchAction; 2] = [MismatchAction::Defer, MismatchAction::Reject];

    /// Wire spelling of the action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MismatchAction::Defer => "defer",
            MismatchAction::Reject => "reject",
        }
    }
}

impl fmt::Display for MismatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MismatchAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MismatchAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or(())
    }
}

/// Policy for one side of the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListenerPolicy {
    /// TLS posture for sessions on this listener.
    pub mode: PolicyMode,

    /// Whether sessions that never upgrade to TLS are accepted.
    pub allow_plaintext: bool,
}

/// Inbound and outbound listener policies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListenerSet {
    /// Policy for mail received from the internet.
    pub inbound: ListenerPolicy,

    /// Policy for mail relayed to remote MX hosts.
    pub outbound: ListenerPolicy,
}

/// Per-domain override of the outbound posture.
///
/// `on_mismatch` is `Some` exactly when `mode` is [`PolicyMode::RequirePq`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainPolicy {
    /// TLS posture for deliveries to this domain.
    pub mode: PolicyMode,

    /// Action when post-quantum negotiation fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_mismatch: Option<MismatchAction>,
}

impl DomainPolicy {
    /// A `require-pq` policy with the given mismatch action.
    #[must_use]
    pub fn require_pq(on_mismatch: MismatchAction) -> Self {
        Self {
            mode: PolicyMode::RequirePq,
            on_mismatch: Some(on_mismatch),
        }
    }

    /// A policy for any mode, applying the `defer` default under `require-pq`.
    #[must_use]
    pub fn with_mode(mode: PolicyMode) -> Self {
        match mode {
            PolicyMode::RequirePq => Self::require_pq(MismatchAction::Defer),
            _ => Self {
                mode,
                on_mismatch: None,
            },
        }
    }
}

/// DNS TXT capability advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DnsTxtHint {
    /// Whether the hint is published.
    pub enabled: bool,

    /// Record label; always non-empty and underscore-prefixed.
    pub label: String,
}

/// Optional capability advertisements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CapabilityHints {
    /// DNS TXT hint, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_txt: Option<DnsTxtHint>,
}

/// A fully validated policy document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Schema version, always [`SUPPORTED_SCHEMA_VERSION`].
    pub version: i64,

    /// Listener policies.
    pub listeners: ListenerSet,

    /// Domain overrides keyed by normalized domain name, sorted.
    #[serde(default)]
    pub domains: BTreeMap<String, DomainPolicy>,

    /// Capability advertisements.
    #[serde(default)]
    pub capability_hints: CapabilityHints,
}

impl PolicyConfig {
    /// Look up the override for a domain in any spelling.
    ///
    /// The query is normalized the same way document keys are, so
    /// `Partner.Example.` finds the `partner.example` entry.
    #[must_use]
    pub fn domain_policy(&self, domain: &str) -> Option<&DomainPolicy> {
        let normalized = normalize_domain(domain)?;
        self.domains.get(&normalized)
    }

    /// Mode applied when relaying to `domain`.
    ///
    /// Falls back to the outbound listener mode when no override exists.
    #[must_use]
    pub fn effective_outbound_mode(&self, domain: &str) -> PolicyMode {
        self.domain_policy(domain)
            .map(|policy| policy.mode)
            .unwrap_or(self.listeners.outbound.mode)
    }
}
