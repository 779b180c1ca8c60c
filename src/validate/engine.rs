//! Schema validation engine.
//!
//! Walks a [`RawDocument`] section by section and either builds a
//! [`PolicyConfig`] or returns every problem found in one
//! [`PolicyValidationError`].
//!
//! # Section Order
//!
//! 1. Root keys (required, then unknown under strict mode)
//! 2. `version`
//! 3. `listeners`
//! 4. `domains`
//! 5. `capability_hints`
//!
//! Each check records into a shared [`DiagnosticCollector`] and carries on. A
//! value that fails its object check skips only its own subtree.
//!
//! # Absent vs. null
//!
//! A required key that is absent is reported once, by the required-key check
//! of its parent object. A key that is present with an explicit null is
//! reported by the field's own validator.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::diagnostic::{Diagnostic, DiagnosticCollector, PolicyValidationError, ROOT_FIELD_PATH};
use super::domain::{DomainKeyError, DomainNormalizer};
use super::options::ValidateOptions;
use super::suggest::one_of_hint;
use crate::parser::parse_policy_text;
use crate::policy::{
    CapabilityHints, DEFAULT_DNS_TXT_LABEL, DnsTxtHint, DomainPolicy, ListenerPolicy, ListenerSet,
    MismatchAction, PolicyConfig, PolicyMode, RawDocument, RawValue, SUPPORTED_SCHEMA_VERSION,
};

const ROOT_REQUIRED: &[&str] = &["listeners", "version"];
const ROOT_ALLOWED: &[&str] = &["capability_hints", "domains", "listeners", "version"];
const LISTENERS_KEYS: &[&str] = &["inbound", "outbound"];
const LISTENER_POLICY_KEYS: &[&str] = &["allow_plaintext", "mode"];
const DOMAIN_REQUIRED: &[&str] = &["mode"];
const DOMAIN_ALLOWED: &[&str] = &["mode", "on_mismatch"];
const CAPABILITY_HINTS_ALLOWED: &[&str] = &["dns_txt"];
const DNS_TXT_REQUIRED: &[&str] = &["enabled"];
const DNS_TXT_ALLOWED: &[&str] = &["enabled", "label"];

/// Validate a parsed document.
///
/// Returns the typed policy, or every diagnostic found in the document.
pub fn validate_policy_data(
    raw: &RawDocument,
    file_path: &str,
    options: &ValidateOptions,
) -> Result<PolicyConfig, PolicyValidationError> {
    debug!("Validating {} (strict: {})", file_path, options.strict);
    SchemaValidator::new(file_path, options).run(raw)
}

/// Parse and validate policy text, picking the format from `file_path`.
///
/// Parse failures come back as a single-diagnostic [`PolicyValidationError`].
pub fn validate_policy_text(
    text: &str,
    file_path: &str,
    options: &ValidateOptions,
) -> Result<PolicyConfig, PolicyValidationError> {
    let raw = parse_policy_text(text, file_path)?;
    validate_policy_data(&raw, file_path, options)
}

/// State for one validation pass.
struct SchemaValidator {
    file_path: String,
    collector: DiagnosticCollector,
    strict: bool,
}

impl SchemaValidator {
    fn new(file_path: &str, options: &ValidateOptions) -> Self {
        Self {
            file_path: file_path.to_string(),
            collector: DiagnosticCollector::new(file_path),
            strict: options.strict,
        }
    }

    fn run(mut self, root: &RawDocument) -> Result<PolicyConfig, PolicyValidationError> {
        self.require_keys(root, ROOT_REQUIRED, ROOT_FIELD_PATH);
        self.reject_unknown_keys(root, ROOT_ALLOWED, ROOT_FIELD_PATH);

        let version = root.get("version").and_then(|v| self.version(v, "version"));
        trace!(diagnostics = self.collector.len(), "Checked version");

        let listeners = root
            .get("listeners")
            .and_then(|v| self.listeners(v, "listeners"));
        trace!(diagnostics = self.collector.len(), "Checked listeners");

        let domains = match root.get("domains") {
            None => Some(BTreeMap::new()),
            Some(v) => self.domains(v, "domains"),
        };
        trace!(diagnostics = self.collector.len(), "Checked domains");

        let capability_hints = match root.get("capability_hints") {
            None => Some(CapabilityHints::default()),
            Some(v) => self.capability_hints(v, "capability_hints"),
        };
        trace!(diagnostics = self.collector.len(), "Checked capability_hints");

        let Self {
            file_path,
            collector,
            ..
        } = self;
        collector.finish()?;

        let (Some(version), Some(listeners), Some(domains), Some(capability_hints)) =
            (version, listeners, domains, capability_hints)
        else {
            return Err(Diagnostic {
                file_path,
                field_path: ROOT_FIELD_PATH.to_string(),
                message: "policy validation did not complete".to_string(),
                suggestion: None,
            }
            .into());
        };

        debug!(
            "Validated {}: {} domain policies, dns_txt hint {}",
            file_path,
            domains.len(),
            if capability_hints.dns_txt.is_some() { "set" } else { "unset" }
        );
        Ok(PolicyConfig {
            version,
            listeners,
            domains,
            capability_hints,
        })
    }

    fn version(&mut self, value: &RawValue, path: &str) -> Option<i64> {
        if value.is_null() {
            self.collector.add(
                path,
                "missing required field",
                Some(format!("Set version: {SUPPORTED_SCHEMA_VERSION}")),
            );
            return None;
        }

        if let RawValue::OversizedInteger(digits) = value {
            self.collector.add(
                path,
                format!("unsupported schema version '{digits}'"),
                Some(format!("Use version: {SUPPORTED_SCHEMA_VERSION} for this release.")),
            );
            return None;
        }

        let Some(version) = value.as_integer() else {
            self.collector.add(
                path,
                format!("expected integer version, got {}", value.type_name()),
                Some(format!("Set version to numeric value {SUPPORTED_SCHEMA_VERSION}.")),
            );
            return None;
        };

        if version != SUPPORTED_SCHEMA_VERSION {
            self.collector.add(
                path,
                format!("unsupported schema version '{version}'"),
                Some(format!("Use version: {SUPPORTED_SCHEMA_VERSION} for this release.")),
            );
            return None;
        }

        Some(version)
    }

    fn listeners(&mut self, value: &RawValue, path: &str) -> Option<ListenerSet> {
        let listeners = self.expect_object(value, path)?;
        self.require_keys(listeners, LISTENERS_KEYS, path);
        self.reject_unknown_keys(listeners, LISTENERS_KEYS, path);

        let inbound = listeners
            .get("inbound")
            .and_then(|v| self.listener_policy(v, &join_path(path, "inbound")));
        let outbound = listeners
            .get("outbound")
            .and_then(|v| self.listener_policy(v, &join_path(path, "outbound")));

        Some(ListenerSet {
            inbound: inbound?,
            outbound: outbound?,
        })
    }

    fn listener_policy(&mut self, value: &RawValue, path: &str) -> Option<ListenerPolicy> {
        let listener = self.expect_object(value, path)?;
        self.require_keys(listener, LISTENER_POLICY_KEYS, path);
        self.reject_unknown_keys(listener, LISTENER_POLICY_KEYS, path);

        let mode = listener
            .get("mode")
            .and_then(|v| self.policy_mode(v, &join_path(path, "mode")));
        let allow_plaintext = listener
            .get("allow_plaintext")
            .and_then(|v| self.boolean(v, &join_path(path, "allow_plaintext")));

        Some(ListenerPolicy {
            mode: mode?,
            allow_plaintext: allow_plaintext?,
        })
    }

    fn domains(&mut self, value: &RawValue, path: &str) -> Option<BTreeMap<String, DomainPolicy>> {
        let entries = self.expect_object(value, path)?;
        let mut normalizer = DomainNormalizer::new();
        let mut validated = BTreeMap::new();

        for (raw_domain, raw_policy) in entries {
            let domain_path = join_path(path, raw_domain);
            let domain = match normalizer.admit(raw_domain) {
                Ok(domain) => domain,
                Err(err @ DomainKeyError::Invalid { .. }) => {
                    self.collector.add(
                        domain_path,
                        err.to_string(),
                        Some("Use a valid DNS hostname (letters, digits, dots, hyphens).".to_string()),
                    );
                    continue;
                }
                Err(err @ DomainKeyError::Duplicate { .. }) => {
                    self.collector.add(
                        domain_path,
                        err.to_string(),
                        Some("Keep only one rule per normalized domain.".to_string()),
                    );
                    continue;
                }
            };

            if let Some(policy) = self.domain_policy(raw_policy, &domain_path) {
                trace!(domain = %domain, mode = %policy.mode, "Accepted domain policy");
                validated.insert(domain, policy);
            }
        }

        Some(validated)
    }

    fn domain_policy(&mut self, value: &RawValue, path: &str) -> Option<DomainPolicy> {
        let policy = self.expect_object(value, path)?;
        self.require_keys(policy, DOMAIN_REQUIRED, path);
        self.reject_unknown_keys(policy, DOMAIN_ALLOWED, path);

        let mismatch_path = join_path(path, "on_mismatch");
        let mode = policy
            .get("mode")
            .and_then(|v| self.policy_mode(v, &join_path(path, "mode")));
        let on_mismatch = policy
            .get("on_mismatch")
            .and_then(|v| self.mismatch_action(v, &mismatch_path));

        match mode? {
            PolicyMode::RequirePq => Some(DomainPolicy::require_pq(
                on_mismatch.unwrap_or(MismatchAction::Defer),
            )),
            _ if policy.contains_key("on_mismatch") => {
                self.collector.add(
                    mismatch_path,
                    "on_mismatch is only valid when mode is require-pq",
                    Some("Remove on_mismatch or set mode to require-pq.".to_string()),
                );
                None
            }
            mode => Some(DomainPolicy::with_mode(mode)),
        }
    }

    fn capability_hints(&mut self, value: &RawValue, path: &str) -> Option<CapabilityHints> {
        let hints = self.expect_object(value, path)?;
        self.reject_unknown_keys(hints, CAPABILITY_HINTS_ALLOWED, path);

        let dns_txt = match hints.get("dns_txt") {
            None | Some(RawValue::Null) => return Some(CapabilityHints::default()),
            Some(v) => v,
        };

        let dns_path = join_path(path, "dns_txt");
        let dns_txt = self.expect_object(dns_txt, &dns_path)?;
        self.require_keys(dns_txt, DNS_TXT_REQUIRED, &dns_path);
        self.reject_unknown_keys(dns_txt, DNS_TXT_ALLOWED, &dns_path);

        let enabled = dns_txt
            .get("enabled")
            .and_then(|v| self.boolean(v, &join_path(&dns_path, "enabled")));
        let label = match dns_txt.get("label") {
            None => Some(DEFAULT_DNS_TXT_LABEL.to_string()),
            Some(v) => self.dns_label(v, &join_path(&dns_path, "label")),
        };

        Some(CapabilityHints {
            dns_txt: Some(DnsTxtHint {
                enabled: enabled?,
                label: label?,
            }),
        })
    }

    fn policy_mode(&mut self, value: &RawValue, path: &str) -> Option<PolicyMode> {
        let modes = PolicyMode::ALL.map(PolicyMode::as_str);
        let raw = self.enum_string(value, path, "policy mode", &modes)?;

        match raw.parse::<PolicyMode>() {
            Ok(mode) => Some(mode),
            Err(()) => {
                self.collector.add(
                    path,
                    format!("unknown policy mode '{raw}'"),
                    Some(one_of_hint(raw, modes)),
                );
                None
            }
        }
    }

    fn mismatch_action(&mut self, value: &RawValue, path: &str) -> Option<MismatchAction> {
        if value.is_null() {
            return None;
        }

        let actions = MismatchAction::ALL.map(MismatchAction::as_str);
        let raw = self.enum_string(value, path, "mismatch action", &actions)?;

        match raw.parse::<MismatchAction>() {
            Ok(action) => Some(action),
            Err(()) => {
                self.collector.add(
                    path,
                    format!("unknown mismatch action '{raw}'"),
                    Some(one_of_hint(raw, actions)),
                );
                None
            }
        }
    }

    /// The string behind an enum-valued field, reporting null and non-strings.
    fn enum_string<'v>(
        &mut self,
        value: &'v RawValue,
        path: &str,
        what: &str,
        options: &[&str],
    ) -> Option<&'v str> {
        match value {
            RawValue::String(s) => Some(s.as_str()),
            RawValue::Null => {
                self.collector.add(
                    path,
                    "missing required field",
                    Some(format!("Set the field to one of: {}.", options.join(", "))),
                );
                None
            }
            other => {
                self.collector.add(
                    path,
                    format!("expected string {what}, got {}", other.type_name()),
                    Some(format!("Use a quoted string value: {}.", options.join(", "))),
                );
                None
            }
        }
    }

    fn boolean(&mut self, value: &RawValue, path: &str) -> Option<bool> {
        match value {
            RawValue::Bool(b) => Some(*b),
            RawValue::Null => {
                self.collector.add(
                    path,
                    "missing required field",
                    Some("Set the field to true or false.".to_string()),
                );
                None
            }
            other => {
                self.collector.add(
                    path,
                    format!("expected boolean, got {}", other.type_name()),
                    Some("Set the field to true or false.".to_string()),
                );
                None
            }
        }
    }

    fn dns_label(&mut self, value: &RawValue, path: &str) -> Option<String> {
        let Some(raw) = value.as_str() else {
            self.collector.add(
                path,
                format!("expected string, got {}", value.type_name()),
                Some(format!("Set label to a DNS prefix like '{DEFAULT_DNS_TXT_LABEL}'.")),
            );
            return None;
        };

        let label = raw.trim();
        if label.is_empty() {
            self.collector.add(
                path,
                "label must not be empty",
                Some(format!("Use a non-empty value such as '{DEFAULT_DNS_TXT_LABEL}'.")),
            );
            return None;
        }

        if !label.starts_with('_') {
            self.collector.add(
                path,
                "label should start with '_' for service-style TXT hints",
                Some(format!(
                    "Use '{DEFAULT_DNS_TXT_LABEL}' or another underscore-prefixed label."
                )),
            );
            return None;
        }

        Some(label.to_string())
    }

    fn expect_object<'v>(&mut self, value: &'v RawValue, path: &str) -> Option<&'v RawDocument> {
        match value {
            RawValue::Map(map) => Some(map),
            RawValue::Null => {
                self.collector.add(
                    path,
                    "missing required object",
                    Some("Provide an object at this path.".to_string()),
                );
                None
            }
            other => {
                self.collector.add(
                    path,
                    format!("expected object/map, got {}", other.type_name()),
                    Some("Use key/value object syntax.".to_string()),
                );
                None
            }
        }
    }

    fn require_keys(&mut self, object: &RawDocument, required: &[&str], path: &str) {
        let mut required = required.to_vec();
        required.sort_unstable();

        for key in required {
            if !object.contains_key(key) {
                self.collector.add(
                    join_path(path, key),
                    "missing required field",
                    Some(format!("Add '{key}' to this object.")),
                );
            }
        }
    }

    fn reject_unknown_keys(&mut self, object: &RawDocument, allowed: &[&str], path: &str) {
        if !self.strict {
            return;
        }

        let mut allowed = allowed.to_vec();
        allowed.sort_unstable();

        for key in object.keys() {
            if allowed.contains(&key.as_str()) {
                continue;
            }
            trace!(file = %self.file_path, path = %path, key = %key, "Unknown field");
            self.collector.add(
                join_path(path, key),
                format!("unknown field '{key}'"),
                Some(one_of_hint(key, allowed.iter().copied())),
            );
        }
    }
}

/// Append a segment to a field path; the root contributes nothing.
fn join_path(base: &str, child: &str) -> String {
    if base.is_empty() || base == ROOT_FIELD_PATH {
        child.to_string()
    } else {
        format!("{base}.{child}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_YAML: &str = "\
version: 1
listeners:
  inbound:
    mode: opportunistic
    allow_plaintext: false
  outbound:
    mode: opportunistic
    allow_plaintext: false
domains:
  partner.example:
    mode: require-pq
    on_mismatch: defer
  legacy.example:
    mode: require-tls
capability_hints:
  dns_txt:
    enabled: true
    label: _verzola._tcp
";

    const LISTENERS_YAML: &str = "\
version: 1
listeners:
  inbound:
    mode: opportunistic
    allow_plaintext: false
  outbound:
    mode: opportunistic
    allow_plaintext: false
";

    fn validate(text: &str) -> Result<PolicyConfig, PolicyValidationError> {
        validate_policy_text(text, "policy.yaml", &ValidateOptions::strict())
    }

    fn with_listeners(extra: &str) -> String {
        format!("{LISTENERS_YAML}{extra}")
    }

    fn paths(err: &PolicyValidationError) -> Vec<&str> {
        err.diagnostics()
            .iter()
            .map(|d| d.field_path.as_str())
            .collect()
    }

    #[test]
    fn test_valid_document() {
        let config = validate(VALID_YAML).unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.listeners.inbound.mode, PolicyMode::Opportunistic);
        assert!(!config.listeners.outbound.allow_plaintext);
        assert_eq!(
            config.domains.keys().collect::<Vec<_>>(),
            vec!["legacy.example", "partner.example"]
        );
        assert_eq!(
            config.domains["partner.example"],
            DomainPolicy::require_pq(MismatchAction::Defer)
        );
        assert_eq!(config.domains["legacy.example"].on_mismatch, None);
        let hint = config.capability_hints.dns_txt.unwrap();
        assert!(hint.enabled);
        assert_eq!(hint.label, "_verzola._tcp");
    }

    #[test]
    fn test_optional_sections_default() {
        let config = validate(LISTENERS_YAML).unwrap();

        assert!(config.domains.is_empty());
        assert_eq!(config.capability_hints, CapabilityHints::default());
    }

    #[test]
    fn test_missing_required_root_keys() {
        let err = validate("domains:\n").unwrap_err();

        assert_eq!(paths(&err), vec!["listeners", "version"]);
        assert!(err.diagnostics().iter().all(|d| d.message == "missing required field"));
    }

    #[test]
    fn test_bad_version_and_missing_listeners_reported_together() {
        let err = validate("version: 7\n").unwrap_err();

        assert_eq!(err.len(), 2);
        assert_eq!(paths(&err), vec!["listeners", "version"]);
        assert_eq!(
            err.diagnostics()
                .iter()
                .filter(|d| d.message.contains("unsupported schema version '7'"))
                .count(),
            1
        );
    }

    #[test]
    fn test_oversized_version_does_not_hide_other_errors() {
        let text = LISTENERS_YAML
            .replace("version: 1", "version: 99999999999999999999")
            .replacen("allow_plaintext: false", "allow_plaintext: 3", 1);
        let err = validate(&text).unwrap_err();

        assert_eq!(paths(&err), vec!["version", "listeners.inbound.allow_plaintext"]);
        assert_eq!(
            err.diagnostics()[0].message,
            "unsupported schema version '99999999999999999999'"
        );
        assert_eq!(err.diagnostics()[1].message, "expected boolean, got integer");
    }

    #[test]
    fn test_lone_quote_mode_is_an_unknown_mode() {
        let text = LISTENERS_YAML.replacen("mode: opportunistic", "mode: \"", 1);
        let err = validate(&text).unwrap_err();

        assert_eq!(err.len(), 1);
        assert_eq!(err.diagnostics()[0].field_path, "listeners.inbound.mode");
        assert_eq!(err.diagnostics()[0].message, "unknown policy mode '\"'");
    }

    #[test]
    fn test_boolean_version_is_not_an_integer() {
        let err = validate(&LISTENERS_YAML.replace("version: 1", "version: true")).unwrap_err();

        assert_eq!(err.len(), 1);
        assert_eq!(err.diagnostics()[0].message, "expected integer version, got boolean");
    }

    #[test]
    fn test_null_version() {
        let err = validate(&LISTENERS_YAML.replace("version: 1", "version: ~")).unwrap_err();
        assert_eq!(err.diagnostics()[0].field_path, "version");
        assert_eq!(err.diagnostics()[0].message, "missing required field");
    }

    #[test]
    fn test_strict_unknown_field_suggests_closest() {
        let text = LISTENERS_YAML.replacen("allow_plaintext", "allow_plaintxt", 1);
        let err = validate(&text).unwrap_err();

        let unknown = err
            .diagnostics()
            .iter()
            .find(|d| d.field_path == "listeners.inbound.allow_plaintxt")
            .unwrap();
        assert_eq!(unknown.message, "unknown field 'allow_plaintxt'");
        let suggestion = unknown.suggestion.as_deref().unwrap();
        assert!(suggestion.contains("Closest match: 'allow_plaintext'"));
        assert!(suggestion.contains("Use one of: allow_plaintext, mode."));

        // the real key is still missing
        assert!(paths(&err).contains(&"listeners.inbound.allow_plaintext"));
    }

    #[test]
    fn test_lenient_mode_ignores_unknown_fields() {
        let text = with_listeners("extra: 1\n");

        assert!(validate(&text).is_err());
        assert!(validate_policy_text(&text, "policy.yaml", &ValidateOptions::lenient()).is_ok());
    }

    #[test]
    fn test_unknown_root_field_without_close_match() {
        let err = validate(&with_listeners("zzz: 1\n")).unwrap_err();
        let diagnostic = &err.diagnostics()[0];

        assert_eq!(diagnostic.field_path, "zzz");
        assert_eq!(
            diagnostic.suggestion.as_deref(),
            Some("Use one of: capability_hints, domains, listeners, version.")
        );
    }

    #[test]
    fn test_unknown_keys_reported_in_sorted_order() {
        let err = validate(&with_listeners("zeta: 1\nalpha: 2\n")).unwrap_err();
        assert_eq!(paths(&err), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_unknown_policy_mode() {
        let text = LISTENERS_YAML.replacen("mode: opportunistic", "mode: opportunstic", 1);
        let err = validate(&text).unwrap_err();

        assert_eq!(err.len(), 1);
        let diagnostic = &err.diagnostics()[0];
        assert_eq!(diagnostic.field_path, "listeners.inbound.mode");
        assert_eq!(diagnostic.message, "unknown policy mode 'opportunstic'");
        assert_eq!(
            diagnostic.suggestion.as_deref(),
            Some("Use one of: opportunistic, require-tls, require-pq. Closest match: 'opportunistic'.")
        );
    }

    #[test]
    fn test_non_string_mode() {
        let text = LISTENERS_YAML.replacen("mode: opportunistic", "mode: 3", 1);
        let err = validate(&text).unwrap_err();
        assert_eq!(err.diagnostics()[0].message, "expected string policy mode, got integer");
    }

    #[test]
    fn test_allow_plaintext_must_be_boolean() {
        let text = LISTENERS_YAML.replacen("allow_plaintext: false", "allow_plaintext: \"yes\"", 1);
        let err = validate(&text).unwrap_err();

        assert_eq!(err.diagnostics()[0].field_path, "listeners.inbound.allow_plaintext");
        assert_eq!(err.diagnostics()[0].message, "expected boolean, got string");
    }

    #[test]
    fn test_listeners_not_an_object() {
        let err = validate("version: 1\nlisteners: 5\n").unwrap_err();

        assert_eq!(err.len(), 1);
        assert_eq!(err.diagnostics()[0].field_path, "listeners");
        assert_eq!(err.diagnostics()[0].message, "expected object/map, got integer");
    }

    #[test]
    fn test_null_listeners() {
        let err = validate("version: 1\nlisteners: null\n").unwrap_err();
        assert_eq!(err.diagnostics()[0].message, "missing required object");
    }

    #[test]
    fn test_errors_in_both_listeners_collected() {
        let text = "version: 1\nlisteners:\n  inbound:\n    mode: nope\n    allow_plaintext: 1\n  outbound: x\n";
        let err = validate(text).unwrap_err();

        assert_eq!(
            paths(&err),
            vec![
                "listeners.inbound.mode",
                "listeners.inbound.allow_plaintext",
                "listeners.outbound",
            ]
        );
    }

    #[test]
    fn test_require_pq_defaults_to_defer() {
        let config = validate(&with_listeners("domains:\n  pq.example:\n    mode: require-pq\n")).unwrap();
        assert_eq!(
            config.domains["pq.example"].on_mismatch,
            Some(MismatchAction::Defer)
        );
    }

    #[test]
    fn test_require_pq_keeps_explicit_reject() {
        let config = validate(&with_listeners(
            "domains:\n  pq.example:\n    mode: require-pq\n    on_mismatch: reject\n",
        ))
        .unwrap();
        assert_eq!(
            config.domains["pq.example"].on_mismatch,
            Some(MismatchAction::Reject)
        );
    }

    #[test]
    fn test_on_mismatch_rejected_outside_require_pq() {
        for mode in ["opportunistic", "require-tls"] {
            let text = with_listeners(&format!(
                "domains:\n  legacy.example:\n    mode: {mode}\n    on_mismatch: defer\n"
            ));
            let err = validate(&text).unwrap_err();

            assert_eq!(err.len(), 1);
            assert_eq!(err.diagnostics()[0].field_path, "domains.legacy.example.on_mismatch");
            assert_eq!(
                err.diagnostics()[0].message,
                "on_mismatch is only valid when mode is require-pq"
            );
        }
    }

    #[test]
    fn test_unknown_mismatch_action() {
        let err = validate(&with_listeners(
            "domains:\n  pq.example:\n    mode: require-pq\n    on_mismatch: rejct\n",
        ))
        .unwrap_err();

        assert_eq!(err.diagnostics()[0].message, "unknown mismatch action 'rejct'");
        assert!(
            err.diagnostics()[0]
                .suggestion
                .as_deref()
                .unwrap()
                .contains("Closest match: 'reject'")
        );
    }

    #[test]
    fn test_domain_duplicates_after_normalization() {
        let err = validate(&with_listeners(
            "domains:\n  Example.COM:\n    mode: require-tls\n  example.com:\n    mode: require-tls\n",
        ))
        .unwrap_err();

        assert_eq!(err.len(), 1);
        let diagnostic = &err.diagnostics()[0];
        assert!(diagnostic.message.starts_with("duplicate domain policy after normalization"));
        assert_eq!(diagnostic.field_path, "domains.example.com");
        assert!(diagnostic.message.contains("conflicts with 'Example.COM'"));
    }

    #[test]
    fn test_duplicate_reported_on_sorted_later_key() {
        let err = validate(&with_listeners(
            "domains:\n  example.com:\n    mode: require-tls\n  Example.COM:\n    mode: require-tls\n",
        ))
        .unwrap_err();

        assert_eq!(paths(&err), vec!["domains.example.com"]);
        assert!(err.diagnostics()[0].message.contains("conflicts with 'Example.COM'"));
    }

    #[test]
    fn test_invalid_domain_key_is_skipped() {
        let err = validate(&with_listeners(
            "domains:\n  bad_domain:\n    mode: require-tls\n  good.example:\n    mode: wrong\n",
        ))
        .unwrap_err();

        assert_eq!(paths(&err), vec!["domains.bad_domain", "domains.good.example.mode"]);
        assert_eq!(err.diagnostics()[0].message, "invalid domain key 'bad_domain'");
    }

    #[test]
    fn test_domain_keys_are_normalized_and_sorted() {
        let config = validate(&with_listeners(
            "domains:\n  Zeta.Example.:\n    mode: require-tls\n  alpha.example:\n    mode: opportunistic\n",
        ))
        .unwrap();

        assert_eq!(
            config.domains.keys().collect::<Vec<_>>(),
            vec!["alpha.example", "zeta.example"]
        );
    }

    #[test]
    fn test_domain_unknown_field() {
        let err = validate(&with_listeners(
            "domains:\n  a.example:\n    mode: require-tls\n    on_mismatc: defer\n",
        ))
        .unwrap_err();

        assert_eq!(err.diagnostics()[0].field_path, "domains.a.example.on_mismatc");
        assert!(
            err.diagnostics()[0]
                .suggestion
                .as_deref()
                .unwrap()
                .contains("Closest match: 'on_mismatch'")
        );
    }

    #[test]
    fn test_dns_txt_label_defaults() {
        let config = validate(&with_listeners("capability_hints:\n  dns_txt:\n    enabled: false\n")).unwrap();

        assert_eq!(
            config.capability_hints.dns_txt,
            Some(DnsTxtHint {
                enabled: false,
                label: DEFAULT_DNS_TXT_LABEL.to_string(),
            })
        );
    }

    #[test]
    fn test_dns_txt_absent_or_null_is_no_hint() {
        let empty = validate(&with_listeners("capability_hints:\n")).unwrap();
        assert_eq!(empty.capability_hints.dns_txt, None);

        let null = validate(&with_listeners("capability_hints:\n  dns_txt: null\n")).unwrap();
        assert_eq!(null.capability_hints.dns_txt, None);
    }

    #[test]
    fn test_dns_txt_label_rules() {
        let cases = [
            ("label: verzola", "label should start with '_' for service-style TXT hints"),
            ("label: \"  \"", "label must not be empty"),
            ("label: 5", "expected string, got integer"),
        ];
        for (line, message) in cases {
            let text = with_listeners(&format!(
                "capability_hints:\n  dns_txt:\n    enabled: true\n    {line}\n"
            ));
            let err = validate(&text).unwrap_err();

            assert_eq!(err.len(), 1, "{line}");
            assert_eq!(err.diagnostics()[0].field_path, "capability_hints.dns_txt.label");
            assert_eq!(err.diagnostics()[0].message, message);
            assert!(err.diagnostics()[0].suggestion.is_some());
        }
    }

    #[test]
    fn test_dns_txt_missing_enabled() {
        let err = validate(&with_listeners("capability_hints:\n  dns_txt:\n    label: _x\n")).unwrap_err();

        assert_eq!(paths(&err), vec!["capability_hints.dns_txt.enabled"]);
    }

    #[test]
    fn test_sections_report_in_fixed_order() {
        let text = "\
capability_hints:
  dns_txt:
    enabled: maybe
domains:
  -bad-:
    mode: require-tls
listeners:
  inbound: 1
  outbound: 2
version: two
";
        let err = validate(text).unwrap_err();

        assert_eq!(
            paths(&err),
            vec![
                "version",
                "listeners.inbound",
                "listeners.outbound",
                "domains.-bad-",
                "capability_hints.dns_txt.enabled",
            ]
        );
    }

    #[test]
    fn test_parse_error_becomes_single_diagnostic() {
        let err = validate("version: 1\nlisteners\n").unwrap_err();

        assert_eq!(err.len(), 1);
        assert_eq!(err.diagnostics()[0].field_path, "<parse>:line:2");
        assert!(err.to_string().contains("invalid YAML syntax"));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(ROOT_FIELD_PATH, "version"), "version");
        assert_eq!(join_path("", "version"), "version");
        assert_eq!(join_path("listeners", "inbound"), "listeners.inbound");
    }
}
