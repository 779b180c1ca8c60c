//! Scalar coercion for the YAML subset.
//!
//! Precedence, first match wins:
//!
//! 1. `true` / `false` (any case) -> boolean
//! 2. `null` / `~` (any case) -> null
//! 3. optional sign followed by ASCII digits -> integer
//! 4. token of two or more characters wrapped in matching `'` or `"` -> string
//!    without the quotes
//! 5. anything else -> the token verbatim
//!
//! Integers that do not fit in an `i64` are kept as
//! [`RawValue::OversizedInteger`] so the validator can report them alongside
//! everything else. No escape sequences are processed inside quotes.

use super::error::ScalarError;
use crate::policy::RawValue;

/// Coerce a trimmed, non-empty value token.
pub fn coerce_scalar(token: &str) -> Result<RawValue, ScalarError> {
    let lowered = token.to_ascii_lowercase();
    match lowered.as_str() {
        "true" => return Ok(RawValue::Bool(true)),
        "false" => return Ok(RawValue::Bool(false)),
        "null" | "~" => return Ok(RawValue::Null),
        _ => {}
    }

    if is_integer_token(token) {
        return Ok(token
            .parse::<i64>()
            .map(RawValue::Integer)
            .unwrap_or_else(|_| RawValue::OversizedInteger(canonical_digits(token))));
    }

    if let Some(quote) = token.chars().next().filter(|c| *c == '\'' || *c == '"')
        && token.len() >= 2
    {
        return match token[1..].strip_suffix(quote) {
            Some(inner) => Ok(RawValue::String(inner.to_string())),
            None => Err(ScalarError::UnclosedQuote),
        };
    }

    Ok(RawValue::String(token.to_string()))
}

fn is_integer_token(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `+007` -> `7`, `-0012` -> `-12`.
fn canonical_digits(token: &str) -> String {
    let (sign, digits) = match token.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", token.strip_prefix('+').unwrap_or(token)),
    };
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        format!("{sign}{trimmed}")
    }
}
