//! Closest-match suggestions for misspelled field names and enum values.

/// Minimum normalized similarity for a candidate to be suggested.
pub const SUGGESTION_CUTOFF: f64 = 0.6;

/// Best option for `candidate`, if any scores at least [`SUGGESTION_CUTOFF`].
///
/// Similarity is normalized Levenshtein distance, case-sensitive. Ties go to
/// the option listed first.
#[must_use]
pub fn best_match<'a, I>(candidate: &str, options: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for option in options {
        let score = strsim::normalized_levenshtein(candidate, option);
        if score < SUGGESTION_CUTOFF {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((option, score));
        }
    }
    best.map(|(option, _)| option)
}

/// `Use one of: a, b, c.` plus a closest-match clause when one exists.
#[must_use]
pub fn one_of_hint<'a, I>(candidate: &str, options: I) -> String
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let listed = options.clone().into_iter().collect::<Vec<_>>().join(", ");
    match best_match(candidate, options) {
        Some(closest) => format!("Use one of: {listed}. Closest match: '{closest}'."),
        None => format!("Use one of: {listed}."),
    }
}
