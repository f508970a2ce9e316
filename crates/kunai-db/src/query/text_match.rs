//! Text-match literal preparation for SQL comparisons.
//!
//! Caseless comparisons upper-case both sides: the column through SQL
//! `UPPER()`, the literal here one character at a time so both sides
//! keep the same length.

use icu::casemap::CaseMapper;
use kunai_rfc::rfc::dav::core::{MatchType, TextMatch};

/// ## Summary
/// Upper-cases text for comparison against `UPPER(column)`.
///
/// Uses the simple one-to-one Unicode mapping, as `PostgreSQL` does under a
/// libc collation:
/// - German `ß` has no single-character uppercase and stays `ß`
/// - Greek `ς` and `σ` both become `Σ`
///
/// Databases using an ICU collation expand `ß` to `SS` in `UPPER()`, so
/// caseless matches on `ß` miss there.
#[must_use]
pub fn normalize_for_sql_upper(text: &str) -> String {
    let mapper = CaseMapper::new();
    text.chars().map(|c| mapper.simple_uppercase(c)).collect()
}

/// ## Summary
/// Escapes special SQL LIKE pattern characters.
///
/// Escapes `%`, `_`, and `\` so they match literally.
#[must_use]
pub fn escape_like_pattern(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' | '_' | '\\' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

/// ## Summary
/// Builds a SQL LIKE pattern based on match type.
#[must_use]
pub fn build_like_pattern(value: &str, match_type: MatchType) -> String {
    let escaped = escape_like_pattern(value);
    match match_type {
        MatchType::Contains => format!("%{escaped}%"),
        MatchType::Equals => escaped,
        MatchType::StartsWith => format!("{escaped}%"),
        MatchType::EndsWith => format!("%{escaped}"),
    }
}

/// ## Summary
/// The literal bound for a text-match: upper-cased when caseless, wrapped in
/// wildcards unless the match is `equals`.
#[must_use]
pub fn bound_literal(text_match: &TextMatch) -> String {
    let value = if text_match.caseless {
        normalize_for_sql_upper(&text_match.value)
    } else {
        text_match.value.clone()
    };

    match text_match.match_type {
        MatchType::Equals => value,
        other => build_like_pattern(&value, other),
    }
}

/// ## Summary
/// Comparison operator for a text-match, honoring negation.
#[must_use]
pub const fn comparison_operator(text_match: &TextMatch) -> &'static str {
    match (text_match.match_type, text_match.negate) {
        (MatchType::Equals, false) => "=",
        (MatchType::Equals, true) => "<>",
        (_, false) => "LIKE",
        (_, true) => "NOT LIKE",
    }
}
