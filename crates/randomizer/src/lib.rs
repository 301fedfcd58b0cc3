//! # Randomizer
//!
//! Template token resolution module.
//!
//! Responsibilities:
//! - Scan line templates for `$[...]` tokens
//! - Classify each token (numeric range / timestamp / category)
//! - Substitute an independently randomized value per token
//!
//! ## Token grammar
//!
//! A token is `$[` item (`||` item)* `]`, items free of `]`. Classification
//! precedence:
//!
//! 1. **Numeric range** - exactly two items, both integer-parseable:
//!    resolves to a uniform integer in `[low, high)`. The upper bound is
//!    *exclusive* - this asymmetry is load-bearing for existing data files
//!    and is kept as-is, not a defect to fix.
//! 2. **Timestamp** - the exact two-item pair `time`,`stamp`: resolves to
//!    the current time rendered per the line's timestamp format (`epoch`,
//!    `epochmilli`, `epochnano`, or a strftime pattern).
//! 3. **Category** - everything else, including single-item lists: one item
//!    chosen uniformly at random.
//!
//! Unresolvable tokens substitute the [`TOKEN_ERROR`] sentinel, bad
//! timestamp formats substitute [`TIME_FORMAT_ERROR`]; neither aborts the
//! enclosing line.

mod timestamp;
mod token;

pub use timestamp::format_timestamp;
pub use token::TOKEN_SEPARATOR;

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

/// Sentinel substituted for a token that cannot be resolved
pub const TOKEN_ERROR: &str = "TOKEN_ERROR";

/// Sentinel substituted for an invalid timestamp format
pub const TIME_FORMAT_ERROR: &str = "TIME_FORMAT_ERROR";

/// Matches one non-greedy `$[...]` token marker
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\[[^\]]+\]").expect("token regex is valid"));

/// Resolve all tokens in `text` against the current wall clock.
///
/// Identity on token-free input; no randomness is consumed in that case.
pub fn resolve(text: &str, time_format: &str) -> String {
    resolve_at(text, time_format, Utc::now())
}

/// Resolve all tokens in `text` using `now` as the timestamp context.
///
/// Each token is classified and resolved independently, left to right; the
/// output interleaves the literal segments between markers with the
/// resolved values.
pub fn resolve_at(text: &str, time_format: &str, now: DateTime<Utc>) -> String {
    if !TOKEN_RE.is_match(text) {
        debug!(text, "no random tokens found, returning original string");
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for marker in TOKEN_RE.find_iter(text) {
        out.push_str(&text[last..marker.start()]);

        // Strip the `$[` / `]` framing before classification
        let body = &text[marker.start() + 2..marker.end() - 1];
        out.push_str(&token::resolve_one(body, time_format, now));

        last = marker.end();
    }
    out.push_str(&text[last..]);

    debug!(resolved = %out, "randomization complete");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_on_token_free_input() {
        let text = "no tokens here";
        assert_eq!(resolve(text, "epoch"), text);
        assert_eq!(resolve(text, "%Y-%m-%d"), text);
        assert_eq!(resolve("", "epoch"), "");
    }

    #[test]
    fn test_category_membership_and_coverage() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let value = resolve("$[a||b||c]", "epoch");
            assert!(
                ["a", "b", "c"].contains(&value.as_str()),
                "unexpected value {value}"
            );
            seen.insert(value);
        }
        // Distribution sanity: over 1000 trials all three alternatives appear
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_single_item_category_is_constant() {
        for _ in 0..20 {
            assert_eq!(resolve("$[only]", "epoch"), "only");
        }
    }

    #[test]
    fn test_numeric_range_half_open() {
        for _ in 0..1000 {
            let value: i64 = resolve("$[10||13]", "epoch").parse().unwrap();
            assert!((10..13).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn test_numeric_range_width_one() {
        // [5, 6) has a single inhabitant
        for _ in 0..20 {
            assert_eq!(resolve("$[5||6]", "epoch"), "5");
        }
    }

    #[test]
    fn test_numeric_range_inverted_bounds_is_token_error() {
        assert_eq!(resolve("$[9||3]", "epoch"), TOKEN_ERROR);
        assert_eq!(resolve("$[7||7]", "epoch"), TOKEN_ERROR);
    }

    #[test]
    fn test_timestamp_epoch_matches_now() {
        let before = Utc::now().timestamp();
        let value: i64 = resolve("$[time||stamp]", "epoch").parse().unwrap();
        let after = Utc::now().timestamp();
        assert!(value >= before - 1 && value <= after + 1);
    }

    #[test]
    fn test_timestamp_pattern_uses_supplied_now() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T12:30:45Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(resolve_at("$[time||stamp]", "epoch", now), "1709296245");
        assert_eq!(
            resolve_at("$[time||stamp]", "epochmilli", now),
            "1709296245000"
        );
    }

    #[test]
    fn test_invalid_time_format_yields_sentinel() {
        let value = resolve("$[time||stamp]", "%Q-nonsense");
        assert_eq!(value, TIME_FORMAT_ERROR);
    }

    #[test]
    fn test_literals_are_preserved_around_tokens() {
        let out = resolve("start $[x] middle $[1||2] end", "epoch");
        assert!(out.starts_with("start x middle "));
        assert!(out.ends_with(" end"));
        assert_eq!(out, "start x middle 1 end");
    }

    #[test]
    fn test_tokens_resolve_independently() {
        // Two identical ranges must not share one draw
        let mut differed = false;
        for _ in 0..200 {
            let out = resolve("$[0||1000]-$[0||1000]", "epoch");
            let (a, b) = out.split_once('-').unwrap();
            if a != b {
                differed = true;
                break;
            }
        }
        assert!(differed, "paired tokens always matched; shared draw?");
    }

    #[test]
    fn test_time_stamp_pair_requires_exact_shape() {
        // Three items fall through to category
        let value = resolve("$[time||stamp||extra]", "epoch");
        assert!(["time", "stamp", "extra"].contains(&value.as_str()));
    }
}
