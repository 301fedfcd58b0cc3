//! Token classification and per-token resolution

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, warn};

use crate::timestamp::format_timestamp;
use crate::TOKEN_ERROR;

/// Fixed item separator inside a token body
pub const TOKEN_SEPARATOR: &str = "||";

/// A classified template token
#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    /// Uniform choice among literal alternatives
    Category(Vec<&'a str>),
    /// Uniform integer in `[low, high)`
    Range { low: i64, high: i64 },
    /// Current time rendered per the line's timestamp format
    Timestamp,
}

/// Classify a token body (the text between `$[` and `]`)
///
/// Numeric range wins only when both of exactly two items parse as
/// integers; timestamp only for the exact `time`,`stamp` pair; everything
/// else is a category, single items included.
fn classify(body: &str) -> Token<'_> {
    let items: Vec<&str> = body.split(TOKEN_SEPARATOR).collect();

    if items.len() == 2 {
        if let (Ok(low), Ok(high)) = (items[0].parse::<i64>(), items[1].parse::<i64>()) {
            return Token::Range { low, high };
        }
        if items[0] == "time" && items[1] == "stamp" {
            return Token::Timestamp;
        }
    }

    Token::Category(items)
}

/// Resolve one token body to its substitution value
pub(crate) fn resolve_one(body: &str, time_format: &str, now: DateTime<Utc>) -> String {
    let token = classify(body);
    debug!(body, token = ?token, "classified token");

    let mut rng = rand::rng();
    match token {
        Token::Category(items) => {
            let pick = items[rng.random_range(0..items.len())];
            pick.to_string()
        }
        Token::Range { low, high } => {
            if high <= low {
                // Inverted or empty range is an invalid specification;
                // substitute the sentinel instead of wrapping silently.
                warn!(low, high, "numeric range upper bound must exceed lower bound");
                return TOKEN_ERROR.to_string();
            }
            rng.random_range(low..high).to_string()
        }
        Token::Timestamp => format_timestamp(now, time_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numeric_range() {
        assert_eq!(classify("1||10"), Token::Range { low: 1, high: 10 });
        assert_eq!(classify("-5||5"), Token::Range { low: -5, high: 5 });
    }

    #[test]
    fn test_classify_timestamp_exact_pair_only() {
        assert_eq!(classify("time||stamp"), Token::Timestamp);
        assert_eq!(
            classify("stamp||time"),
            Token::Category(vec!["stamp", "time"])
        );
    }

    #[test]
    fn test_classify_mixed_items_are_category() {
        // One number plus one word is not a range
        assert_eq!(classify("1||b"), Token::Category(vec!["1", "b"]));
        // Three numbers are not a range either
        assert_eq!(
            classify("1||2||3"),
            Token::Category(vec!["1", "2", "3"])
        );
    }

    #[test]
    fn test_classify_single_item_category() {
        assert_eq!(classify("solo"), Token::Category(vec!["solo"]));
    }
}
