//! Timestamp rendering for `$[time||stamp]` tokens

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use tracing::warn;

use crate::TIME_FORMAT_ERROR;

/// Render `now` according to a timestamp format string.
///
/// The reserved keywords `epoch`, `epochmilli` and `epochnano` render unix
/// time at the respective resolution; any other non-empty string is treated
/// as a strftime pattern and rendered in local time. An invalid pattern
/// yields the [`TIME_FORMAT_ERROR`] sentinel rather than failing the line.
pub fn format_timestamp(now: DateTime<Utc>, time_format: &str) -> String {
    match time_format {
        "epoch" => now.timestamp().to_string(),
        "epochmilli" => now.timestamp_millis().to_string(),
        "epochnano" => match now.timestamp_nanos_opt() {
            Some(nanos) => nanos.to_string(),
            None => {
                warn!("timestamp out of nanosecond range");
                TIME_FORMAT_ERROR.to_string()
            }
        },
        pattern => {
            let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
            if items.iter().any(|item| matches!(item, Item::Error)) {
                warn!(pattern, "unrecognized strftime pattern");
                return TIME_FORMAT_ERROR.to_string();
            }
            now.with_timezone(&Local)
                .format_with_items(items.iter())
                .to_string()
        }
    }
}
