//! Duration parsing, bucket membership, and display formatting.
//!
//! Durations are handled as whole minutes. The host page displays `MM:SS` or
//! `HH:MM:SS`; seconds are discarded on parse, so this is a lossy measure
//! and totals always render with `:00` seconds.

use crate::config::DurationBucket;

/// Parse a displayed duration into whole minutes.
///
/// `MM:SS` yields `MM`; `HH:MM:SS` yields `HH * 60 + MM`; anything else is
/// unparseable and yields `None`. Seconds are discarded.
pub fn parse_duration(text: &str) -> Option<u32> {
    let mut parts = [0u32; 3];
    let mut count = 0;

    for token in text.trim().split(':') {
        if count == 3 {
            return None;
        }
        parts[count] = token.trim().parse().ok()?;
        count += 1;
    }

    match count {
        2 => Some(parts[0]),
        3 => Some(parts[0] * 60 + parts[1]),
        _ => None,
    }
}

/// Bucket membership: `min <= d` and (`max` absent or `d < max`).
///
/// An item with an unparseable or absent duration matches every bucket — it
/// is never excluded on duration grounds.
pub fn in_bucket(duration: Option<u32>, bucket: &DurationBucket) -> bool {
    let Some(d) = duration else {
        return true;
    };
    if let Some(min) = bucket.min {
        if d < min {
            return false;
        }
    }
    if let Some(max) = bucket.max {
        if d >= max {
            return false;
        }
    }
    true
}

/// Format a total in minutes back into the page's display shape:
/// `H:MM:SS` when at least an hour, `M:SS` otherwise.
pub fn format_minutes(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{}:{:02}:00", hours, minutes)
    } else {
        format!("{}:00", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_seconds() {
        assert_eq!(parse_duration("5:30"), Some(5));
        assert_eq!(parse_duration("0:45"), Some(0));
        assert_eq!(parse_duration(" 12:01 "), Some(12));
    }

    #[test]
    fn parses_hours_minutes_seconds() {
        assert_eq!(parse_duration("1:02:03"), Some(62));
        assert_eq!(parse_duration("10:00:00"), Some(600));
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("90"), None);
        assert_eq!(parse_duration("1:2:3:4"), None);
        assert_eq!(parse_duration("1:xx"), None);
    }

    #[test]
    fn bucket_bounds_are_min_inclusive_max_exclusive() {
        let bucket = DurationBucket {
            min: Some(10),
            max: Some(20),
        };
        assert!(!in_bucket(Some(9), &bucket));
        assert!(in_bucket(Some(10), &bucket));
        assert!(in_bucket(Some(19), &bucket));
        assert!(!in_bucket(Some(20), &bucket));
    }

    #[test]
    fn open_ended_buckets() {
        let no_min = DurationBucket {
            min: None,
            max: Some(10),
        };
        assert!(in_bucket(Some(0), &no_min));
        assert!(!in_bucket(Some(10), &no_min));

        let no_max = DurationBucket {
            min: Some(60),
            max: None,
        };
        assert!(in_bucket(Some(600), &no_max));
        assert!(!in_bucket(Some(59), &no_max));
    }

    #[test]
    fn unparseable_duration_matches_every_bucket() {
        let bucket = DurationBucket {
            min: Some(10),
            max: Some(20),
        };
        assert!(in_bucket(None, &bucket));
    }

    #[test]
    fn formats_back_to_display_shape() {
        assert_eq!(format_minutes(5), "5:00");
        assert_eq!(format_minutes(0), "0:00");
        assert_eq!(format_minutes(62), "1:02:00");
        assert_eq!(format_minutes(600), "10:00:00");
    }
}
