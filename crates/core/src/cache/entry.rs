//! Entry envelope shared by every cache store.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A cached payload together with its store bookkeeping.
///
/// `key` is unique within its store. `category` partitions entries and is
/// part of the lookup predicate, so many entries may share one category.
/// `cached_at` is informational: stores never expire entries on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub key: String,
    pub payload: T,
    pub cached_at: DateTime<Utc>,
    pub category: String,
}

impl<T> CacheEntry<T> {
    /// Whether the entry was written more than `max_age` ago.
    ///
    /// Helper for caller-side refresh policies.
    pub fn is_older_than(&self, max_age: chrono::Duration) -> bool {
        Utc::now() - self.cached_at > max_age
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Normalize a category for storage and lookup: trimmed, uppercase.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_uppercase()
}

/// Case-insensitive substring match used for in-memory text filtering.
pub fn matches_filter(haystack: &str, filter: Option<&str>) -> bool {
    match filter.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::InvalidPayload(format!("bad cached_at '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category(" b1 "), "B1");
        assert_eq!(normalize_category("C2"), "C2");
    }

    #[test]
    fn test_matches_filter() {
        assert!(matches_filter("Describe Your Hometown", Some("hometown")));
        assert!(matches_filter("Describe Your Hometown", None));
        assert!(matches_filter("Describe Your Hometown", Some("  ")));
        assert!(!matches_filter("Describe Your Hometown", Some("essay")));
    }

    #[test]
    fn test_timestamp_round_trip() {
        let raw = now_timestamp();
        let parsed = parse_timestamp(&raw).unwrap();
        assert_eq!(parsed.to_rfc3339_opts(SecondsFormat::Micros, true), raw);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_is_older_than() {
        let entry = CacheEntry {
            key: "a".into(),
            payload: (),
            cached_at: Utc::now() - chrono::Duration::hours(2),
            category: "B1".into(),
        };
        assert!(entry.is_older_than(chrono::Duration::hours(1)));
        assert!(!entry.is_older_than(chrono::Duration::hours(3)));
    }
}
