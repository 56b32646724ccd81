//! Aggregate statistics over attendance events.
//!
//! Computes four independent frequency tables: by year label, by city, by
//! month, and by venue. City and venue are derived from the `location`
//! field's whitespace layout; month from the fixed `YYYY-MM-DD` position in
//! `date`. Fields that don't match the expected layout are counted in an
//! explicit malformed bucket per tally instead of being dropped or keyed
//! under a bogus value.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::event::Event;

/// City and venue derived from a `location` field.
///
/// The first whitespace token is the city; the remaining tokens, joined by
/// single spaces, are the venue. Fewer than two tokens leave the venue
/// absent; an empty location leaves both absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locale {
    /// First whitespace token of the location.
    pub city: Option<String>,
    /// Remainder of the location after the first token.
    pub venue: Option<String>,
}

impl Locale {
    /// Parse a location string into city and venue.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let mut tokens = location.split_whitespace();
        let city = tokens.next().map(ToString::to_string);
        let rest: Vec<&str> = tokens.collect();
        let venue = if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        };
        Self { city, venue }
    }
}

/// Extract the month (`MM`) from a `YYYY-MM-DD`-shaped date.
///
/// Returns `None` if the date does not match that layout.
#[must_use]
pub fn month_of(date: &str) -> Option<&str> {
    let bytes = date.as_bytes();
    if bytes.len() < 7 {
        return None;
    }
    if !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
        return None;
    }
    if !bytes[5..7].iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 7 && bytes[7] != b'-' {
        return None;
    }
    Some(&date[5..7])
}

/// A frequency table with an explicit malformed bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Occurrence count per key, sorted by key.
    pub counts: BTreeMap<String, u64>,
    /// Number of records whose field didn't yield a usable key.
    pub malformed: u64,
}

impl Tally {
    /// Count one occurrence of the given key, or one malformed record.
    pub fn bump(&mut self, key: Option<&str>) {
        match key {
            Some(key) if !key.is_empty() => {
                *self.counts.entry(key.to_string()).or_insert(0) += 1;
            }
            _ => self.malformed += 1,
        }
    }

    /// Get the count for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Check whether the tally has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.malformed == 0
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, count) in &self.counts {
            writeln!(f, "  {key}: {count}")?;
        }
        if self.malformed > 0 {
            writeln!(f, "  (malformed): {}", self.malformed)?;
        }
        Ok(())
    }
}

/// The four independent frequency tables over the full record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    /// Count per verbatim year label.
    pub by_year: Tally,
    /// Count per city (first location token).
    pub by_city: Tally,
    /// Count per month (`MM` slice of the date).
    pub by_month: Tally,
    /// Count per venue (location remainder after the first token).
    pub by_venue: Tally,
}

impl StatsReport {
    /// Compute the report over the given events.
    #[must_use]
    pub fn from_events(events: &[Event]) -> Self {
        let mut report = Self::default();
        for event in events {
            report.by_year.bump(Some(&event.year));

            let locale = Locale::parse(&event.location);
            report.by_city.bump(locale.city.as_deref());
            report.by_venue.bump(locale.venue.as_deref());

            report.by_month.bump(month_of(&event.date));
        }
        report
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Years:\n{}Cities:\n{}Months:\n{}Venues:\n{}",
            self.by_year, self.by_city, self.by_month, self.by_venue
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(year: &str, date: &str, location: &str) -> Event {
        Event {
            id: 0,
            year: year.to_string(),
            date: date.to_string(),
            location: location.to_string(),
            remarks: None,
            band_photo: None,
            live_photo: None,
            video: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_locale_parse_two_tokens() {
        let locale = Locale::parse("Beijing Livehouse");
        assert_eq!(locale.city.as_deref(), Some("Beijing"));
        assert_eq!(locale.venue.as_deref(), Some("Livehouse"));
    }

    #[test]
    fn test_locale_parse_extra_tokens_fold_into_venue() {
        let locale = Locale::parse("Beijing Mao Livehouse");
        assert_eq!(locale.city.as_deref(), Some("Beijing"));
        assert_eq!(locale.venue.as_deref(), Some("Mao Livehouse"));
    }

    #[test]
    fn test_locale_parse_single_token() {
        let locale = Locale::parse("Beijing");
        assert_eq!(locale.city.as_deref(), Some("Beijing"));
        assert!(locale.venue.is_none());
    }

    #[test]
    fn test_locale_parse_empty() {
        let locale = Locale::parse("   ");
        assert!(locale.city.is_none());
        assert!(locale.venue.is_none());
    }

    #[test]
    fn test_month_of_valid() {
        assert_eq!(month_of("2021-07-15"), Some("07"));
        assert_eq!(month_of("2021-12"), Some("12"));
    }

    #[test]
    fn test_month_of_malformed() {
        assert_eq!(month_of(""), None);
        assert_eq!(month_of("July 2021"), None);
        assert_eq!(month_of("2021/07/15"), None);
        assert_eq!(month_of("21-07-15"), None);
        assert_eq!(month_of("2021-0x-15"), None);
    }

    #[test]
    fn test_tally_bump_and_get() {
        let mut tally = Tally::default();
        tally.bump(Some("2021"));
        tally.bump(Some("2021"));
        tally.bump(Some("2019"));
        tally.bump(None);

        assert_eq!(tally.get("2021"), 2);
        assert_eq!(tally.get("2019"), 1);
        assert_eq!(tally.get("2020"), 0);
        assert_eq!(tally.malformed, 1);
    }

    #[test]
    fn test_tally_empty_key_is_malformed() {
        let mut tally = Tally::default();
        tally.bump(Some(""));
        assert!(tally.counts.is_empty());
        assert_eq!(tally.malformed, 1);
    }

    #[test]
    fn test_tally_display_includes_malformed() {
        let mut tally = Tally::default();
        tally.bump(Some("Beijing"));
        tally.bump(None);
        let text = tally.to_string();
        assert!(text.contains("Beijing: 1"));
        assert!(text.contains("(malformed): 1"));
    }

    #[test]
    fn test_report_single_event() {
        let events = vec![event("2021", "2021-07-15", "Beijing Livehouse")];
        let report = StatsReport::from_events(&events);

        assert_eq!(report.by_year.get("2021"), 1);
        assert_eq!(report.by_city.get("Beijing"), 1);
        assert_eq!(report.by_venue.get("Livehouse"), 1);
        assert_eq!(report.by_month.get("07"), 1);
        assert_eq!(report.by_year.malformed, 0);
        assert_eq!(report.by_month.malformed, 0);
    }

    #[test]
    fn test_report_accumulates_across_events() {
        let events = vec![
            event("2019", "2019-05-01", "Beijing Omni"),
            event("2020", "2020-05-09", "Shanghai Arena"),
            event("2019", "2019-11-23", "Beijing Tango"),
        ];
        let report = StatsReport::from_events(&events);

        assert_eq!(report.by_year.get("2019"), 2);
        assert_eq!(report.by_year.get("2020"), 1);
        assert_eq!(report.by_city.get("Beijing"), 2);
        assert_eq!(report.by_city.get("Shanghai"), 1);
        assert_eq!(report.by_month.get("05"), 2);
        assert_eq!(report.by_month.get("11"), 1);
    }

    #[test]
    fn test_report_malformed_fields_classified() {
        let events = vec![
            event("2021", "summer", "Beijing"),
            event("", "2021-07-15", ""),
        ];
        let report = StatsReport::from_events(&events);

        // "summer" has no month position; "Beijing" alone has no venue.
        assert_eq!(report.by_month.malformed, 1);
        assert_eq!(report.by_venue.malformed, 2);
        // Empty year and empty location are malformed, not keyed as "".
        assert_eq!(report.by_year.malformed, 1);
        assert_eq!(report.by_city.malformed, 1);
        assert_eq!(report.by_month.get("07"), 1);
    }

    #[test]
    fn test_report_empty_input() {
        let report = StatsReport::from_events(&[]);
        assert!(report.by_year.is_empty());
        assert!(report.by_city.is_empty());
        assert!(report.by_month.is_empty());
        assert!(report.by_venue.is_empty());
    }

    #[test]
    fn test_report_display_sections() {
        let events = vec![event("2021", "2021-07-15", "Beijing Livehouse")];
        let text = StatsReport::from_events(&events).to_string();
        assert!(text.contains("Years:"));
        assert!(text.contains("Cities:"));
        assert!(text.contains("Months:"));
        assert!(text.contains("Venues:"));
        assert!(text.contains("2021: 1"));
    }

    #[test]
    fn test_report_json_serializable() {
        let events = vec![event("2021", "2021-07-15", "Beijing Livehouse")];
        let report = StatsReport::from_events(&events);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("by_year"));
        assert!(json.contains("Beijing"));
    }
}
