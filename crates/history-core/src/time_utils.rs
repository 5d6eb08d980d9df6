use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Uses the `iana-time-zone` crate directly – no subprocess calls.
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Validate that `tz_name` is a recognised IANA timezone identifier.
pub fn validate_timezone(tz_name: &str) -> bool {
    tz_name.parse::<Tz>().is_ok()
}

// ── Skip reasons ──────────────────────────────────────────────────────────────

/// Why a single candidate entry was dropped.
///
/// These never surface to the user; they are logged and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no date line with a time and AM/PM marker near the entry")]
    NoDateLine,
    #[error("date line has no month/day/year")]
    MissingDate,
    #[error("date line has no hh:mm:ss time")]
    MissingTime,
    #[error("month abbreviation not recognised")]
    UnknownMonth,
    #[error("numeric field out of range")]
    InvalidNumber,
    #[error("fields do not form a valid calendar timestamp")]
    InvalidTimestamp,
    #[error("date string matched no known format")]
    UnparseableDate,
}

// ── DateTimeNormalizer ────────────────────────────────────────────────────────

/// Canonical month abbreviations, indexed by zero-based month.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// UTF-8 bytes of U+202F read back as Windows-1252, as found in exports
/// before the AM/PM marker.
pub const GARBLED_NARROW_NBSP: &str = "\u{e2}\u{20ac}\u{af}";

/// Ante / post meridiem marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// `Pm` when `text` contains `"PM"` anywhere, otherwise `Am`.
    pub fn detect(text: &str) -> Self {
        if text.contains("PM") {
            Meridiem::Pm
        } else {
            Meridiem::Am
        }
    }
}

/// Raw captured date/time fields, not yet validated.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeParts<'a> {
    pub month: &'a str,
    pub day: &'a str,
    pub year: &'a str,
    pub hour: &'a str,
    pub minute: &'a str,
    pub second: &'a str,
    pub meridiem: Meridiem,
}

/// A resolved local instant plus the 24-hour value read off the clock face.
///
/// The two disagree only when the written time falls in a DST gap and the
/// instant was moved forward; `hour` keeps what the entry said.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub instant: DateTime<FixedOffset>,
    pub hour: u32,
}

impl ClockReading {
    /// Reading for an instant that came with no separate clock hour.
    pub fn from_instant(instant: DateTime<FixedOffset>) -> Self {
        Self {
            hour: instant.hour(),
            instant,
        }
    }
}

/// Turns captured timestamp fragments into validated local instants.
#[derive(Debug, Clone)]
pub struct DateTimeNormalizer {
    tz: Tz,
}

/// Formats tried by [`DateTimeNormalizer::parse_generic`] for strings with a time.
const GENERIC_DATETIME_FORMATS: &[&str] = &[
    "%b %d, %Y, %I:%M:%S %p",
    "%B %d, %Y, %I:%M:%S %p",
    "%b %d, %Y %I:%M:%S %p",
    "%B %d, %Y %I:%M:%S %p",
    "%b %d, %Y, %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only formats tried after [`GENERIC_DATETIME_FORMATS`]; midnight is assumed.
const GENERIC_DATE_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d"];

fn explicit_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(\d+),\s+(\d+),\s+(\d+):(\d+):(\d+).*?([AP]M)",
        )
        .expect("regex is valid")
    })
}

impl DateTimeNormalizer {
    /// Create a normalizer resolving local times in `tz_name`.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "DateTimeNormalizer: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { tz }
    }

    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Replace the garbled and genuine no-break spaces with ordinary spaces.
    pub fn clean(text: &str) -> String {
        text.replace(GARBLED_NARROW_NBSP, " ")
            .replace(['\u{202f}', '\u{a0}'], " ")
    }

    /// Zero-based index of a canonical three-letter month abbreviation.
    pub fn month_index(abbr: &str) -> Option<u32> {
        MONTH_ABBREVIATIONS
            .iter()
            .position(|m| *m == abbr)
            .map(|i| i as u32)
    }

    /// Convert a 12-hour clock value to 24-hour form.
    ///
    /// Hours outside 1–12 pass through unchanged apart from the PM shift and
    /// are rejected later by calendar validation.
    pub fn to_24_hour(hour: u32, meridiem: Meridiem) -> u32 {
        match meridiem {
            Meridiem::Pm if hour < 12 => hour + 12,
            Meridiem::Am if hour == 12 => 0,
            _ => hour,
        }
    }

    /// Validate captured fields and resolve them in the configured timezone.
    pub fn normalize(&self, parts: &DateTimeParts<'_>) -> Result<ClockReading, SkipReason> {
        let month0 = Self::month_index(parts.month).ok_or(SkipReason::UnknownMonth)?;
        let day = parse_number::<u32>(parts.day)?;
        let year = parse_number::<i32>(parts.year)?;
        let hour = parse_number::<u32>(parts.hour)?;
        let minute = parse_number::<u32>(parts.minute)?;
        let second = parse_number::<u32>(parts.second)?;

        let hour24 = Self::to_24_hour(hour, parts.meridiem);

        let date =
            NaiveDate::from_ymd_opt(year, month0 + 1, day).ok_or(SkipReason::InvalidTimestamp)?;
        let time =
            NaiveTime::from_hms_opt(hour24, minute, second).ok_or(SkipReason::InvalidTimestamp)?;

        let instant = self
            .resolve_local(date.and_time(time))
            .ok_or(SkipReason::InvalidTimestamp)?;
        Ok(ClockReading {
            instant,
            hour: hour24,
        })
    }

    /// Match the full `Mon D, YYYY, H:MM:SS … AM|PM` pattern against `text`
    /// after cleaning, then normalize the captured fields.
    pub fn parse_explicit(&self, text: &str) -> Result<ClockReading, SkipReason> {
        let cleaned = Self::clean(text);
        let caps = explicit_pattern()
            .captures(&cleaned)
            .ok_or(SkipReason::UnparseableDate)?;

        let meridiem = if &caps[7] == "PM" {
            Meridiem::Pm
        } else {
            Meridiem::Am
        };
        self.normalize(&DateTimeParts {
            month: &caps[1],
            day: &caps[2],
            year: &caps[3],
            hour: &caps[4],
            minute: &caps[5],
            second: &caps[6],
            meridiem,
        })
    }

    /// Lenient parse of a free-form date string.
    ///
    /// Tries RFC 3339, RFC 2822 and a fixed list of formats, first on the
    /// cleaned text and then with a trailing zone abbreviation (`EST`, `UTC`,
    /// ...) removed. Offset-carrying strings are converted into the
    /// configured timezone.
    pub fn parse_generic(&self, text: &str) -> Result<DateTime<FixedOffset>, SkipReason> {
        let cleaned = Self::clean(text);
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Err(SkipReason::UnparseableDate);
        }

        let mut candidates = vec![cleaned.to_string()];
        if let Some(stripped) = strip_zone_abbreviation(cleaned) {
            candidates.push(stripped);
        }

        for candidate in &candidates {
            if let Ok(dt) = DateTime::parse_from_rfc3339(candidate) {
                return Ok(dt.with_timezone(&self.tz).fixed_offset());
            }
            if let Ok(dt) = DateTime::parse_from_rfc2822(candidate) {
                return Ok(dt.with_timezone(&self.tz).fixed_offset());
            }
            for fmt in GENERIC_DATETIME_FORMATS {
                if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, fmt) {
                    if let Some(dt) = self.resolve_local(naive) {
                        return Ok(dt);
                    }
                }
            }
            for fmt in GENERIC_DATE_FORMATS {
                let midnight = NaiveDate::parse_from_str(candidate, fmt)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0));
                if let Some(dt) = midnight.and_then(|naive| self.resolve_local(naive)) {
                    return Ok(dt);
                }
            }
        }

        Err(SkipReason::UnparseableDate)
    }

    /// Attach the configured timezone to a wall-clock time.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant; times inside
    /// a DST gap are moved forward by one hour.
    pub fn resolve_local(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                let shifted = naive.checked_add_signed(chrono::Duration::hours(1))?;
                self.tz.from_local_datetime(&shifted).earliest()
            })
            .map(|dt| dt.fixed_offset())
    }
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, SkipReason> {
    s.trim().parse::<T>().map_err(|_| SkipReason::InvalidNumber)
}

/// Drop a trailing all-letter token such as `EST`, keeping `AM`/`PM`.
fn strip_zone_abbreviation(text: &str) -> Option<String> {
    let (head, last) = text.rsplit_once(' ')?;
    let is_zone = !last.is_empty()
        && last.chars().all(|c| c.is_ascii_alphabetic())
        && !last.eq_ignore_ascii_case("AM")
        && !last.eq_ignore_ascii_case("PM");
    is_zone.then(|| head.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn utc() -> DateTimeNormalizer {
        DateTimeNormalizer::with_timezone(Tz::UTC)
    }

    fn parts<'a>(hour: &'a str, meridiem: Meridiem) -> DateTimeParts<'a> {
        DateTimeParts {
            month: "Jan",
            day: "29",
            year: "2025",
            hour,
            minute: "00",
            second: "26",
            meridiem,
        }
    }

    // ── to_24_hour ────────────────────────────────────────────────────────────

    #[test]
    fn test_to_24_hour_midnight_and_noon() {
        assert_eq!(DateTimeNormalizer::to_24_hour(12, Meridiem::Am), 0);
        assert_eq!(DateTimeNormalizer::to_24_hour(12, Meridiem::Pm), 12);
    }

    #[test]
    fn test_to_24_hour_all_clock_hours() {
        for h in 1..=11 {
            assert_eq!(DateTimeNormalizer::to_24_hour(h, Meridiem::Am), h);
            assert_eq!(DateTimeNormalizer::to_24_hour(h, Meridiem::Pm), h + 12);
        }
    }

    // ── month_index ───────────────────────────────────────────────────────────

    #[test]
    fn test_month_index_exact_match_only() {
        assert_eq!(DateTimeNormalizer::month_index("Jan"), Some(0));
        assert_eq!(DateTimeNormalizer::month_index("Dec"), Some(11));
        assert_eq!(DateTimeNormalizer::month_index("jan"), None);
        assert_eq!(DateTimeNormalizer::month_index("January"), None);
    }

    // ── clean ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_clean_replaces_garbled_sequence() {
        let raw = "Jan 29, 2025, 8:00:26\u{e2}\u{20ac}\u{af}AM EST";
        assert_eq!(DateTimeNormalizer::clean(raw), "Jan 29, 2025, 8:00:26 AM EST");
    }

    #[test]
    fn test_clean_replaces_real_no_break_spaces() {
        let raw = "8:00:26\u{202f}AM\u{a0}EST";
        assert_eq!(DateTimeNormalizer::clean(raw), "8:00:26 AM EST");
    }

    // ── normalize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_am() {
        let dt = utc().normalize(&parts("8", Meridiem::Am)).unwrap().instant;
        assert_eq!((dt.year(), dt.month0(), dt.day(), dt.hour()), (2025, 0, 29, 8));
        assert_eq!(dt.minute(), 0);
        assert_eq!(dt.second(), 26);
    }

    #[test]
    fn test_normalize_pm() {
        let reading = utc().normalize(&parts("8", Meridiem::Pm)).unwrap();
        assert_eq!(reading.instant.hour(), 20);
        assert_eq!(reading.hour, 20);
    }

    #[test]
    fn test_normalize_unknown_month() {
        let mut p = parts("8", Meridiem::Am);
        p.month = "Foo";
        assert_eq!(utc().normalize(&p), Err(SkipReason::UnknownMonth));
    }

    #[test]
    fn test_normalize_rejects_impossible_date() {
        let p = DateTimeParts {
            month: "Feb",
            day: "30",
            ..parts("8", Meridiem::Am)
        };
        assert_eq!(utc().normalize(&p), Err(SkipReason::InvalidTimestamp));
    }

    #[test]
    fn test_normalize_rejects_out_of_range_minute() {
        let p = DateTimeParts {
            minute: "61",
            ..parts("8", Meridiem::Am)
        };
        assert_eq!(utc().normalize(&p), Err(SkipReason::InvalidTimestamp));
    }

    #[test]
    fn test_normalize_rejects_overflowing_number() {
        let p = DateTimeParts {
            year: "99999999999999",
            ..parts("8", Meridiem::Am)
        };
        assert_eq!(utc().normalize(&p), Err(SkipReason::InvalidNumber));
    }

    #[test]
    fn test_normalize_applies_timezone_offset() {
        let n = DateTimeNormalizer::new("America/New_York");
        let dt = n.normalize(&parts("8", Meridiem::Am)).unwrap().instant;
        assert_eq!(dt.hour(), 8);
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_new_falls_back_to_utc() {
        let n = DateTimeNormalizer::new("Not/AZone");
        assert_eq!(n.timezone(), Tz::UTC);
    }

    // ── resolve_local ─────────────────────────────────────────────────────────

    #[test]
    fn test_resolve_local_dst_gap_moves_forward() {
        let n = DateTimeNormalizer::new("America/New_York");
        // 2024-03-10 02:30 does not exist in New York.
        let naive = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let dt = n.resolve_local(naive).unwrap();
        assert_eq!(dt.hour(), 3);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_normalize_dst_gap_keeps_clock_hour() {
        let n = DateTimeNormalizer::new("America/New_York");
        let p = DateTimeParts {
            month: "Mar",
            day: "10",
            year: "2024",
            hour: "2",
            minute: "30",
            second: "00",
            meridiem: Meridiem::Am,
        };
        let reading = n.normalize(&p).unwrap();
        assert_eq!(reading.hour, 2);
        assert_eq!(reading.instant.hour(), 3);
        assert_eq!(reading.instant.day(), 10);
    }

    // ── parse_explicit ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_explicit_with_garbled_space() {
        let reading = utc()
            .parse_explicit("Oct 16, 2024, 9:05:40\u{e2}\u{20ac}\u{af}PM EST")
            .unwrap();
        let dt = reading.instant;
        assert_eq!((dt.year(), dt.month0(), dt.day(), dt.hour()), (2024, 9, 16, 21));
        assert_eq!(reading.hour, 21);
    }

    #[test]
    fn test_parse_explicit_no_match() {
        assert_eq!(
            utc().parse_explicit("Oct 16, 2024"),
            Err(SkipReason::UnparseableDate)
        );
    }

    // ── parse_generic ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_generic_iso_naive() {
        let dt = utc().parse_generic("2025-01-29 08:00:26").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_generic_rfc3339_converted_to_zone() {
        let n = DateTimeNormalizer::new("America/New_York");
        let dt = n.parse_generic("2025-01-29T13:00:26Z").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_generic_full_month_with_zone_suffix() {
        let dt = utc()
            .parse_generic("January 29, 2025, 8:00:26 PM EST")
            .unwrap();
        assert_eq!(dt.hour(), 20);
        assert_eq!(dt.day(), 29);
    }

    #[test]
    fn test_parse_generic_date_only_is_midnight() {
        let dt = utc().parse_generic("Sep 1, 2023").unwrap();
        assert_eq!((dt.year(), dt.month0(), dt.day(), dt.hour()), (2023, 8, 1, 0));
    }

    #[test]
    fn test_parse_generic_garbage() {
        assert_eq!(utc().parse_generic("not a date"), Err(SkipReason::UnparseableDate));
        assert_eq!(utc().parse_generic("   "), Err(SkipReason::UnparseableDate));
    }

    // ── helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_strip_zone_abbreviation() {
        assert_eq!(
            strip_zone_abbreviation("8:00:26 AM EST"),
            Some("8:00:26 AM".to_string())
        );
        assert_eq!(strip_zone_abbreviation("8:00:26 AM"), None);
        assert_eq!(strip_zone_abbreviation("2025"), None);
    }

    #[test]
    fn test_meridiem_detect() {
        assert_eq!(Meridiem::detect("8:00:26 PM EST"), Meridiem::Pm);
        assert_eq!(Meridiem::detect("8:00:26 AM EST"), Meridiem::Am);
    }

    #[test]
    fn test_validate_timezone() {
        assert!(validate_timezone("UTC"));
        assert!(validate_timezone("Europe/Berlin"));
        assert!(!validate_timezone("Mars/Olympus"));
    }
}
