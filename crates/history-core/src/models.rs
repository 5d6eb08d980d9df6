use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::time_utils::ClockReading;

/// Channel name assigned to entries that carry only a video URL.
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// Video id used when a watch URL has no `v` parameter.
pub const UNKNOWN_VIDEO_ID: &str = "unknown";

/// One observed watch event.
///
/// The date fields are derived from `instant` when the record is built and
/// cannot be changed independently. `hour` is the clock hour the entry was
/// written with, which is one behind `instant` for times inside a DST gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WatchRecordJson", try_from = "WatchRecordJson")]
pub struct WatchRecord {
    title: String,
    channel: String,
    instant: DateTime<FixedOffset>,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
}

impl WatchRecord {
    /// Build a record from a title, a channel and a resolved local instant.
    pub fn new(
        title: impl Into<String>,
        channel: impl Into<String>,
        instant: DateTime<FixedOffset>,
    ) -> Self {
        Self::from_reading(title, channel, ClockReading::from_instant(instant))
    }

    /// Build a record whose hour comes from the written clock time rather
    /// than the resolved instant.
    pub fn from_reading(
        title: impl Into<String>,
        channel: impl Into<String>,
        reading: ClockReading,
    ) -> Self {
        let instant = reading.instant;
        Self {
            title: title.into(),
            channel: channel.into(),
            year: instant.year(),
            month: instant.month0(),
            day: instant.day(),
            hour: reading.hour,
            instant,
        }
    }

    /// Build a record for a URL-only entry: `"Video ID: <id>"` under
    /// [`UNKNOWN_CHANNEL`].
    pub fn from_video_id(video_id: Option<&str>, reading: ClockReading) -> Self {
        let id = video_id.unwrap_or(UNKNOWN_VIDEO_ID);
        Self::from_reading(format!("Video ID: {}", id), UNKNOWN_CHANNEL, reading)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Local wall-clock instant including its UTC offset.
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.instant.timestamp_millis()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index (0 = January).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of month, 1-based.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Hour of day in 24-hour form.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Monthly bucket key, e.g. `"2025-01"`.
    pub fn year_month(&self) -> String {
        format!("{}-{:02}", self.year, self.month + 1)
    }
}

// ── JSON wire form ────────────────────────────────────────────────────────────

/// Serialized shape of a [`WatchRecord`]; carries the derived fields so
/// exports are self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WatchRecordJson {
    title: String,
    channel: String,
    date: DateTime<FixedOffset>,
    timestamp: i64,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
}

impl From<WatchRecord> for WatchRecordJson {
    fn from(r: WatchRecord) -> Self {
        Self {
            timestamp: r.instant.timestamp_millis(),
            title: r.title,
            channel: r.channel,
            date: r.instant,
            year: r.year,
            month: r.month,
            day: r.day,
            hour: r.hour,
        }
    }
}

impl TryFrom<WatchRecordJson> for WatchRecord {
    type Error = HistoryError;

    fn try_from(json: WatchRecordJson) -> Result<Self, Self::Error> {
        let reading = ClockReading {
            instant: json.date,
            hour: json.hour,
        };
        let record = WatchRecord::from_reading(json.title, json.channel, reading);
        let date_matches =
            (record.year, record.month, record.day) == (json.year, json.month, json.day);
        if !date_matches || !hour_fits_instant(json.hour, &json.date) {
            let stored = (json.year, json.month, json.day, json.hour);
            return Err(HistoryError::InvalidRecord(format!(
                "calendar fields {:?} do not match date {}",
                stored, json.date
            )));
        }
        if json.timestamp != record.timestamp_millis() {
            return Err(HistoryError::InvalidRecord(format!(
                "timestamp {} does not match date {}",
                json.timestamp, json.date
            )));
        }
        Ok(record)
    }
}

/// The stored hour is the instant's own, or one behind it when the clock
/// time was moved forward out of a DST gap.
fn hour_fits_instant(hour: u32, instant: &DateTime<FixedOffset>) -> bool {
    hour == instant.hour() || hour == (instant.hour() + 23) % 24
}

// ── Aggregate views ───────────────────────────────────────────────────────────

/// Watch count for one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStat {
    pub name: String,
    pub count: u32,
}

/// Watch count for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyActivity {
    /// `"YYYY-MM"` bucket key.
    pub year_month: String,
    pub count: u32,
}

/// Watch count for one hour of the day. Always present, even when zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyActivity {
    /// Zero-padded hour label, `"00"` through `"23"`.
    pub hour: String,
    pub count: u32,
}

/// A title that was watched more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringContentStat {
    /// Title shortened for charts and tables.
    pub display_title: String,
    pub full_title: String,
    pub count: u32,
}

/// The four derived views, replaced together on every successful parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub channels: Vec<ChannelStat>,
    pub monthly: Vec<MonthlyActivity>,
    pub hourly: Vec<HourlyActivity>,
    pub recurring: Vec<RecurringContentStat>,
}
