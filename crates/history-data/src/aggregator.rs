//! Aggregate views over a parsed watch history.
//!
//! Every function here is a pure function of the record slice. Grouping
//! keeps first-seen order and sorting is stable, so records that tie on
//! count stay in the order their group first appeared.

use std::collections::{BTreeMap, HashMap};

use history_core::formatting::{truncate_title, DISPLAY_TITLE_MAX_CHARS};
use history_core::models::{
    ChannelStat, Dashboard, HourlyActivity, MonthlyActivity, RecurringContentStat, WatchRecord,
};

/// Channels kept in [`HistoryAggregator::channel_stats`].
pub const TOP_CHANNELS: usize = 10;

/// Titles kept in [`HistoryAggregator::recurring_content`].
pub const TOP_RECURRING: usize = 15;

/// Stateless helper that derives the dashboard views from records.
pub struct HistoryAggregator;

impl HistoryAggregator {
    /// All four views at once.
    pub fn build_dashboard(records: &[WatchRecord]) -> Dashboard {
        Dashboard {
            channels: Self::channel_stats(records),
            monthly: Self::monthly_activity(records),
            hourly: Self::hourly_activity(records),
            recurring: Self::recurring_content(records),
        }
    }

    /// Per-channel watch counts, most watched first, top [`TOP_CHANNELS`].
    pub fn channel_stats(records: &[WatchRecord]) -> Vec<ChannelStat> {
        let mut groups = count_in_first_seen_order(records.iter().map(|r| r.channel()));
        groups.sort_by(|a, b| b.1.cmp(&a.1));
        groups
            .into_iter()
            .take(TOP_CHANNELS)
            .map(|(name, count)| ChannelStat { name, count })
            .collect()
    }

    /// Per-month watch counts keyed `"YYYY-MM"`, ascending.
    pub fn monthly_activity(records: &[WatchRecord]) -> Vec<MonthlyActivity> {
        // BTreeMap keeps keys sorted; zero-padded keys sort chronologically.
        let mut map: BTreeMap<String, u32> = BTreeMap::new();
        for record in records {
            *map.entry(record.year_month()).or_insert(0) += 1;
        }
        map.into_iter()
            .map(|(year_month, count)| MonthlyActivity { year_month, count })
            .collect()
    }

    /// Watch counts for each of the 24 hours, including empty hours.
    pub fn hourly_activity(records: &[WatchRecord]) -> Vec<HourlyActivity> {
        let mut counts = [0u32; 24];
        for record in records {
            // hour() is always 0..=23: a validated clock time or the instant.
            counts[record.hour() as usize] += 1;
        }
        counts
            .iter()
            .enumerate()
            .map(|(hour, &count)| HourlyActivity {
                hour: format!("{:02}", hour),
                count,
            })
            .collect()
    }

    /// Titles watched more than once, most repeated first, top [`TOP_RECURRING`].
    pub fn recurring_content(records: &[WatchRecord]) -> Vec<RecurringContentStat> {
        let mut groups: Vec<(String, u32)> =
            count_in_first_seen_order(records.iter().map(|r| r.title()))
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1));
        groups
            .into_iter()
            .take(TOP_RECURRING)
            .map(|(title, count)| RecurringContentStat {
                display_title: truncate_title(&title, DISPLAY_TITLE_MAX_CHARS),
                full_title: title,
                count,
            })
            .collect()
    }
}

/// Count occurrences of each key, returning groups in first-seen order.
fn count_in_first_seen_order<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, u32)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(String, u32)> = Vec::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => groups[i].1 += 1,
            None => {
                index.insert(key, groups.len());
                groups.push((key.to_string(), 1));
            }
        }
    }
    groups
}

// ── Tests ─────────────────────────────────────────────────────────────────────
