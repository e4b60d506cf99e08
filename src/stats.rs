use crate::models::{CalendarDay, CalendarMark, DayGroup, Mood, MoodEntry, MoodStats, MonthCalendar};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

/// Minimum time between two submissions of the same user.
pub const COOLDOWN_SECS: i64 = 60;

pub fn build_stats(entries: &[MoodEntry]) -> MoodStats {
    build_stats_at(&Local::now(), entries)
}

/// Derives streaks, distribution and daily counts. Days are bucketed in the
/// time zone of `now`.
pub fn build_stats_at<Tz: TimeZone>(now: &DateTime<Tz>, entries: &[MoodEntry]) -> MoodStats {
    if entries.is_empty() {
        return MoodStats::default();
    }

    let tz = now.timezone();
    let today = now.date_naive();

    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for entry in entries {
        *by_day.entry(day_key(entry, &tz)).or_default() += 1;
    }
    let days: Vec<NaiveDate> = by_day.keys().copied().collect();

    let (current_streak, longest_streak) = streaks(&days, today);

    let mut mood_distribution: BTreeMap<Mood, u64> = BTreeMap::new();
    let mut first_seen = Vec::new();
    for entry in entries {
        let count = mood_distribution.entry(entry.mood).or_insert_with(|| {
            first_seen.push(entry.mood);
            0
        });
        *count += 1;
    }

    let mut most_common_mood = None;
    let mut best = 0;
    for mood in first_seen {
        let count = mood_distribution[&mood];
        if count > best {
            best = count;
            most_common_mood = Some(mood);
        }
    }

    let total_entries = entries.len();
    let average_entries_per_day = if days.is_empty() {
        0.0
    } else {
        round_one_decimal(total_entries as f64 / days.len() as f64)
    };

    MoodStats {
        current_streak,
        longest_streak,
        total_entries,
        most_common_mood,
        mood_distribution,
        today_entries: by_day.get(&today).copied().unwrap_or(0),
        average_entries_per_day,
    }
}

/// `days` must be sorted ascending and deduplicated.
fn streaks(days: &[NaiveDate], today: NaiveDate) -> (u32, u32) {
    let Some(&last) = days.last() else {
        return (0, 0);
    };

    let active = last == today || last == today - Duration::days(1);
    let mut current = u32::from(active);
    let mut trailing = active;
    let mut run = 1u32;
    let mut longest = 0u32;

    for pair in days.windows(2).rev() {
        let gap = (pair[1] - pair[0]).num_days();
        if gap == 1 {
            run += 1;
            if trailing {
                current = run;
            }
        } else {
            longest = longest.max(run);
            run = 1;
            trailing = false;
        }
    }

    (current, longest.max(run).max(current))
}

pub fn can_submit(latest: Option<&MoodEntry>, now: DateTime<Utc>) -> bool {
    match latest {
        None => true,
        Some(entry) => now - entry.date >= Duration::seconds(COOLDOWN_SECS),
    }
}

/// Whole seconds (rounded up) until `can_submit` turns true; 0 if it already is.
/// Never more than the cooldown window, even when the latest entry is dated
/// in the future.
pub fn time_until_next_submission(latest: Option<&MoodEntry>, now: DateTime<Utc>) -> u64 {
    let Some(entry) = latest else {
        return 0;
    };
    if can_submit(latest, now) {
        return 0;
    }

    let elapsed_ms = (now - entry.date).num_milliseconds();
    let remaining_ms = COOLDOWN_SECS * 1000 - elapsed_ms;
    (((remaining_ms + 999) / 1000) as u64).min(COOLDOWN_SECS as u64)
}

/// Entry with the greatest `date`; on ties the earliest inserted wins.
pub fn latest_entry(entries: &[MoodEntry]) -> Option<&MoodEntry> {
    entries.iter().fold(None, |best: Option<&MoodEntry>, entry| match best {
        Some(current) if current.date >= entry.date => Some(current),
        _ => Some(entry),
    })
}

pub fn todays_entries<'a, Tz: TimeZone>(now: &DateTime<Tz>, entries: &'a [MoodEntry]) -> Vec<&'a MoodEntry> {
    let tz = now.timezone();
    let today = now.date_naive();
    let mut todays: Vec<&MoodEntry> = entries
        .iter()
        .filter(|entry| day_key(entry, &tz) == today)
        .collect();
    newest_first(&mut todays);
    todays
}

/// Timeline grouped by day: newest day first, entries within a day newest first.
pub fn history_by_day<Tz: TimeZone>(now: &DateTime<Tz>, entries: &[MoodEntry]) -> Vec<DayGroup> {
    let tz = now.timezone();
    let mut by_day: BTreeMap<NaiveDate, Vec<&MoodEntry>> = BTreeMap::new();
    for entry in entries {
        by_day.entry(day_key(entry, &tz)).or_default().push(entry);
    }

    by_day
        .into_iter()
        .rev()
        .map(|(date, mut entries)| {
            newest_first(&mut entries);
            DayGroup {
                date,
                count: entries.len(),
                entries: entries.into_iter().cloned().collect(),
            }
        })
        .collect()
}

/// Every day of `year`/`month` with the first mood logged on it. Returns
/// `None` for an invalid month.
pub fn month_calendar<Tz: TimeZone>(
    now: &DateTime<Tz>,
    year: i32,
    month: u32,
    entries: &[MoodEntry],
) -> Option<MonthCalendar> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let tz = now.timezone();
    let today = now.date_naive();

    let mut first_by_day: BTreeMap<NaiveDate, &MoodEntry> = BTreeMap::new();
    for entry in entries {
        let day = day_key(entry, &tz);
        if day.year() == year && day.month() == month {
            first_by_day.entry(day).or_insert(entry);
        }
    }

    let days = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| CalendarDay {
            date,
            is_today: date == today,
            mood: first_by_day.get(&date).map(|entry| CalendarMark {
                emoji: entry.emoji.clone(),
                mood: entry.mood,
            }),
        })
        .collect();

    Some(MonthCalendar { year, month, days })
}

fn day_key<Tz: TimeZone>(entry: &MoodEntry, tz: &Tz) -> NaiveDate {
    entry.date.with_timezone(tz).date_naive()
}

fn newest_first(entries: &mut [&MoodEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
