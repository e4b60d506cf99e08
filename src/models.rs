use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const MAX_NOTE_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Sad,
    Anxious,
    Tired,
    Angry,
    Thoughtful,
    Confident,
    Loved,
    Down,
    Grateful,
    Stressed,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 12] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Anxious,
        Mood::Tired,
        Mood::Angry,
        Mood::Thoughtful,
        Mood::Confident,
        Mood::Loved,
        Mood::Down,
        Mood::Grateful,
        Mood::Stressed,
        Mood::Neutral,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Anxious => "😰",
            Mood::Tired => "😴",
            Mood::Angry => "😤",
            Mood::Thoughtful => "🤔",
            Mood::Confident => "😎",
            Mood::Loved => "🥰",
            Mood::Down => "😔",
            Mood::Grateful => "🤗",
            Mood::Stressed => "😬",
            Mood::Neutral => "🙂",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
            Mood::Tired => "Tired",
            Mood::Angry => "Angry",
            Mood::Thoughtful => "Thoughtful",
            Mood::Confident => "Confident",
            Mood::Loved => "Loved",
            Mood::Down => "Down",
            Mood::Grateful => "Grateful",
            Mood::Stressed => "Stressed",
            Mood::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: String,
    pub emoji: String,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(user_id: impl Into<String>, mood: Mood, note: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            emoji: mood.emoji().to_string(),
            mood,
            note,
            date: now,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub entries: Vec<MoodEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MoodStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_entries: usize,
    pub most_common_mood: Option<Mood>,
    pub mood_distribution: BTreeMap<Mood, u64>,
    pub today_entries: usize,
    pub average_entries_per_day: f64,
}

#[derive(Debug, Deserialize)]
pub struct NewMoodRequest {
    pub mood: Mood,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub can_submit: bool,
    pub seconds_until_next: u64,
}

#[derive(Debug, Serialize)]
pub struct CatalogItem {
    pub emoji: &'static str,
    pub mood: Mood,
}

#[derive(Debug, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub count: usize,
    pub entries: Vec<MoodEntry>,
}

#[derive(Debug, Serialize)]
pub struct CalendarMark {
    pub emoji: String,
    pub mood: Mood,
}

#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub mood: Option<CalendarMark>,
}

#[derive(Debug, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}
