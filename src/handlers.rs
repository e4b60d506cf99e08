use crate::errors::AppError;
use crate::models::{
    CalendarQuery, CatalogItem, DayGroup, MAX_NOTE_CHARS, Mood, MoodEntry, MoodStats, MonthCalendar,
    NewMoodRequest, SubmissionResponse,
};
use crate::state::AppState;
use crate::stats::{
    build_stats, can_submit, history_by_day, latest_entry, month_calendar, time_until_next_submission,
    todays_entries,
};
use crate::storage::{persist_data, MoodRepository};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{Datelike, Local, Utc};
use tracing::{error, info, warn};

pub const USER_HEADER: &str = "x-user-id";

pub async fn catalog() -> Json<Vec<CatalogItem>> {
    Json(
        Mood::ALL
            .into_iter()
            .map(|mood| CatalogItem {
                emoji: mood.emoji(),
                mood,
            })
            .collect(),
    )
}

pub async fn list_moods(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MoodEntry>>, AppError> {
    let user = user_id(&headers)?;
    Ok(Json(state.entries_for(&user).await))
}

pub async fn create_mood(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewMoodRequest>,
) -> Result<(StatusCode, Json<MoodEntry>), AppError> {
    let user = user_id(&headers)?;
    let note = normalize_note(payload.note)?;
    if let Some(emoji) = payload.emoji.as_deref() {
        if emoji != payload.mood.emoji() {
            return Err(AppError::bad_request(format!(
                "emoji {emoji} does not match mood {}",
                payload.mood.label()
            )));
        }
    }

    let now = Utc::now();
    let mut data = state.data.lock().await;
    let entries = data.for_user(&user);
    let latest = latest_entry(&entries);
    if !can_submit(latest, now) {
        let wait = time_until_next_submission(latest, now);
        warn!(user = %user, wait_secs = wait, "mood submission rejected by cooldown");
        return Err(AppError::too_many_requests(wait));
    }

    let entry = MoodEntry::new(user, payload.mood, note, now);
    data.append(entry.clone());
    if let Err(err) = persist_data(&state.data_path, &data).await {
        data.entries.retain(|existing| existing.id != entry.id);
        error!(user = %entry.user_id, "failed to persist mood entry: {}", err.message);
        return Err(err);
    }

    info!(user = %entry.user_id, mood = entry.mood.label(), "mood logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_today(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MoodEntry>>, AppError> {
    let entries = user_entries(&state, &headers).await?;
    let today = todays_entries(&Local::now(), &entries)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(today))
}

pub async fn get_latest(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Option<MoodEntry>>, AppError> {
    let entries = user_entries(&state, &headers).await?;
    Ok(Json(latest_entry(&entries).cloned()))
}

pub async fn get_submission(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SubmissionResponse>, AppError> {
    let entries = user_entries(&state, &headers).await?;
    let latest = latest_entry(&entries);
    let now = Utc::now();
    Ok(Json(SubmissionResponse {
        can_submit: can_submit(latest, now),
        seconds_until_next: time_until_next_submission(latest, now),
    }))
}

pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MoodStats>, AppError> {
    let entries = user_entries(&state, &headers).await?;
    Ok(Json(build_stats(&entries)))
}

pub async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<DayGroup>>, AppError> {
    let entries = user_entries(&state, &headers).await?;
    Ok(Json(history_by_day(&Local::now(), &entries)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<MonthCalendar>, AppError> {
    let entries = user_entries(&state, &headers).await?;
    let now = Local::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| now.month());

    month_calendar(&now, year, month, &entries)
        .map(Json)
        .ok_or_else(|| AppError::bad_request(format!("invalid month {year}-{month}")))
}

async fn user_entries(state: &AppState, headers: &HeaderMap) -> Result<Vec<MoodEntry>, AppError> {
    let user = user_id(headers)?;
    Ok(state.entries_for(&user).await)
}

fn user_id(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::bad_request("missing X-User-Id header"))
}

fn normalize_note(note: Option<String>) -> Result<Option<String>, AppError> {
    let Some(note) = note else {
        return Ok(None);
    };
    let trimmed = note.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_NOTE_CHARS {
        return Err(AppError::bad_request(format!(
            "note must be at most {MAX_NOTE_CHARS} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;
    use axum::http::HeaderValue;

    fn headers_for(user: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_str(user).unwrap());
        headers
    }

    fn happy() -> Json<NewMoodRequest> {
        Json(NewMoodRequest {
            mood: Mood::Happy,
            emoji: None,
            note: None,
        })
    }

    #[tokio::test]
    async fn failed_write_returns_500_and_keeps_store_empty() {
        let dir = std::env::temp_dir().join(format!(
            "mood_tracker_handlers_{}_{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        tokio::fs::create_dir(&dir).await.unwrap();
        let state = AppState::new(dir.clone(), AppData::default());

        let err = create_mood(State(state.clone()), headers_for("alice"), happy())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(state.data.lock().await.entries.is_empty());

        let submission = get_submission(State(state), headers_for("alice")).await.unwrap();
        assert!(submission.0.can_submit);
        let _ = tokio::fs::remove_dir(&dir).await;
    }

    #[test]
    fn blank_user_header_is_rejected() {
        let err = user_id(&headers_for("   ")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(user_id(&HeaderMap::new()).unwrap_err().status, StatusCode::BAD_REQUEST);
        assert_eq!(user_id(&headers_for(" bob ")).unwrap(), "bob");
    }

    #[test]
    fn note_limit_counts_characters() {
        assert_eq!(normalize_note(Some("   ".into())).unwrap(), None);
        assert_eq!(normalize_note(None).unwrap(), None);

        let accented = "é".repeat(MAX_NOTE_CHARS);
        assert_eq!(normalize_note(Some(accented.clone())).unwrap(), Some(accented));

        let too_long = "é".repeat(MAX_NOTE_CHARS + 1);
        let err = normalize_note(Some(too_long)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
