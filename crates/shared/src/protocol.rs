use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    SleepQuality, SymptomId, TrackingId, TrackingKind, TriggerCategory, TriggerId, UserId,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    pub id: SymptomId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: TriggerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TriggerCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub id: TrackingId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub date: NaiveDate,
    pub duration: u32,
    pub quality: SleepQuality,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub id: TrackingId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub date: NaiveDate,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub late_morning_symptoms: Vec<Symptom>,
    #[serde(default)]
    pub afternoon_symptoms: Vec<Symptom>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackingEntry {
    Sleep(SleepEntry),
    Day(DayEntry),
}

impl TrackingEntry {
    pub fn id(&self) -> TrackingId {
        match self {
            Self::Sleep(entry) => entry.id,
            Self::Day(entry) => entry.id,
        }
    }

    pub fn kind(&self) -> TrackingKind {
        match self {
            Self::Sleep(_) => TrackingKind::Sleep,
            Self::Day(_) => TrackingKind::Day,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Sleep(entry) => entry.date,
            Self::Day(entry) => entry.date,
        }
    }
}

/// Body for `POST /trackings/sleep` and `PUT /trackings/sleep/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepPayload {
    pub date: Option<NaiveDate>,
    pub duration: Option<u32>,
    pub quality: SleepQuality,
    pub comment: String,
    pub symptoms: Vec<SymptomId>,
}

/// Body for `POST /trackings/day` and `PUT /trackings/day/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPayload {
    pub date: Option<NaiveDate>,
    pub comment: String,
    pub late_morning_symptoms: Vec<SymptomId>,
    pub afternoon_symptoms: Vec<SymptomId>,
    pub triggers: Vec<TriggerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryPayload {
    Sleep(SleepPayload),
    Day(DayPayload),
}

impl EntryPayload {
    pub fn kind(&self) -> TrackingKind {
        match self {
            Self::Sleep(_) => TrackingKind::Sleep,
            Self::Day(_) => TrackingKind::Day,
        }
    }
}

/// The part of a create response the client relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreatedEntry {
    pub id: TrackingId,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingListQuery {
    #[serde(rename = "type")]
    pub kind: TrackingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl TrackingListQuery {
    pub fn all(kind: TrackingKind) -> Self {
        Self {
            kind,
            start_date: None,
            end_date: None,
        }
    }
}

/// Reduces a service timestamp to its calendar date.
///
/// Offset-aware timestamps are converted to UTC first; naive timestamps and
/// plain dates are taken as written.
pub fn normalize_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc).date_naive());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.date());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(parsed.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{de::Error as _, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::normalize_calendar_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid calendar date '{raw}'")))
    }
}
