//! Editable form state for sleep and day entries.
//!
//! Tag selections coming from a view arrive as strings; they are parsed into
//! id newtypes the moment they are handed over, so a form only ever holds
//! numeric references and the request body is built from those.

use std::{collections::BTreeSet, str::FromStr};

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    domain::{SleepQuality, SymptomId, TriggerId},
    protocol::{DayEntry, DayPayload, SleepEntry, SleepPayload},
};

use crate::error::FormError;

fn parse_selection<T, I, S>(field: &'static str, raw: I) -> Result<BTreeSet<T>, FormError>
where
    T: FromStr + Ord,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|value| {
            let value = value.as_ref();
            value.parse::<T>().map_err(|_| FormError::InvalidTagId {
                field,
                raw: value.to_string(),
            })
        })
        .collect()
}

pub fn parse_form_date(raw: &str) -> Result<Option<NaiveDate>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::InvalidDate(raw.to_string()))
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, id: T) {
    if !set.remove(&id) {
        set.insert(id);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SleepForm {
    pub date: Option<NaiveDate>,
    pub duration: Option<u32>,
    pub quality: SleepQuality,
    pub comment: String,
    symptoms: BTreeSet<SymptomId>,
}

impl SleepForm {
    pub fn from_entry(entry: &SleepEntry) -> Self {
        Self {
            date: Some(entry.date),
            duration: Some(entry.duration),
            quality: entry.quality,
            comment: entry.comment.clone().unwrap_or_default(),
            symptoms: entry.symptoms.iter().map(|symptom| symptom.id).collect(),
        }
    }

    pub fn set_date(&mut self, raw: &str) -> Result<(), FormError> {
        self.date = parse_form_date(raw)?;
        Ok(())
    }

    pub fn set_duration(&mut self, raw: &str) -> Result<(), FormError> {
        let raw = raw.trim();
        self.duration = if raw.is_empty() {
            None
        } else {
            Some(
                raw.parse::<u32>()
                    .map_err(|_| FormError::InvalidDuration(raw.to_string()))?,
            )
        };
        Ok(())
    }

    /// Replaces the symptom selection. Nothing changes if any value fails to parse.
    pub fn select_symptoms<I, S>(&mut self, raw: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.symptoms = parse_selection("symptom", raw)?;
        Ok(())
    }

    pub fn set_symptoms(&mut self, ids: impl IntoIterator<Item = SymptomId>) {
        self.symptoms = ids.into_iter().collect();
    }

    pub fn toggle_symptom(&mut self, id: SymptomId) {
        toggle(&mut self.symptoms, id);
    }

    pub fn symptoms(&self) -> &BTreeSet<SymptomId> {
        &self.symptoms
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_payload(&self) -> SleepPayload {
        SleepPayload {
            date: self.date,
            duration: self.duration,
            quality: self.quality,
            comment: self.comment.clone(),
            symptoms: self.symptoms.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayForm {
    pub date: Option<NaiveDate>,
    pub comment: String,
    late_morning_symptoms: BTreeSet<SymptomId>,
    afternoon_symptoms: BTreeSet<SymptomId>,
    triggers: BTreeSet<TriggerId>,
}

impl DayForm {
    pub fn from_entry(entry: &DayEntry) -> Self {
        Self {
            date: Some(entry.date),
            comment: entry.comment.clone().unwrap_or_default(),
            late_morning_symptoms: entry.late_morning_symptoms.iter().map(|s| s.id).collect(),
            afternoon_symptoms: entry.afternoon_symptoms.iter().map(|s| s.id).collect(),
            triggers: entry.triggers.iter().map(|t| t.id).collect(),
        }
    }

    pub fn set_date(&mut self, raw: &str) -> Result<(), FormError> {
        self.date = parse_form_date(raw)?;
        Ok(())
    }

    pub fn select_late_morning_symptoms<I, S>(&mut self, raw: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.late_morning_symptoms = parse_selection("symptom", raw)?;
        Ok(())
    }

    pub fn select_afternoon_symptoms<I, S>(&mut self, raw: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.afternoon_symptoms = parse_selection("symptom", raw)?;
        Ok(())
    }

    pub fn select_triggers<I, S>(&mut self, raw: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.triggers = parse_selection("trigger", raw)?;
        Ok(())
    }

    pub fn toggle_late_morning_symptom(&mut self, id: SymptomId) {
        toggle(&mut self.late_morning_symptoms, id);
    }

    pub fn toggle_afternoon_symptom(&mut self, id: SymptomId) {
        toggle(&mut self.afternoon_symptoms, id);
    }

    pub fn toggle_trigger(&mut self, id: TriggerId) {
        toggle(&mut self.triggers, id);
    }

    pub fn late_morning_symptoms(&self) -> &BTreeSet<SymptomId> {
        &self.late_morning_symptoms
    }

    pub fn afternoon_symptoms(&self) -> &BTreeSet<SymptomId> {
        &self.afternoon_symptoms
    }

    pub fn triggers(&self) -> &BTreeSet<TriggerId> {
        &self.triggers
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_payload(&self) -> DayPayload {
        DayPayload {
            date: self.date,
            comment: self.comment.clone(),
            late_morning_symptoms: self.late_morning_symptoms.iter().copied().collect(),
            afternoon_symptoms: self.afternoon_symptoms.iter().copied().collect(),
            triggers: self.triggers.iter().copied().collect(),
        }
    }
}
