//! User actions that can be queued onto the runtime without awaiting them.

use chrono::NaiveDate;
use shared::domain::TrackingKind;

#[derive(Debug, Clone)]
pub enum ControllerCommand {
    Login {
        username: String,
        password: String,
    },
    Logout,
    SelectTracking(TrackingKind),
    SelectOverview(TrackingKind),
    LoadOverview {
        kind: TrackingKind,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
    LoadSymptoms,
    LoadTriggers,
    DeleteEntry {
        kind: TrackingKind,
        index: usize,
    },
    SubmitCreate(TrackingKind),
    BeginEdit {
        kind: TrackingKind,
        index: usize,
    },
    SubmitUpdate(TrackingKind),
}

impl ControllerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::SelectTracking(_) => "select_tracking",
            Self::SelectOverview(_) => "select_overview",
            Self::LoadOverview { .. } => "load_overview",
            Self::LoadSymptoms => "load_symptoms",
            Self::LoadTriggers => "load_triggers",
            Self::DeleteEntry { .. } => "delete_entry",
            Self::SubmitCreate(_) => "submit_create",
            Self::BeginEdit { .. } => "begin_edit",
            Self::SubmitUpdate(_) => "submit_update",
        }
    }
}
