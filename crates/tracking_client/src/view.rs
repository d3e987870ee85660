use serde::Serialize;
use shared::{
    domain::{TrackingId, TrackingKind},
    protocol::TrackingEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "id")]
pub enum FormMode {
    Create,
    Edit(TrackingId),
}

/// Which screen the controller is driving. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "view")]
pub enum ViewState {
    #[default]
    Idle,
    TrackingForm {
        kind: TrackingKind,
        mode: FormMode,
    },
    Overview {
        kind: TrackingKind,
    },
}

impl ViewState {
    pub fn editing_id(&self) -> Option<TrackingId> {
        match self {
            Self::TrackingForm {
                mode: FormMode::Edit(id),
                ..
            } => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Local copy of the last overview the service returned.
///
/// `stale` is set whenever the copy is known to diverge from the service:
/// after a failed load, an unconfirmed deletion, or an update made elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverviewCache {
    pub kind: Option<TrackingKind>,
    pub entries: Vec<TrackingEntry>,
    pub stale: bool,
}

impl OverviewCache {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn holds(&self, kind: TrackingKind) -> bool {
        self.kind == Some(kind)
    }

    pub fn replace(&mut self, kind: TrackingKind, entries: Vec<TrackingEntry>) {
        self.kind = Some(kind);
        self.entries = entries;
        self.stale = false;
    }
}
