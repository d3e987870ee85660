use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Failure of a single exchange with the tracking service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("tracking service unreachable: {0}")]
    Transport(String),
    #[error("tracking service answered {status}{}", detail_suffix(.detail))]
    Application { status: u16, detail: Option<String> },
    #[error("unreadable response from tracking service: {0}")]
    Decode(String),
    #[error("login response did not contain an access token")]
    MissingToken,
    #[error("invalid tracking service url: {0}")]
    InvalidUrl(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(": {detail}"),
        _ => String::new(),
    }
}

impl ServiceError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::TransportFailure,
            _ => FailureKind::ApplicationFailure,
        }
    }

    /// Server supplied message, only ever present for application failures.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            Self::Application { detail, .. } => detail.as_deref().filter(|d| !d.is_empty()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ServiceError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// User-facing classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    AuthFailure,
    TransportFailure,
    ApplicationFailure,
    /// A local optimistic change the service did not confirm.
    StaleDataRisk,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::AuthFailure => "auth failure",
            Self::TransportFailure => "transport failure",
            Self::ApplicationFailure => "application failure",
            Self::StaleDataRisk => "stale data risk",
        };
        f.write_str(text)
    }
}

/// Rejected form input, raised at the selection boundary before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("'{raw}' is not a valid {field} identifier")]
    InvalidTagId { field: &'static str, raw: String },
    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("'{0}' is not a valid duration in hours")]
    InvalidDuration(String),
}
