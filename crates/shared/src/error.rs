use serde::{Deserialize, Serialize};

/// One entry of a request-validation failure reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

/// Error body returned with non-success statuses: `{"detail": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: ErrorDetail,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Message(message.into()),
        }
    }

    /// Flattens the detail into a single line suitable for a status message.
    pub fn message(&self) -> String {
        match &self.detail {
            ErrorDetail::Message(message) => message.clone(),
            ErrorDetail::Validation(issues) => issues
                .iter()
                .map(|issue| match issue.loc.last() {
                    Some(serde_json::Value::String(field)) => format!("{field}: {}", issue.msg),
                    _ => issue.msg.clone(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        }
    }

    /// Parses a raw response body, returning `None` when it is not an error payload.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
