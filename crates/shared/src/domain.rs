use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                raw.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(TrackingId);
id_newtype!(SymptomId);
id_newtype!(TriggerId);

/// The two tracking variants the service stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingKind {
    Sleep,
    Day,
}

impl TrackingKind {
    /// Path segment and `type` query value used by the service.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Day => "day",
        }
    }

    /// Capitalized label used in status texts ("Sleep entry ...").
    pub fn label(self) -> &'static str {
        match self {
            Self::Sleep => "Sleep",
            Self::Day => "Day",
        }
    }
}

impl fmt::Display for TrackingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tracking type '{0}' (expected sleep or day)")]
pub struct UnknownTrackingKind(pub String);

impl FromStr for TrackingKind {
    type Err = UnknownTrackingKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sleep" => Ok(Self::Sleep),
            "day" => Ok(Self::Day),
            other => Err(UnknownTrackingKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepQuality {
    Bad,
    Moderate,
    #[default]
    Good,
}

impl FromStr for SleepQuality {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bad" => Ok(Self::Bad),
            "moderate" => Ok(Self::Moderate),
            "good" => Ok(Self::Good),
            other => Err(format!(
                "unknown sleep quality '{other}' (expected bad, moderate or good)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCategory {
    Food,
    Environment,
    Lifestyle,
    Emotion,
    #[serde(other)]
    Other,
}
