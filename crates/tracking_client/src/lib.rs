//! Client-side session and tracking-state controller for the symptom
//! tracking service.
//!
//! [`TrackingSessionController`] owns the bearer session, the current view,
//! the overview cache and the entry forms, and talks to the service through
//! the [`TrackingService`] trait. [`HttpTrackingService`] is the reqwest
//! implementation used outside of tests.

pub mod commands;
pub mod config;
mod controller;
pub mod error;
pub mod events;
pub mod forms;
pub mod sequence;
pub mod service;
pub mod view;

pub use commands::ControllerCommand;
pub use config::{load_settings, load_settings_from, ClientSettings, DeletionPolicy};
pub use controller::{ControllerSnapshot, TrackingSessionController};
pub use error::{FailureKind, FormError, ServiceError};
pub use events::{ControllerEvent, ReferenceList};
pub use forms::{DayForm, SleepForm};
pub use service::{HttpTrackingService, TrackingService};
pub use view::{FormMode, OverviewCache, Severity, StatusMessage, ViewState};
