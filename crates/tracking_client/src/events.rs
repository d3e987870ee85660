//! Notifications a view subscribes to so it can re-render from controller state.

use shared::domain::TrackingKind;

use crate::{
    error::FailureKind,
    view::{StatusMessage, ViewState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceList {
    Symptoms,
    Triggers,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    SessionChanged {
        authenticated: bool,
    },
    ViewChanged(ViewState),
    /// `None` when the status line was cleared.
    Status(Option<StatusMessage>),
    OverviewChanged {
        kind: TrackingKind,
        len: usize,
    },
    ReferenceListLoaded {
        list: ReferenceList,
        count: usize,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}
