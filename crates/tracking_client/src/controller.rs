use std::{mem, sync::Arc};

use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    domain::TrackingKind,
    protocol::{EntryPayload, Symptom, TrackingEntry, TrackingListQuery, Trigger},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    commands::ControllerCommand,
    config::{ClientSettings, DeletionPolicy},
    error::{FailureKind, ServiceError},
    events::{ControllerEvent, ReferenceList},
    forms::{DayForm, SleepForm},
    sequence::{RequestSequencer, ResourceKey},
    service::{is_empty_listing, TrackingService},
    view::{FormMode, OverviewCache, StatusMessage, ViewState},
};

const NOT_LOGGED_IN: &str = "Please log in first.";
const EVENT_CAPACITY: usize = 256;

#[derive(Default)]
struct Session {
    token: Option<String>,
}

impl Session {
    fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }
}

#[derive(Default)]
struct ControllerState {
    session: Session,
    /// Bumped whenever a login is issued and on logout; responses from an
    /// older epoch are dropped.
    epoch: u64,
    symptoms: Vec<Symptom>,
    triggers: Vec<Trigger>,
    overview: OverviewCache,
    view: ViewState,
    status: Option<StatusMessage>,
    sleep_form: SleepForm,
    day_form: DayForm,
    edit_loading: bool,
    sequencer: RequestSequencer,
}

impl ControllerState {
    fn clear_form(&mut self, kind: TrackingKind) {
        match kind {
            TrackingKind::Sleep => self.sleep_form.clear(),
            TrackingKind::Day => self.day_form.clear(),
        }
    }

    fn payload(&self, kind: TrackingKind) -> EntryPayload {
        match kind {
            TrackingKind::Sleep => EntryPayload::Sleep(self.sleep_form.to_payload()),
            TrackingKind::Day => EntryPayload::Day(self.day_form.to_payload()),
        }
    }

    fn populate_form(&mut self, entry: &TrackingEntry) {
        match entry {
            TrackingEntry::Sleep(entry) => self.sleep_form = SleepForm::from_entry(entry),
            TrackingEntry::Day(entry) => self.day_form = DayForm::from_entry(entry),
        }
    }

    fn token(&self) -> Option<String> {
        self.session
            .is_authenticated()
            .then(|| self.session.token.clone())
            .flatten()
    }

    /// Form fields left over from an edit are stale once the user navigates away.
    fn discard_edit_leftovers(&mut self) {
        if let ViewState::TrackingForm {
            kind,
            mode: FormMode::Edit(_),
        } = self.view
        {
            self.clear_form(kind);
        }
        self.edit_loading = false;
    }
}

/// Read-only copy of everything a view needs to render.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub authenticated: bool,
    pub view: ViewState,
    pub status: Option<StatusMessage>,
    pub overview: OverviewCache,
    pub symptoms: Vec<Symptom>,
    pub triggers: Vec<Trigger>,
    pub sleep_form: SleepForm,
    pub day_form: DayForm,
    pub edit_loading: bool,
}

/// Owns one user's session and tracking state and drives every exchange with
/// the [`TrackingService`].
///
/// Operations never return errors: each outcome lands in the status message
/// and is broadcast as a [`ControllerEvent`].
pub struct TrackingSessionController {
    service: Arc<dyn TrackingService>,
    settings: ClientSettings,
    inner: Mutex<ControllerState>,
    reference_task: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<ControllerEvent>,
}

fn describe_failure(err: &ServiceError, failed: &str, transport: &str) -> String {
    match err {
        ServiceError::Transport(_) => transport.to_string(),
        _ => match err.server_detail() {
            Some(detail) => format!("{failed}: {detail}"),
            None => format!("{failed}."),
        },
    }
}

fn append_note(text: String, note: &str) -> String {
    if text.ends_with('.') {
        format!("{text} {note}")
    } else {
        format!("{text}. {note}")
    }
}

impl TrackingSessionController {
    pub fn new(service: Arc<dyn TrackingService>) -> Arc<Self> {
        Self::with_settings(service, ClientSettings::default())
    }

    pub fn with_settings(service: Arc<dyn TrackingService>, settings: ClientSettings) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            service,
            settings,
            inner: Mutex::new(ControllerState::default()),
            reference_task: Mutex::new(None),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let state = self.inner.lock().await;
        ControllerSnapshot {
            authenticated: state.session.is_authenticated(),
            view: state.view,
            status: state.status.clone(),
            overview: state.overview.clone(),
            symptoms: state.symptoms.clone(),
            triggers: state.triggers.clone(),
            sleep_form: state.sleep_form.clone(),
            day_form: state.day_form.clone(),
            edit_loading: state.edit_loading,
        }
    }

    pub async fn edit_sleep_form<R>(&self, edit: impl FnOnce(&mut SleepForm) -> R) -> R {
        let mut state = self.inner.lock().await;
        edit(&mut state.sleep_form)
    }

    pub async fn edit_day_form<R>(&self, edit: impl FnOnce(&mut DayForm) -> R) -> R {
        let mut state = self.inner.lock().await;
        edit(&mut state.day_form)
    }

    /// Runs `command` on the runtime and returns immediately.
    pub fn dispatch(self: &Arc<Self>, command: ControllerCommand) -> JoinHandle<()> {
        debug!(command = command.name(), "queued controller command");
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.execute(command).await })
    }

    pub async fn execute(self: &Arc<Self>, command: ControllerCommand) {
        match command {
            ControllerCommand::Login { username, password } => {
                self.login(&username, &password).await
            }
            ControllerCommand::Logout => self.logout().await,
            ControllerCommand::SelectTracking(kind) => self.select_tracking(kind).await,
            ControllerCommand::SelectOverview(kind) => self.select_overview(kind).await,
            ControllerCommand::LoadOverview {
                kind,
                start_date,
                end_date,
            } => {
                self.load_overview_in_range(kind, start_date, end_date)
                    .await
            }
            ControllerCommand::LoadSymptoms => self.load_symptoms().await,
            ControllerCommand::LoadTriggers => self.load_triggers().await,
            ControllerCommand::DeleteEntry { kind, index } => self.delete_entry(kind, index).await,
            ControllerCommand::SubmitCreate(kind) => self.submit_create(kind).await,
            ControllerCommand::BeginEdit { kind, index } => self.begin_edit(kind, index).await,
            ControllerCommand::SubmitUpdate(kind) => self.submit_update(kind).await,
        }
    }

    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }

    fn report(&self, state: &mut ControllerState, status: StatusMessage) {
        state.status = Some(status.clone());
        self.emit(ControllerEvent::Status(Some(status)));
    }

    fn fail(&self, state: &mut ControllerState, kind: FailureKind, message: String) {
        self.report(state, StatusMessage::error(message.clone()));
        self.emit(ControllerEvent::Failure { kind, message });
    }

    fn clear_status(&self, state: &mut ControllerState) {
        if state.status.take().is_some() {
            self.emit(ControllerEvent::Status(None));
        }
    }

    fn set_view(&self, state: &mut ControllerState, view: ViewState) {
        if state.view != view {
            state.view = view;
            self.emit(ControllerEvent::ViewChanged(view));
        }
    }

    /// Token of the active session, or an auth failure reported to the user.
    fn require_token(&self, state: &mut ControllerState) -> Option<String> {
        let token = state.token();
        if token.is_none() {
            self.fail(state, FailureKind::AuthFailure, NOT_LOGGED_IN.to_string());
        }
        token
    }

    /// Resets everything session-scoped. Sequence counters survive so numbers
    /// are never reused.
    fn end_session(&self, state: &mut ControllerState) {
        let was_authenticated = state.session.is_authenticated();
        let epoch = state.epoch + 1;
        let sequencer = mem::take(&mut state.sequencer);
        *state = ControllerState {
            epoch,
            sequencer,
            ..ControllerState::default()
        };
        if was_authenticated {
            self.emit(ControllerEvent::SessionChanged {
                authenticated: false,
            });
        }
        self.emit(ControllerEvent::ViewChanged(ViewState::Idle));
        self.emit(ControllerEvent::Status(None));
    }

    pub async fn login(self: &Arc<Self>, username: &str, password: &str) {
        let epoch = {
            let mut state = self.inner.lock().await;
            if state.session.is_authenticated() {
                info!("login: replacing active session");
                self.end_session(&mut state);
            }
            self.clear_status(&mut state);
            // A later login supersedes this one even if it answers first.
            state.epoch += 1;
            state.epoch
        };

        let result = self.service.login(username, password).await;

        let mut state = self.inner.lock().await;
        if state.epoch != epoch {
            debug!("login: discarding response for superseded session user={username}");
            return;
        }

        match result {
            Ok(token) => {
                state.session.token = Some(token.clone());
                self.clear_status(&mut state);
                drop(state);

                info!("login: authenticated user={username}");
                self.emit(ControllerEvent::SessionChanged {
                    authenticated: true,
                });
                self.spawn_reference_loading(token, epoch).await;
            }
            Err(err) => {
                warn!("login: rejected user={username} error={err}");
                let message = match &err {
                    ServiceError::Transport(_) => {
                        "Login failed: tracking service unreachable.".to_string()
                    }
                    _ => match err.server_detail() {
                        Some(detail) => format!("Login failed: {detail}"),
                        None => "Login failed".to_string(),
                    },
                };
                self.fail(&mut state, FailureKind::AuthFailure, message);
            }
        }
    }

    async fn spawn_reference_loading(self: &Arc<Self>, token: String, epoch: u64) {
        let controller = Arc::clone(self);
        let task = tokio::spawn(async move {
            futures::join!(
                controller.refresh_symptoms(&token, epoch),
                controller.refresh_triggers(&token, epoch)
            );
        });
        if let Some(previous) = self.reference_task.lock().await.replace(task) {
            previous.abort();
        }
    }

    /// Waits for the reference lists requested by the last login to settle.
    pub async fn settle_reference_lists(&self) {
        let task = self.reference_task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    pub async fn logout(&self) {
        if let Some(task) = self.reference_task.lock().await.take() {
            task.abort();
        }
        let mut state = self.inner.lock().await;
        if state.session.is_authenticated() {
            info!("logout: session cleared");
        }
        self.end_session(&mut state);
    }

    pub async fn load_symptoms(&self) {
        let (token, epoch) = {
            let mut state = self.inner.lock().await;
            let Some(token) = self.require_token(&mut state) else {
                return;
            };
            (token, state.epoch)
        };
        self.refresh_symptoms(&token, epoch).await;
    }

    pub async fn load_triggers(&self) {
        let (token, epoch) = {
            let mut state = self.inner.lock().await;
            let Some(token) = self.require_token(&mut state) else {
                return;
            };
            (token, state.epoch)
        };
        self.refresh_triggers(&token, epoch).await;
    }

    async fn refresh_symptoms(&self, token: &str, epoch: u64) {
        let seq = self
            .inner
            .lock()
            .await
            .sequencer
            .issue(ResourceKey::Symptoms);
        let result = self.service.list_symptoms(token).await;

        let mut state = self.inner.lock().await;
        if state.epoch != epoch || !state.sequencer.try_apply(ResourceKey::Symptoms, seq) {
            debug!("reference: discarding symptoms response seq={seq}");
            return;
        }
        match result {
            Ok(symptoms) => {
                info!("reference: symptoms loaded count={}", symptoms.len());
                let count = symptoms.len();
                state.symptoms = symptoms;
                self.emit(ControllerEvent::ReferenceListLoaded {
                    list: ReferenceList::Symptoms,
                    count,
                });
            }
            Err(err) => {
                warn!("reference: symptoms unavailable error={err}");
                self.emit(ControllerEvent::Failure {
                    kind: err.failure_kind(),
                    message: format!("Failed to load symptoms: {err}"),
                });
            }
        }
    }

    async fn refresh_triggers(&self, token: &str, epoch: u64) {
        let seq = self
            .inner
            .lock()
            .await
            .sequencer
            .issue(ResourceKey::Triggers);
        let result = self.service.list_triggers(token).await;

        let mut state = self.inner.lock().await;
        if state.epoch != epoch || !state.sequencer.try_apply(ResourceKey::Triggers, seq) {
            debug!("reference: discarding triggers response seq={seq}");
            return;
        }
        match result {
            Ok(triggers) => {
                info!("reference: triggers loaded count={}", triggers.len());
                let count = triggers.len();
                state.triggers = triggers;
                self.emit(ControllerEvent::ReferenceListLoaded {
                    list: ReferenceList::Triggers,
                    count,
                });
            }
            Err(err) => {
                warn!("reference: triggers unavailable error={err}");
                self.emit(ControllerEvent::Failure {
                    kind: err.failure_kind(),
                    message: format!("Failed to load triggers: {err}"),
                });
            }
        }
    }

    /// Opens an empty create form for `kind`.
    pub async fn select_tracking(&self, kind: TrackingKind) {
        let mut state = self.inner.lock().await;
        if self.require_token(&mut state).is_none() {
            return;
        }
        state.discard_edit_leftovers();
        self.clear_status(&mut state);
        self.set_view(
            &mut state,
            ViewState::TrackingForm {
                kind,
                mode: FormMode::Create,
            },
        );
    }

    /// Switches to the overview of `kind` and reloads it.
    pub async fn select_overview(&self, kind: TrackingKind) {
        {
            let mut state = self.inner.lock().await;
            if self.require_token(&mut state).is_none() {
                return;
            }
            state.discard_edit_leftovers();
            self.clear_status(&mut state);
            self.set_view(&mut state, ViewState::Overview { kind });
        }
        self.load_overview(kind).await;
    }

    pub async fn load_overview(&self, kind: TrackingKind) {
        self.load_overview_in_range(kind, None, None).await;
    }

    /// Replaces the overview cache with the service's current list for `kind`.
    pub async fn load_overview_in_range(
        &self,
        kind: TrackingKind,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) {
        let (token, epoch, seq) = {
            let mut state = self.inner.lock().await;
            let Some(token) = self.require_token(&mut state) else {
                return;
            };
            let seq = state.sequencer.issue(ResourceKey::Overview);
            (token, state.epoch, seq)
        };

        let query = TrackingListQuery {
            kind,
            start_date,
            end_date,
        };
        let result = self.service.list_entries(&token, &query).await;

        let mut state = self.inner.lock().await;
        if state.epoch != epoch {
            debug!("overview: discarding response for ended session kind={kind}");
            return;
        }
        if !state.sequencer.try_apply(ResourceKey::Overview, seq) {
            debug!("overview: discarding out-of-order response kind={kind} seq={seq}");
            return;
        }

        match result {
            Ok(entries) => {
                info!("overview: replaced kind={kind} entries={}", entries.len());
                state.overview.replace(kind, entries);
                self.emit(ControllerEvent::OverviewChanged {
                    kind,
                    len: state.overview.len(),
                });
            }
            Err(err) if is_empty_listing(&err, kind) => {
                info!("overview: no entries kind={kind}");
                state.overview.replace(kind, Vec::new());
                self.emit(ControllerEvent::OverviewChanged { kind, len: 0 });
                let text = err.server_detail().unwrap_or_default().to_string();
                self.report(&mut state, StatusMessage::info(text));
            }
            Err(err) => {
                warn!("overview: load failed kind={kind} error={err}");
                state.overview.stale = true;
                let message = describe_failure(&err, "Failed to load data", "Failed to load data.");
                self.fail(&mut state, err.failure_kind(), message);
            }
        }
    }

    /// Removes the entry at `index` from the overview at once, then asks the
    /// service to delete it. See [`DeletionPolicy`] for what a refusal does.
    pub async fn delete_entry(&self, kind: TrackingKind, index: usize) {
        let (token, epoch, removed) = {
            let mut state = self.inner.lock().await;
            let Some(token) = self.require_token(&mut state) else {
                return;
            };
            if !state.overview.holds(kind) || index >= state.overview.len() {
                self.fail(
                    &mut state,
                    FailureKind::ApplicationFailure,
                    format!("No {kind} entry at position {index}."),
                );
                return;
            }
            let removed = state.overview.entries.remove(index);
            state.sequencer.supersede(ResourceKey::Overview);
            self.emit(ControllerEvent::OverviewChanged {
                kind,
                len: state.overview.len(),
            });
            info!(
                "delete: optimistic removal kind={kind} id={} index={index}",
                removed.id()
            );
            (token, state.epoch, removed)
        };

        let id = removed.id();
        let result = self.service.delete_entry(&token, kind, id).await;

        let mut state = self.inner.lock().await;
        if state.epoch != epoch {
            debug!("delete: discarding outcome for ended session kind={kind} id={id}");
            return;
        }

        match result {
            Ok(()) => {
                info!("delete: confirmed kind={kind} id={id}");
                self.report(
                    &mut state,
                    StatusMessage::success(format!("{} entry deleted successfully.", kind.label())),
                );
            }
            Err(err) => {
                let failed = describe_failure(
                    &err,
                    &format!("Failed to delete {kind} entry"),
                    &format!("Failed to delete {kind} entry."),
                );
                match self.settings.deletion_policy {
                    DeletionPolicy::KeepRemoved => {
                        warn!("delete: not confirmed, entry stays removed kind={kind} id={id} error={err}");
                        state.overview.stale = true;
                        self.fail(
                            &mut state,
                            FailureKind::StaleDataRisk,
                            append_note(failed, "The overview may be out of date; reload it to resync."),
                        );
                    }
                    DeletionPolicy::RestoreOnFailure => {
                        let restorable = state.overview.holds(kind)
                            && !state.overview.entries.iter().any(|entry| entry.id() == id);
                        if restorable {
                            let at = index.min(state.overview.len());
                            state.overview.entries.insert(at, removed);
                            self.emit(ControllerEvent::OverviewChanged {
                                kind,
                                len: state.overview.len(),
                            });
                            warn!("delete: not confirmed, entry restored kind={kind} id={id} index={at} error={err}");
                            self.fail(
                                &mut state,
                                err.failure_kind(),
                                append_note(failed, "The entry was restored."),
                            );
                        } else {
                            warn!("delete: not confirmed, overview changed meanwhile kind={kind} id={id} error={err}");
                            state.overview.stale = true;
                            self.fail(&mut state, FailureKind::StaleDataRisk, failed);
                        }
                    }
                }
            }
        }
    }

    /// Sends the current form of `kind` as a new entry.
    pub async fn submit_create(&self, kind: TrackingKind) {
        let (token, epoch, payload) = {
            let mut state = self.inner.lock().await;
            let Some(token) = self.require_token(&mut state) else {
                return;
            };
            let expected = ViewState::TrackingForm {
                kind,
                mode: FormMode::Create,
            };
            if state.view != expected {
                self.fail(
                    &mut state,
                    FailureKind::ApplicationFailure,
                    format!("Open the {kind} form before submitting."),
                );
                return;
            }
            (token, state.epoch, state.payload(kind))
        };

        let result = self.service.create_entry(&token, &payload).await;

        let mut state = self.inner.lock().await;
        if state.epoch != epoch {
            debug!("create: discarding outcome for ended session kind={kind}");
            return;
        }

        match result {
            Ok(id) => {
                info!("create: added kind={kind} id={id}");
                state.clear_form(kind);
                if state.overview.holds(kind) {
                    state.overview.stale = true;
                }
                self.report(
                    &mut state,
                    StatusMessage::success(format!("{} entry {id} added successfully", kind.label())),
                );
            }
            Err(err) => {
                warn!("create: failed kind={kind} error={err}");
                let message = describe_failure(
                    &err,
                    &format!("Failed to add {kind} entry"),
                    &format!("Error occurred while inserting {kind} entry."),
                );
                self.fail(&mut state, err.failure_kind(), message);
            }
        }
    }

    /// Opens the edit form for the overview entry at `index` and fills it
    /// from the service's full copy of that entry.
    ///
    /// If the entry cannot be fetched the edit is abandoned: the form is
    /// cleared and the overview shown again.
    pub async fn begin_edit(&self, kind: TrackingKind, index: usize) {
        let (token, epoch, seq, id) = {
            let mut state = self.inner.lock().await;
            let Some(token) = self.require_token(&mut state) else {
                return;
            };
            let entry_id = if state.overview.holds(kind) {
                state.overview.entries.get(index).map(TrackingEntry::id)
            } else {
                None
            };
            let Some(id) = entry_id else {
                self.fail(
                    &mut state,
                    FailureKind::ApplicationFailure,
                    format!("No {kind} entry at position {index}."),
                );
                return;
            };

            state.discard_edit_leftovers();
            state.clear_form(kind);
            state.edit_loading = true;
            self.clear_status(&mut state);
            self.set_view(
                &mut state,
                ViewState::TrackingForm {
                    kind,
                    mode: FormMode::Edit(id),
                },
            );
            let seq = state.sequencer.issue(ResourceKey::EditEntry);
            (token, state.epoch, seq, id)
        };

        let result = self.service.fetch_entry(&token, kind, id).await;

        let mut state = self.inner.lock().await;
        let editing = ViewState::TrackingForm {
            kind,
            mode: FormMode::Edit(id),
        };
        if state.epoch != epoch || state.view != editing {
            debug!("edit: discarding entry for abandoned form kind={kind} id={id}");
            return;
        }
        if !state.sequencer.try_apply(ResourceKey::EditEntry, seq) {
            debug!("edit: discarding out-of-order entry kind={kind} id={id} seq={seq}");
            return;
        }
        state.edit_loading = false;

        let result = result.and_then(|entry| {
            if entry.kind() == kind && entry.id() == id {
                Ok(entry)
            } else {
                Err(ServiceError::Decode(format!(
                    "expected {kind} entry {id}, got {} entry {}",
                    entry.kind(),
                    entry.id()
                )))
            }
        });

        match result {
            Ok(entry) => {
                info!("edit: loaded kind={kind} id={id}");
                state.populate_form(&entry);
            }
            Err(err) => {
                warn!("edit: fetch failed, leaving edit kind={kind} id={id} error={err}");
                state.clear_form(kind);
                self.set_view(&mut state, ViewState::Overview { kind });
                let message = describe_failure(
                    &err,
                    "Failed to load tracking data",
                    "Failed to load tracking data.",
                );
                self.fail(&mut state, err.failure_kind(), message);
            }
        }
    }

    /// Sends the edit form back to the entry captured by [`Self::begin_edit`].
    pub async fn submit_update(&self, kind: TrackingKind) {
        let (token, epoch, id, payload) = {
            let mut state = self.inner.lock().await;
            let Some(token) = self.require_token(&mut state) else {
                return;
            };
            let id = match state.view {
                ViewState::TrackingForm {
                    kind: form_kind,
                    mode: FormMode::Edit(id),
                } if form_kind == kind => id,
                _ => {
                    self.fail(
                        &mut state,
                        FailureKind::ApplicationFailure,
                        format!("No {kind} entry is being edited."),
                    );
                    return;
                }
            };
            if state.edit_loading {
                self.fail(
                    &mut state,
                    FailureKind::ApplicationFailure,
                    "Entry is still loading.".to_string(),
                );
                return;
            }
            (token, state.epoch, id, state.payload(kind))
        };

        let result = self.service.update_entry(&token, id, &payload).await;

        let mut state = self.inner.lock().await;
        if state.epoch != epoch {
            debug!("update: discarding outcome for ended session kind={kind} id={id}");
            return;
        }

        match result {
            Ok(()) => {
                info!("update: saved kind={kind} id={id}");
                let editing = ViewState::TrackingForm {
                    kind,
                    mode: FormMode::Edit(id),
                };
                if state.view == editing {
                    state.clear_form(kind);
                    self.set_view(&mut state, ViewState::Idle);
                }
                if state.overview.holds(kind) {
                    state.overview.stale = true;
                }
                self.report(
                    &mut state,
                    StatusMessage::success(format!("{} entry updated successfully.", kind.label())),
                );
            }
            Err(err) => {
                warn!("update: failed kind={kind} id={id} error={err}");
                let message = describe_failure(
                    &err,
                    &format!("Failed to update {kind} entry"),
                    &format!("Error occurred while updating {kind} entry."),
                );
                self.fail(&mut state, err.failure_kind(), message);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
