use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use shared::domain::{SleepQuality, TrackingKind};
use tokio::sync::broadcast::Receiver;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracking_client::{
    load_settings, load_settings_from, ControllerEvent, ControllerSnapshot, DayForm,
    FormError, HttpTrackingService, Severity, SleepForm, StatusMessage,
    TrackingSessionController,
};

#[derive(Parser, Debug)]
#[command(name = "tracker", about = "Record and review sleep and day symptom entries")]
struct Cli {
    /// Settings file; `tracker.toml` in the working directory is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Symptoms,
    Triggers,
    Overview {
        #[arg(long)]
        kind: TrackingKind,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    AddSleep(SleepFields),
    AddDay(DayFields),
    /// Deletes the entry at a zero-based position of the overview.
    Delete {
        #[arg(long)]
        kind: TrackingKind,
        #[arg(long)]
        index: usize,
    },
    EditSleep {
        #[arg(long)]
        index: usize,
        #[command(flatten)]
        fields: SleepFields,
    },
    EditDay {
        #[arg(long)]
        index: usize,
        #[command(flatten)]
        fields: DayFields,
    },
}

#[derive(Args, Debug)]
struct SleepFields {
    #[arg(long)]
    date: Option<String>,
    /// Hours slept.
    #[arg(long)]
    duration: Option<String>,
    #[arg(long)]
    quality: Option<SleepQuality>,
    #[arg(long)]
    comment: Option<String>,
    /// Comma separated symptom ids.
    #[arg(long, value_delimiter = ',')]
    symptoms: Option<Vec<String>>,
}

impl SleepFields {
    fn apply(&self, form: &mut SleepForm) -> Result<(), FormError> {
        if let Some(date) = &self.date {
            form.set_date(date)?;
        }
        if let Some(duration) = &self.duration {
            form.set_duration(duration)?;
        }
        if let Some(quality) = self.quality {
            form.quality = quality;
        }
        if let Some(comment) = &self.comment {
            form.comment = comment.clone();
        }
        if let Some(symptoms) = &self.symptoms {
            form.select_symptoms(symptoms)?;
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
struct DayFields {
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    comment: Option<String>,
    #[arg(long, value_delimiter = ',')]
    late_morning_symptoms: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',')]
    afternoon_symptoms: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',')]
    triggers: Option<Vec<String>>,
}

impl DayFields {
    fn apply(&self, form: &mut DayForm) -> Result<(), FormError> {
        if let Some(date) = &self.date {
            form.set_date(date)?;
        }
        if let Some(comment) = &self.comment {
            form.comment = comment.clone();
        }
        if let Some(ids) = &self.late_morning_symptoms {
            form.select_late_morning_symptoms(ids)?;
        }
        if let Some(ids) = &self.afternoon_symptoms {
            form.select_afternoon_symptoms(ids)?;
        }
        if let Some(ids) = &self.triggers {
            form.select_triggers(ids)?;
        }
        Ok(())
    }
}

/// Which part of the controller state a command prints.
enum Report {
    Symptoms,
    Triggers,
    Overview,
    Forms,
}

async fn run(controller: &Arc<TrackingSessionController>, command: Command) -> Result<Report> {
    let report = match command {
        Command::Symptoms => {
            controller.load_symptoms().await;
            Report::Symptoms
        }
        Command::Triggers => {
            controller.load_triggers().await;
            Report::Triggers
        }
        Command::Overview { kind, from, to } => {
            controller.load_overview_in_range(kind, from, to).await;
            Report::Overview
        }
        Command::AddSleep(fields) => {
            controller.select_tracking(TrackingKind::Sleep).await;
            controller
                .edit_sleep_form(|form| fields.apply(form))
                .await
                .context("invalid sleep entry")?;
            controller.submit_create(TrackingKind::Sleep).await;
            Report::Forms
        }
        Command::AddDay(fields) => {
            controller.select_tracking(TrackingKind::Day).await;
            controller
                .edit_day_form(|form| fields.apply(form))
                .await
                .context("invalid day entry")?;
            controller.submit_create(TrackingKind::Day).await;
            Report::Forms
        }
        Command::Delete { kind, index } => {
            controller.select_overview(kind).await;
            controller.delete_entry(kind, index).await;
            Report::Overview
        }
        Command::EditSleep { index, fields } => {
            if open_edit(controller, TrackingKind::Sleep, index).await {
                controller
                    .edit_sleep_form(|form| fields.apply(form))
                    .await
                    .context("invalid sleep entry")?;
                controller.submit_update(TrackingKind::Sleep).await;
            }
            Report::Forms
        }
        Command::EditDay { index, fields } => {
            if open_edit(controller, TrackingKind::Day, index).await {
                controller
                    .edit_day_form(|form| fields.apply(form))
                    .await
                    .context("invalid day entry")?;
                controller.submit_update(TrackingKind::Day).await;
            }
            Report::Forms
        }
    };
    Ok(report)
}

/// Loads the overview and opens the edit form for the entry at `index`.
async fn open_edit(
    controller: &Arc<TrackingSessionController>,
    kind: TrackingKind,
    index: usize,
) -> bool {
    controller.select_overview(kind).await;
    controller.begin_edit(kind, index).await;
    controller.snapshot().await.view.editing_id().is_some()
}

fn print_status(status: Option<&StatusMessage>) {
    let Some(status) = status else {
        return;
    };
    let level = match status.severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Error => "error",
    };
    println!("[{level}] {}", status.text);
}

fn print_state(snapshot: &ControllerSnapshot, report: &Report) -> Result<()> {
    let rendered = match report {
        Report::Symptoms => serde_json::to_string_pretty(&snapshot.symptoms)?,
        Report::Triggers => serde_json::to_string_pretty(&snapshot.triggers)?,
        Report::Overview => serde_json::to_string_pretty(&snapshot.overview)?,
        Report::Forms => serde_json::to_string_pretty(snapshot)?,
    };
    println!("{rendered}");
    Ok(())
}

/// Failures that never reach the status line, such as reference lists that
/// could not be loaded after login.
fn print_background_failures(events: &mut Receiver<ControllerEvent>, status: Option<&StatusMessage>) {
    while let Ok(event) = events.try_recv() {
        if let ControllerEvent::Failure { kind, message } = event {
            if status.map(|s| s.text.as_str()) != Some(message.as_str()) {
                eprintln!("warning ({kind}): {message}");
            }
        }
    }
}

/// `RUST_LOG` when set, `info` otherwise.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    };
    if let Some(service_url) = cli.service_url {
        settings.service_url = service_url;
    }
    debug!(
        "tracker: settings service_url={} deletion_policy={:?}",
        settings.service_url, settings.deletion_policy
    );
    let service = HttpTrackingService::from_settings(&settings)
        .with_context(|| format!("cannot use tracking service at '{}'", settings.service_url))?;
    let controller = TrackingSessionController::with_settings(Arc::new(service), settings);
    let mut events = controller.subscribe_events();

    controller.login(&cli.username, &cli.password).await;
    controller.settle_reference_lists().await;

    let snapshot = controller.snapshot().await;
    if !snapshot.authenticated {
        print_status(snapshot.status.as_ref());
        return Ok(ExitCode::FAILURE);
    }

    let report = run(&controller, cli.command).await?;
    let snapshot = controller.snapshot().await;
    controller.logout().await;

    print_background_failures(&mut events, snapshot.status.as_ref());
    print_status(snapshot.status.as_ref());
    print_state(&snapshot, &report)?;

    if snapshot.status.as_ref().is_some_and(StatusMessage::is_error) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_default_filter() {
        std::env::set_var("RUST_LOG", "tracking_client=debug");
        assert_eq!(log_filter().to_string(), "tracking_client=debug");

        std::env::remove_var("RUST_LOG");
        assert_eq!(log_filter().to_string(), "info");
    }

    #[test]
    fn edit_command_accepts_field_overrides() {
        let cli = Cli::try_parse_from([
            "tracker",
            "--username",
            "alice@example.com",
            "--password",
            "secret",
            "edit-day",
            "--index",
            "2",
            "--triggers",
            "3,4",
        ])
        .expect("args");

        let Command::EditDay { index, fields } = cli.command else {
            panic!("expected edit-day");
        };
        assert_eq!(index, 2);
        let mut form = DayForm::default();
        fields.apply(&mut form).expect("apply");
        assert_eq!(form.triggers().len(), 2);
    }
}
