use std::{collections::HashMap, fs, path::Path, str::FromStr, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "tracker.toml";

/// What happens to an optimistically removed entry when the service refuses
/// or never confirms the deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// The entry stays removed and the overview is flagged stale.
    #[default]
    KeepRemoved,
    /// The entry is put back at the position it was removed from.
    RestoreOnFailure,
}

impl FromStr for DeletionPolicy {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "keep_removed" => Ok(Self::KeepRemoved),
            "restore_on_failure" => Ok(Self::RestoreOnFailure),
            other => Err(anyhow::anyhow!(
                "unknown deletion policy '{other}' (expected keep_removed or restore_on_failure)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub service_url: String,
    pub request_timeout_secs: Option<u64>,
    pub deletion_policy: DeletionPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8000".into(),
            request_timeout_secs: None,
            deletion_policy: DeletionPolicy::KeepRemoved,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Defaults, then `tracker.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(DEFAULT_SETTINGS_FILE) {
        if let Err(err) = apply_file_overrides(&mut settings, &raw) {
            warn!("config: ignoring {DEFAULT_SETTINGS_FILE}: {err:#}");
        }
    }

    apply_env_overrides(&mut settings);
    settings
}

/// Like [`load_settings`] but with an explicit file that must exist and parse.
pub fn load_settings_from(path: &Path) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    apply_file_overrides(&mut settings, &raw)
        .with_context(|| format!("invalid settings file '{}'", path.display()))?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn apply_file_overrides(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;

    if let Some(v) = file_cfg.get("service_url").and_then(toml::Value::as_str) {
        settings.service_url = v.to_string();
    }
    match file_cfg.get("request_timeout_secs") {
        Some(toml::Value::Integer(secs)) => {
            settings.request_timeout_secs = u64::try_from(*secs).ok();
        }
        Some(toml::Value::String(secs)) => {
            settings.request_timeout_secs = Some(
                secs.parse()
                    .with_context(|| format!("invalid request_timeout_secs '{secs}'"))?,
            );
        }
        _ => {}
    }
    if let Some(v) = file_cfg.get("deletion_policy").and_then(toml::Value::as_str) {
        settings.deletion_policy = v.parse()?;
    }

    Ok(())
}

fn apply_env_overrides(settings: &mut ClientSettings) {
    if let Ok(v) = std::env::var("TRACKER_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }

    if let Ok(v) = std::env::var("APP__DELETION_POLICY") {
        match v.parse() {
            Ok(policy) => settings.deletion_policy = policy,
            Err(err) => warn!("config: ignoring APP__DELETION_POLICY: {err}"),
        }
    }
}
