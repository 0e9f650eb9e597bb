use std::{fs, path::Path, time::Duration};

use client_core::AppOptions;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "kudoboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub poll_interval_secs: u64,
    pub public_base_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000/api".into(),
            poll_interval_secs: 5,
            public_base_url: "http://localhost:8000".into(),
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }

    fn set_poll_interval(&mut self, raw: &str, warnings: &mut Vec<String>) {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => self.poll_interval_secs = secs,
            _ => {
                warnings.push(format!("ignoring invalid poll interval '{raw}'"));
                self.poll_interval_secs = Settings::default().poll_interval_secs;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    poll_interval_secs: Option<u64>,
    public_base_url: Option<String>,
    log_filter: Option<String>,
}

/// Defaults, then the optional config file, then the environment. Ignored
/// values are returned as warnings.
pub fn load_settings(path: &Path) -> (Settings, Vec<String>) {
    let mut settings = Settings::default();
    let mut warnings = Vec::new();
    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw, &mut warnings);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok(), &mut warnings);
    (settings, warnings)
}

fn apply_file(settings: &mut Settings, raw: &str, warnings: &mut Vec<String>) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warnings.push(format!("ignoring unreadable config file: {err}"));
            return;
        }
    };
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.poll_interval_secs {
        settings.set_poll_interval(&v.to_string(), warnings);
    }
    if let Some(v) = file_cfg.public_base_url {
        settings.public_base_url = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

fn apply_env(
    settings: &mut Settings,
    var: impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<String>,
) {
    if let Some(v) = var("KUDOBOARD_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("KUDOBOARD_POLL_INTERVAL_SECS") {
        settings.set_poll_interval(&v, warnings);
    }
    if let Some(v) = var("KUDOBOARD_PUBLIC_URL") {
        settings.public_base_url = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
