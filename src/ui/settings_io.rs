use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ui::settings::AppSettings;

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("text-rpg-client");
    path.push("settings.json");
    path
}

pub fn load_settings() -> AppSettings {
    load_from(&settings_path())
}

pub fn save_settings(settings: &AppSettings) -> anyhow::Result<()> {
    save_to(&settings_path(), settings)
}

/// Missing or unreadable files yield defaults.
pub fn load_from(path: &Path) -> AppSettings {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            log::warn!("ignoring malformed settings at {}: {e}", path.display());
            AppSettings::default()
        }),
        Err(_) => AppSettings::default(),
    }
}

pub fn save_to(path: &Path, settings: &AppSettings) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating settings directory {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
    log::info!("settings saved to {}", path.display());
    Ok(())
}
