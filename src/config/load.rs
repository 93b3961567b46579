use std::{env, path::Path, path::PathBuf};

use super::schema::Settings;
use crate::error::{Error, Result};

const CONFIG_PATH_VAR: &str = "TAGPLAY_CONFIG_PATH";
const DEFAULT_CONFIG_FILE: &str = "config.json";

impl Settings {
    /// Load settings from `path`, with `TAGPLAY__` environment overrides on top.
    ///
    /// Unlike the optional sections, the file itself is required: without tag
    /// mappings there is nothing to play.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigMissing(path.to_path_buf()));
        }

        let cfg = ::config::Config::builder()
            .add_source(::config::File::from(path).required(true))
            .add_source(
                ::config::Environment::with_prefix("TAGPLAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::ConfigMalformed(e.to_string()))?;

        let settings: Settings = cfg
            .try_deserialize()
            .map_err(|e| Error::ConfigMalformed(e.to_string()))?;
        settings.validate().map_err(Error::ConfigMalformed)?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let volume = self.audio_settings.volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(format!(
                "audio_settings.volume must be between 0.0 and 1.0, got {volume}"
            ));
        }
        if self.reader.poll_interval_ms == 0 {
            return Err("reader.poll_interval_ms must be >= 1".to_string());
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("library.extensions must name at least one extension".to_string());
        }
        if let Some(id) = self.nfc_mappings.keys().find(|id| id.trim().is_empty()) {
            return Err(format!("nfc_mappings has an empty tag id: {id:?}"));
        }
        Ok(())
    }
}

/// Resolve the config path: explicit argument, then `TAGPLAY_CONFIG_PATH`,
/// then `config.json` in the working directory.
pub fn resolve_config_path(arg: Option<String>) -> PathBuf {
    if let Some(p) = arg.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(p);
    }
    if let Some(p) = env::var_os(CONFIG_PATH_VAR) {
        return PathBuf::from(p);
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
