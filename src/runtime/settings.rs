use std::path::Path;

use tracing::info;

use crate::config;
use crate::error::Result;

/// Load the config file. Any failure here ends the process.
pub fn load_settings(path: &Path) -> Result<config::Settings> {
    let settings = config::Settings::load(path)?;
    info!(
        path = %path.display(),
        mappings = settings.nfc_mappings.len(),
        "config loaded"
    );
    Ok(settings)
}
