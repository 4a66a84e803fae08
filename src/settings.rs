use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::model::{Currency, InvoiceForm};

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub defaults: FormDefaults,
    pub window: WindowSettings,
}

/// Overrides for the sample invoice a session starts with.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub sender: Option<String>,
    pub client: Option<String>,
    pub service: Option<String>,
    pub price: Option<String>,
    pub invoice_no: Option<String>,
    pub notes: Option<String>,
    pub currency: Option<Currency>,
}

impl FormDefaults {
    pub fn apply(&self, mut form: InvoiceForm) -> InvoiceForm {
        let overrides = [
            (&mut form.sender, &self.sender),
            (&mut form.client, &self.client),
            (&mut form.service, &self.service),
            (&mut form.price, &self.price),
            (&mut form.invoice_no, &self.invoice_no),
            (&mut form.notes, &self.notes),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
        if let Some(currency) = self.currency {
            form.currency = currency;
        }
        form
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1180.0,
            height: 820.0,
        }
    }
}

pub fn config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "instant-invoice", "app") {
        return proj_dirs.config_dir().join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

pub fn parse(content: &str, path: &Path) -> Result<AppSettings, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads an explicitly requested settings file. Missing or broken is an error.
pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, path)
}

/// Loads the platform settings file, falling back to defaults when it is
/// absent or unusable.
pub fn load_default() -> AppSettings {
    let path = config_path();
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return AppSettings::default();
    }
    load_from(&path).unwrap_or_else(|err| {
        warn!(error = %err, "ignoring settings file");
        AppSettings::default()
    })
}
