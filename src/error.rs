use std::path::PathBuf;

use thiserror::Error;

/// Why a logo upload was refused. Shown inline next to the upload control.
#[derive(Debug, Error)]
pub enum LogoError {
    #[error("Please upload an image file (PNG, JPG, SVG).")]
    InvalidType { media_type: String },

    #[error("Could not read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {name}: {reason}")]
    Decode { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
#[error("unknown currency `{0}` (expected USD, EUR or GBP)")]
pub struct UnknownCurrency(pub String);

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to start window: {0}")]
    Gui(#[from] eframe::Error),
}
