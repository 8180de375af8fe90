use crate::converters::plain_text;
use serde_json::Value;
use std::path::PathBuf;

mod invalid_settings;
mod missing_converter;

pub use invalid_settings::InvalidSettingsBatch;
pub use missing_converter::MissingConverter;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidSettings(#[from] InvalidSettingsBatch),
    #[error(transparent)]
    MissingConverter(#[from] MissingConverter),
    #[error("Unknown configuration setting: '{0}'")]
    UnknownSetting(String),
    #[error("Missing required configuration setting: '{0}'")]
    MissingSetting(String),
    #[error("Configuration setting '{0}' is defined twice.")]
    DuplicateSetting(String),
    #[error("{message}")]
    InvalidSetting {
        name: String,
        value: Option<Value>,
        message: String,
    },
    #[error("Failed to convert setting '{name}': {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// A rejected value for `name`, described with the default wording.
    pub fn invalid_setting(name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        let message = format!(
            "The value '{}' is not valid for the setting '{name}'",
            plain_text(&value)
        );
        Self::InvalidSetting {
            name,
            value: Some(value),
            message,
        }
    }

    pub fn invalid_setting_with_message(
        name: impl Into<String>,
        value: Option<Value>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidSetting {
            name: name.into(),
            value,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            origin: origin.into(),
            source,
        }
    }
}
