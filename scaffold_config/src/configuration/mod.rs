//! Layered settings for the scaffolding tool.
//!
//! Three sources feed a [`Configuration`]: base settings shipped with the
//! tool, managed settings the tool persists on the user's behalf, and
//! overrides from the user's own config file and property overrides. Later
//! sources win. Every effective setting must be known to the schema and
//! valid for its declared type, otherwise construction fails with every
//! offending name at once.

use crate::TypeToken;
use crate::converters::Converters;
use crate::errors::{ConfigError, InvalidSettingsBatch};
use crate::schema::{NAME_SEPARATOR, SettingsSchema};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

mod layers;
mod loader;

pub use layers::{Settings, flatten, shared_keys, unflatten};
pub use loader::{
    MANAGED_CONFIG_FILENAME, PROPERTY_OVERRIDE_PREFIX, init_configuration, managed_config_path,
};

/// The raw sources of a configuration, lowest precedence first.
#[derive(Debug, Clone, Default)]
pub struct Layers {
    pub base: Settings,
    pub managed: Settings,
    pub overrides: Settings,
}

#[derive(Clone)]
pub struct Configuration {
    settings: Settings,
    managed: Settings,
    overrides: Settings,
    schema: SettingsSchema,
    converters: Converters,
    json_config_file: PathBuf,
}

impl Configuration {
    /// Merges and validates the layers using the built-in converters.
    pub fn new(
        layers: Layers,
        schema: SettingsSchema,
        json_config_file: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Self::with_converters(layers, schema, Converters::global().clone(), json_config_file)
    }

    pub fn with_converters(
        layers: Layers,
        schema: SettingsSchema,
        converters: Converters,
        json_config_file: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let Layers {
            base,
            managed,
            overrides,
        } = layers;
        debug!(
            base = base.len(),
            managed = managed.len(),
            overrides = overrides.len(),
            "merging configuration layers"
        );

        let mut settings = base;
        settings.extend(managed.iter().map(|(k, v)| (k.clone(), v.clone())));
        settings.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut invalid = Vec::new();
        for (name, value) in &settings {
            if !schema.validate_setting(name, value, &converters)? {
                invalid.push(name.clone());
            }
        }
        if !invalid.is_empty() {
            return Err(InvalidSettingsBatch::new(invalid).into());
        }

        Ok(Self {
            settings,
            managed,
            overrides,
            schema,
            converters,
            json_config_file: json_config_file.into(),
        })
    }

    pub fn schema(&self) -> &SettingsSchema {
        &self.schema
    }

    pub fn json_config_file(&self) -> &Path {
        &self.json_config_file
    }

    /// Writes the managed settings to the managed JSON file.
    ///
    /// Returns the managed settings that the user's overrides hide, so the
    /// caller can warn that those values will not take effect.
    pub fn store_settings(&self) -> Result<Vec<String>, ConfigError> {
        let shared = shared_keys(&self.managed, &self.overrides);
        let path = &self.json_config_file;

        let json = serde_json::to_string_pretty(&Value::Object(unflatten(&self.managed)))
            .map_err(|e| ConfigError::json(path.display().to_string(), e))?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        fs::write(path, json).map_err(|e| ConfigError::io(path, e))?;

        debug!(path = %path.display(), hidden = shared.len(), "stored managed settings");
        Ok(shared)
    }

    /// The current value of a setting, `None` if it is known but unset.
    pub fn get_setting(&self, name: &str) -> Result<Option<&Value>, ConfigError> {
        self.require_setting_type(name)?;
        Ok(self.settings.get(name))
    }

    /// All settings underneath a partial name, keyed by the rest of their name.
    ///
    /// `get_sub_settings("templates.mappings")` returns `{"web": ..., ...}`.
    /// The result is empty when nothing under `root` is set.
    pub fn get_sub_settings(&self, root: &str) -> Result<Settings, ConfigError> {
        if self.schema.contains(root) {
            return Err(ConfigError::invalid_setting_with_message(
                root,
                None,
                format!("'{root}' has no sub-settings"),
            ));
        }
        if !self.schema.has_sub_settings(root) {
            return Err(ConfigError::UnknownSetting(root.to_string()));
        }

        let prefix = format!("{root}{NAME_SEPARATOR}");
        Ok(self
            .settings
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(prefix.as_str())
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect())
    }

    /// Every effective setting by its full dotted name.
    pub fn all_settings(&self) -> &Settings {
        &self.settings
    }

    pub fn managed_settings(&self) -> &Settings {
        &self.managed
    }

    /// Adds or replaces a setting. Text values are converted to the
    /// setting's type, anything else must already be of that type.
    ///
    /// Returns `false` when a user override hides the new value: it applies
    /// now but will not survive reloading the configuration.
    pub fn put_setting(&mut self, name: &str, value: impl Into<Value>) -> Result<bool, ConfigError> {
        let value = value.into();
        let setting_type = self.require_setting_type(name)?;

        let converted = self.convert(name, &value, &setting_type).map_err(|e| {
            debug!(setting = name, error = %e, "rejected setting value");
            ConfigError::invalid_setting(name, value.clone())
        })?;

        self.settings.insert(name.to_string(), converted.clone());
        self.managed.insert(name.to_string(), converted);
        Ok(!self.overrides.contains_key(name))
    }

    /// Adds one value to a list setting. The return value means the same as
    /// for [`Configuration::put_setting`].
    pub fn append_to_setting(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<bool, ConfigError> {
        let value = value.into();
        let setting_type = self.require_setting_type(name)?;
        let Some(element_type) = setting_type.element() else {
            return Err(ConfigError::invalid_setting_with_message(
                name,
                Some(value),
                format!("Setting '{name}' is not an array type, so you cannot add to it"),
            ));
        };

        let converted = self.convert(name, &value, element_type).map_err(|e| {
            debug!(setting = name, error = %e, "rejected setting value");
            ConfigError::invalid_setting(name, value.clone())
        })?;
        layers::append_value(&mut self.settings, name, converted.clone());
        layers::append_value(&mut self.managed, name, converted);
        Ok(!self.overrides.contains_key(name))
    }

    /// Removes a setting from the effective and managed settings.
    pub fn clear_setting(&mut self, name: &str) -> Result<(), ConfigError> {
        self.require_setting_type(name)?;
        self.settings.shift_remove(name);
        self.managed.shift_remove(name);
        Ok(())
    }

    fn require_setting_type(&self, name: &str) -> Result<TypeToken, ConfigError> {
        self.schema
            .setting_type(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownSetting(name.to_string()))
    }

    fn convert(&self, name: &str, value: &Value, value_type: &TypeToken) -> Result<Value, ConfigError> {
        let converter = self.converters.require_converter(value_type)?;
        match value {
            Value::String(raw) => converter.to_type(name, raw),
            other if converter.validate(other) => Ok(other.clone()),
            other => Err(ConfigError::invalid_setting(name, other.clone())),
        }
    }
}
