use crate::configuration::{Configuration, Layers, Settings, flatten};
use crate::converters::Converters;
use crate::errors::ConfigError;
use crate::schema::SettingsSchema;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the file the tool keeps its managed settings in, next to the user config.
pub const MANAGED_CONFIG_FILENAME: &str = "managed-config.json";

/// Properties whose key starts with this prefix override the setting named by the rest.
pub const PROPERTY_OVERRIDE_PREFIX: &str = "scaffold.";

const CONFIG_FILE_SETTING: &str = "config.file";

/// The managed settings file that belongs to a user config file.
pub fn managed_config_path(user_config_file: &Path) -> PathBuf {
    user_config_file
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(MANAGED_CONFIG_FILENAME)
}

/// Builds a configuration from its sources on disk.
///
/// 1. Loads the managed settings from `json_config_file`, if it exists.
/// 2. Loads the user's settings from `user_config_file`, if it exists.
/// 3. Applies property overrides (`scaffold.git.name=...`) on top of the
///    user's settings.
///
/// Overrides for unknown settings, or with values the setting's converter
/// rejects, are logged and kept as text so that validation reports them.
pub fn init_configuration<I>(
    schema: SettingsSchema,
    base: Settings,
    user_config_file: &Path,
    json_config_file: impl Into<PathBuf>,
    properties: I,
) -> Result<Configuration, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let json_config_file = json_config_file.into();
    let managed = load_settings_file(&json_config_file)?;
    let mut overrides = load_settings_file(user_config_file)?;
    apply_property_overrides(&schema, Converters::global(), &mut overrides, properties);

    Configuration::new(
        Layers {
            base,
            managed,
            overrides,
        },
        schema,
        json_config_file,
    )
}

impl Configuration {
    /// Locates the user config file and its managed settings file, then
    /// calls [`init_configuration`].
    ///
    /// The user config file is taken from the `scaffold.config.file`
    /// property, falling back to the `config.file` base setting.
    pub fn load<I>(schema: SettingsSchema, base: Settings, properties: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let properties: Vec<(String, String)> = properties.into_iter().collect();
        let override_key = format!("{PROPERTY_OVERRIDE_PREFIX}{CONFIG_FILE_SETTING}");

        let user_config_file = properties
            .iter()
            .find(|(key, _)| *key == override_key)
            .map(|(_, value)| PathBuf::from(value))
            .or_else(|| {
                base.get(CONFIG_FILE_SETTING)
                    .and_then(Value::as_str)
                    .map(PathBuf::from)
            })
            .ok_or_else(|| ConfigError::MissingSetting(CONFIG_FILE_SETTING.to_string()))?;
        let json_config_file = managed_config_path(&user_config_file);

        init_configuration(schema, base, &user_config_file, json_config_file, properties)
    }
}

/// Reads a JSON settings file; a missing or blank file holds no settings.
fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no settings file");
        return Ok(Settings::new());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    if content.trim().is_empty() {
        return Ok(Settings::new());
    }
    let map: Map<String, Value> = serde_json::from_str(&content)
        .map_err(|e| ConfigError::json(path.display().to_string(), e))?;
    Ok(flatten(&map))
}

fn apply_property_overrides<I>(
    schema: &SettingsSchema,
    converters: &Converters,
    overrides: &mut Settings,
    properties: I,
) where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, raw) in properties {
        let Some(name) = key.strip_prefix(PROPERTY_OVERRIDE_PREFIX) else {
            continue;
        };

        let converter = schema
            .setting_type(name)
            .and_then(|value_type| converters.get_converter(value_type));
        let value = match converter {
            Some(converter) => converter.to_type(name, &raw).unwrap_or_else(|e| {
                warn!(setting = name, value = %raw, error = %e, "invalid value in property override");
                Value::String(raw.clone())
            }),
            None => {
                warn!(setting = name, value = %raw, "unknown setting in property override");
                Value::String(raw.clone())
            }
        };
        overrides.insert(name.to_string(), value);
    }
}
