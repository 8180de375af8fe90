//! The `scaffold_config` prelude.

pub use crate::configuration::{Configuration, Layers, MANAGED_CONFIG_FILENAME, Settings, flatten};
pub use crate::converters::{Converter, Converters};
pub use crate::core::{FromConfiguration, SettingValue, TypeToken};
pub use crate::errors::{ConfigError, InvalidSettingsBatch, MissingConverter};
pub use crate::schema::SettingsSchema;
pub use scaffold_config_macros::ScaffoldConfig;
