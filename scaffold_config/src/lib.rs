//! Settings for a project-template scaffolding tool.
//!
//! A [`SettingsSchema`] lists the settings the tool understands and the type
//! each one holds. A [`Configuration`] merges settings from several sources
//! and checks every value against the schema through the registered
//! [`Converter`]s. Failures come back as [`ConfigError`]; the two that can
//! only be produced by validation are carried by [`InvalidSettingsBatch`]
//! (values that failed) and [`MissingConverter`] (a declared type nothing can
//! convert).

// Lets code generated by `#[derive(ScaffoldConfig)]` name this crate from inside it.
extern crate self as scaffold_config;

pub mod prelude;

mod configuration;
mod converters;
mod core;
mod errors;
mod schema;

pub use crate::configuration::{
    Configuration, Layers, MANAGED_CONFIG_FILENAME, PROPERTY_OVERRIDE_PREFIX, Settings, flatten,
    init_configuration, managed_config_path, shared_keys, unflatten,
};
pub use crate::converters::{Converter, Converters};
pub use crate::core::{FromConfiguration, SettingValue, TypeToken};
pub use crate::errors::{ConfigError, InvalidSettingsBatch, MissingConverter};
pub use crate::schema::{
    NAME_SEPARATOR, SettingKey, SettingsSchema, SettingsSchemaBuilder, matches_pattern,
};
pub use scaffold_config_macros::ScaffoldConfig;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}
