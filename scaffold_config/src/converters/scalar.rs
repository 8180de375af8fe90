use crate::converters::{Converter, plain_text};
use crate::errors::ConfigError;
use serde_json::Value;

fn invalid(name: &str, e: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message: e.to_string(),
    }
}

/// Booleans, accepted case-insensitively from text.
#[derive(Clone, Copy, Debug)]
pub struct BooleanConverter;

impl Converter for BooleanConverter {
    fn to_type(&self, name: &str, raw: &str) -> Result<Value, ConfigError> {
        raw.trim()
            .to_lowercase()
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|e| invalid(name, e))
    }

    fn to_config_string(&self, value: &Value) -> String {
        plain_text(value)
    }

    fn validate(&self, value: &Value) -> bool {
        value.is_boolean()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct IntegerConverter;

impl Converter for IntegerConverter {
    fn to_type(&self, name: &str, raw: &str) -> Result<Value, ConfigError> {
        raw.trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| invalid(name, e))
    }

    fn to_config_string(&self, value: &Value) -> String {
        plain_text(value)
    }

    fn validate(&self, value: &Value) -> bool {
        value.is_i64()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn to_type(&self, _name: &str, raw: &str) -> Result<Value, ConfigError> {
        Ok(Value::String(raw.trim().to_string()))
    }

    fn to_config_string(&self, value: &Value) -> String {
        plain_text(value)
    }

    fn validate(&self, value: &Value) -> bool {
        value.is_string()
    }
}

/// Settings that take any value at all, as long as one is set.
#[derive(Clone, Copy, Debug)]
pub struct ObjectConverter;

impl Converter for ObjectConverter {
    fn to_type(&self, _name: &str, raw: &str) -> Result<Value, ConfigError> {
        Ok(Value::String(raw.to_string()))
    }

    fn to_config_string(&self, value: &Value) -> String {
        plain_text(value)
    }

    fn validate(&self, value: &Value) -> bool {
        !value.is_null()
    }
}
