use crate::converters::{Converter, plain_text};
use crate::errors::ConfigError;
use serde_json::Value;
use std::sync::Arc;

/// Comma-separated lists whose elements go through another converter.
#[derive(Clone)]
pub struct ListConverter {
    element: Arc<dyn Converter>,
}

impl ListConverter {
    pub fn new(element: Arc<dyn Converter>) -> Self {
        Self { element }
    }
}

impl Converter for ListConverter {
    fn to_type(&self, name: &str, raw: &str) -> Result<Value, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        raw.split(',')
            .map(|item| self.element.to_type(name, item.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn to_config_string(&self, value: &Value) -> String {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| self.element.to_config_string(item))
                .collect::<Vec<_>>()
                .join(", "),
            other => plain_text(other),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Array(items) => items.iter().all(|item| self.element.validate(item)),
            _ => false,
        }
    }
}
