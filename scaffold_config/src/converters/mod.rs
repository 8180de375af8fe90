use crate::TypeToken;
use crate::errors::{ConfigError, MissingConverter};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

pub(crate) mod list;
pub(crate) mod scalar;
pub(crate) mod uri;

use list::ListConverter;
use scalar::{BooleanConverter, IntegerConverter, ObjectConverter, StringConverter};
use uri::UrlConverter;

/// Turns raw setting text into a stored value and checks stored values
/// against a setting's declared type.
///
/// It must be `Send + Sync` so the default registry can live in a static `Lazy` cell.
pub trait Converter: Send + Sync {
    /// Converts raw text (from the command line or the environment) into a value.
    fn to_type(&self, name: &str, raw: &str) -> Result<Value, ConfigError>;

    /// The text form of a value, as a user would type it.
    fn to_config_string(&self, value: &Value) -> String;

    /// Whether an already-typed value is acceptable for the setting.
    fn validate(&self, value: &Value) -> bool;
}

static DEFAULT_CONVERTERS: Lazy<Converters> = Lazy::new(Converters::default);

/// A registry of converters keyed by the type they produce.
///
/// Registering a converter for `T` also registers a list converter for
/// `Vec<T>`, so `TypeToken::of::<Vec<T>>()` and `TypeToken::list_of::<T>()`
/// resolve alike. Other list tokens get a list converter built around their
/// element's converter on lookup.
#[derive(Clone)]
pub struct Converters {
    converters: HashMap<TypeToken, Arc<dyn Converter>>,
}

impl Converters {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// The registry holding the built-in converters.
    pub fn global() -> &'static Converters {
        &DEFAULT_CONVERTERS
    }

    pub fn register<T: Any>(&mut self, converter: impl Converter + 'static) -> &mut Self {
        let converter: Arc<dyn Converter> = Arc::new(converter);
        self.converters.insert(
            TypeToken::list_of::<T>(),
            Arc::new(ListConverter::new(converter.clone())),
        );
        self.converters.insert(TypeToken::of::<T>(), converter);
        self
    }

    pub fn get_converter(&self, token: &TypeToken) -> Option<Arc<dyn Converter>> {
        if let Some(converter) = self.converters.get(token) {
            return Some(converter.clone());
        }
        let element = self.get_converter(token.element()?)?;
        Some(Arc::new(ListConverter::new(element)))
    }

    pub fn require_converter(&self, token: &TypeToken) -> Result<Arc<dyn Converter>, MissingConverter> {
        self.get_converter(token)
            .ok_or_else(|| MissingConverter::new(token.clone()))
    }
}

impl Default for Converters {
    fn default() -> Self {
        let mut converters = Self::empty();
        converters
            .register::<Value>(ObjectConverter)
            .register::<bool>(BooleanConverter)
            .register::<i64>(IntegerConverter)
            .register::<String>(StringConverter)
            .register::<Url>(UrlConverter);
        converters
    }
}

/// Text form shared by the scalar converters: strings unquoted, anything else as JSON.
pub(crate) fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
