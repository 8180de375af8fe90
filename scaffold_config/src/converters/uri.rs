use crate::converters::{Converter, plain_text};
use crate::errors::ConfigError;
use serde_json::Value;
use url::Url;

/// Absolute URLs, stored as their normalized string form.
#[derive(Clone, Copy, Debug)]
pub struct UrlConverter;

impl Converter for UrlConverter {
    fn to_type(&self, name: &str, raw: &str) -> Result<Value, ConfigError> {
        Url::parse(raw.trim())
            .map(|url| Value::String(url.into()))
            .map_err(|e| ConfigError::InvalidValue {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    fn to_config_string(&self, value: &Value) -> String {
        plain_text(value)
    }

    fn validate(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            // `Url::parse` rejects relative references, which is what we want.
            Value::String(s) => Url::parse(s).is_ok(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_converter() {
        assert_eq!(
            UrlConverter
                .to_type("templates.mappings.web", "https://example.org/templates")
                .unwrap(),
            json!("https://example.org/templates")
        );
        assert_eq!(
            UrlConverter.to_type("u", "http://example.org").unwrap(),
            json!("http://example.org/")
        );

        let res = UrlConverter.to_type("u", "not a url");
        assert!(
            matches!(&res, Err(ConfigError::InvalidValue { name, .. }) if name == "u"),
            "Expected InvalidValue error, but got {:?}",
            res
        );
    }

    #[test]
    fn test_url_validation() {
        assert!(UrlConverter.validate(&Value::Null));
        assert!(UrlConverter.validate(&json!("file:///tmp/template.zip")));
        assert!(!UrlConverter.validate(&json!("relative/path")));
        assert!(!UrlConverter.validate(&json!(80)));
    }
}
