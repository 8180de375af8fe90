use crate::Configuration;
use crate::errors::ConfigError;
use crate::schema::SettingsSchema;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use url::Url;

#[macro_use]
mod macros;

/// A runtime handle on the type a setting is declared with.
///
/// Two tokens are equal when they were created for the same Rust type; the
/// qualified name only exists for rendering. List tokens also remember the
/// token of their element type, which is what converter lookup and
/// `Configuration::append_to_setting` work from.
#[derive(Clone, Debug)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
    element: Option<Box<TypeToken>>,
}

impl TypeToken {
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            element: None,
        }
    }

    /// Token for `Vec<T>` that knows its element type.
    pub fn list_of<T: Any>() -> Self {
        Self::list_with_element::<T>(TypeToken::of::<T>())
    }

    pub(crate) fn list_with_element<T: Any>(element: TypeToken) -> Self {
        Self {
            id: TypeId::of::<Vec<T>>(),
            name: std::any::type_name::<Vec<T>>(),
            element: Some(Box::new(element)),
        }
    }

    /// The canonical path of the type, e.g. `alloc::string::String`.
    pub fn qualified_name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn element(&self) -> Option<&TypeToken> {
        self.element.as_deref()
    }

    pub fn is_list(&self) -> bool {
        self.element.is_some()
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The bridge between stored setting values and typed Rust fields.
///
/// `type_token` is what a field contributes to a derived schema, and
/// `from_setting` reads the field back out of a `Configuration`. The
/// `ScaffoldConfig` derive macro generates calls to both for every field.
pub trait SettingValue: Sized {
    fn type_token() -> TypeToken;

    /// Reads a typed value. `value` is `None` when the setting is not set.
    fn from_setting(name: &str, value: Option<&Value>) -> Result<Self, ConfigError>;
}

/// Implemented by structs that derive `ScaffoldConfig`.
pub trait FromConfiguration: Sized {
    /// The schema made of the struct's own fields.
    fn settings_schema() -> Result<&'static SettingsSchema, ConfigError>;

    fn from_configuration(config: &Configuration) -> Result<Self, ConfigError>;
}

fn require_present<'a>(name: &str, value: Option<&'a Value>) -> Result<&'a Value, ConfigError> {
    match value {
        None | Some(Value::Null) => Err(ConfigError::MissingSetting(name.to_string())),
        Some(v) => Ok(v),
    }
}

fn mismatch(name: &str, expected: &str, found: &Value) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message: format!("expected {expected}, found {found}"),
    }
}

impl_setting_value_for_json_scalar!(
    bool => as_bool, "a boolean";
    i64 => as_i64, "an integer";
);

impl SettingValue for String {
    fn type_token() -> TypeToken {
        TypeToken::of::<String>()
    }

    fn from_setting(name: &str, value: Option<&Value>) -> Result<Self, ConfigError> {
        let value = require_present(name, value)?;
        value
            .as_str()
            .map(String::from)
            .ok_or_else(|| mismatch(name, "a string", value))
    }
}

impl SettingValue for Url {
    fn type_token() -> TypeToken {
        TypeToken::of::<Url>()
    }

    fn from_setting(name: &str, value: Option<&Value>) -> Result<Self, ConfigError> {
        let value = require_present(name, value)?;
        let raw = value
            .as_str()
            .ok_or_else(|| mismatch(name, "a URL string", value))?;
        Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}

/// Settings declared as `Value` accept anything that is set.
impl SettingValue for Value {
    fn type_token() -> TypeToken {
        TypeToken::of::<Value>()
    }

    fn from_setting(name: &str, value: Option<&Value>) -> Result<Self, ConfigError> {
        require_present(name, value).cloned()
    }
}

impl<T: SettingValue + Any> SettingValue for Vec<T> {
    fn type_token() -> TypeToken {
        TypeToken::list_with_element::<T>(T::type_token())
    }

    fn from_setting(name: &str, value: Option<&Value>) -> Result<Self, ConfigError> {
        match require_present(name, value)? {
            Value::Array(items) => items
                .iter()
                .map(|item| T::from_setting(name, Some(item)))
                .collect(),
            // A list setting may be configured with one bare value.
            single => Ok(vec![T::from_setting(name, Some(single))?]),
        }
    }
}

impl<T: SettingValue> SettingValue for Option<T> {
    fn type_token() -> TypeToken {
        T::type_token()
    }

    fn from_setting(name: &str, value: Option<&Value>) -> Result<Self, ConfigError> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(v) => T::from_setting(name, Some(v)).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tokens_compare_by_type() {
        assert_eq!(TypeToken::of::<String>(), TypeToken::of::<String>());
        assert_ne!(TypeToken::of::<String>(), TypeToken::of::<bool>());
        assert_eq!(
            TypeToken::of::<String>().qualified_name(),
            TypeToken::of::<String>().qualified_name()
        );
        assert_eq!(TypeToken::of::<Url>().qualified_name(), "url::Url");
    }

    #[test]
    fn test_list_token_knows_its_element() {
        let token = <Vec<String> as SettingValue>::type_token();

        assert_eq!(token, TypeToken::list_of::<String>());
        assert_eq!(token, TypeToken::of::<Vec<String>>());
        assert!(token.is_list());
        assert_eq!(token.element(), Some(&TypeToken::of::<String>()));
    }

    #[test]
    fn test_option_shares_the_inner_token() {
        assert_eq!(
            <Option<bool> as SettingValue>::type_token(),
            TypeToken::of::<bool>()
        );
    }

    #[test]
    fn test_scalars_read_from_json() {
        assert!(bool::from_setting("options.quiet", Some(&json!(true))).unwrap());
        assert_eq!(i64::from_setting("test.my.option", Some(&json!(12))).unwrap(), 12);
        assert_eq!(
            String::from_setting("git.name", Some(&json!("Peter"))).unwrap(),
            "Peter"
        );
        assert_eq!(
            Url::from_setting("templates.mappings.web", Some(&json!("https://example.org/t.zip")))
                .unwrap()
                .as_str(),
            "https://example.org/t.zip"
        );
    }

    #[test]
    fn test_missing_and_mismatched_values() {
        let res = i64::from_setting("test.my.option", None);
        assert!(matches!(&res, Err(ConfigError::MissingSetting(s)) if s == "test.my.option"));

        let res = bool::from_setting("options.quiet", Some(&json!("yes")));
        assert!(
            matches!(&res, Err(ConfigError::InvalidValue { name, message })
                if name == "options.quiet" && message == "expected a boolean, found \"yes\""),
            "Expected InvalidValue error, but got {:?}",
            &res
        );
    }

    #[test]
    fn test_lists_and_options() {
        let names = Vec::<String>::from_setting("repos", Some(&json!(["a", "b"]))).unwrap();
        assert_eq!(names, vec!["a", "b"]);

        let single = Vec::<String>::from_setting("repos", Some(&json!("a"))).unwrap();
        assert_eq!(single, vec!["a"]);

        assert_eq!(Option::<String>::from_setting("git.email", None).unwrap(), None);
        assert_eq!(
            Option::<String>::from_setting("git.email", Some(&Value::Null)).unwrap(),
            None
        );
    }
}
