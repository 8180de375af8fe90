use crate::TypeToken;
use crate::converters::Converters;
use crate::errors::ConfigError;
use indexmap::IndexMap;
use serde_json::Value;
use url::Url;

mod pattern;

pub use pattern::matches_pattern;

/// Separator between the segments of a setting name.
pub const NAME_SEPARATOR: char = '.';

/// One known setting: its (possibly wildcard) name and declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingKey {
    pub name: String,
    pub value_type: TypeToken,
}

impl SettingKey {
    pub fn new(name: impl Into<String>, value_type: TypeToken) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

/// The set of settings a configuration is allowed to contain.
///
/// Any name not matched by an entry is rejected as unknown, and every value
/// must validate against the converter for its entry's type.
#[derive(Debug, Clone, Default)]
pub struct SettingsSchema {
    /// Declaration order is kept so listings match the order settings were defined in.
    keys: IndexMap<String, SettingKey>,
}

#[derive(Debug, Default)]
pub struct SettingsSchemaBuilder {
    keys: Vec<SettingKey>,
}

impl SettingsSchemaBuilder {
    pub fn define(&mut self, name: impl Into<String>, value_type: TypeToken) -> &mut Self {
        self.keys.push(SettingKey::new(name, value_type));
        self
    }

    pub fn build(&mut self) -> Result<SettingsSchema, ConfigError> {
        SettingsSchema::try_from(std::mem::take(&mut self.keys))
    }
}

impl SettingsSchema {
    pub fn builder() -> SettingsSchemaBuilder {
        SettingsSchemaBuilder::default()
    }

    /// The settings understood by the scaffolding tool itself.
    pub fn scaffold_defaults() -> Self {
        let mut keys = IndexMap::new();
        for key in [
            SettingKey::new("config.file", TypeToken::of::<String>()),
            SettingKey::new("cache.dir", TypeToken::of::<String>()),
            SettingKey::new("git.name", TypeToken::of::<String>()),
            SettingKey::new("git.email", TypeToken::of::<String>()),
            SettingKey::new("options.logLevel", TypeToken::of::<String>()),
            SettingKey::new("options.verbose", TypeToken::of::<bool>()),
            SettingKey::new("options.quiet", TypeToken::of::<bool>()),
            SettingKey::new("options.info", TypeToken::of::<bool>()),
            SettingKey::new("templateRepositories", TypeToken::list_of::<String>()),
            SettingKey::new("templates.mappings.*", TypeToken::of::<Url>()),
            SettingKey::new("systemProp.*", TypeToken::of::<Value>()),
        ] {
            keys.insert(key.name.clone(), key);
        }
        Self { keys }
    }

    pub fn keys(&self) -> impl Iterator<Item = &SettingKey> {
        self.keys.values()
    }

    pub fn find_key(&self, name: &str) -> Option<&SettingKey> {
        self.keys.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    /// The declared type of a full setting name, looked up exactly and then
    /// through the wildcard entries (`templates.mappings.web` -> `templates.mappings.*`).
    pub fn setting_type(&self, name: &str) -> Option<&TypeToken> {
        self.keys
            .get(name)
            .or_else(|| self.matching_setting(name))
            .map(|k| &k.value_type)
    }

    /// The first entry that is `name` or whose pattern matches it.
    pub fn matching_setting(&self, name: &str) -> Option<&SettingKey> {
        self.keys
            .values()
            .find(|k| k.name == name || matches_pattern(&k.name, name))
    }

    /// Whether some known setting lives underneath `root`.
    pub fn has_sub_settings(&self, root: &str) -> bool {
        let prefix = format!("{root}{NAME_SEPARATOR}");
        self.keys
            .keys()
            .any(|k| k.starts_with(&prefix) || matches_pattern(k, root))
    }

    /// Checks a value against the setting it belongs to.
    ///
    /// Unknown names and types without a converter are errors; a value of the
    /// wrong shape is reported as `Ok(false)` so callers can collect every
    /// offending name before failing.
    pub fn validate_setting(
        &self,
        name: &str,
        value: &Value,
        converters: &Converters,
    ) -> Result<bool, ConfigError> {
        let key = self
            .matching_setting(name)
            .ok_or_else(|| ConfigError::UnknownSetting(name.to_string()))?;
        let converter = converters.require_converter(&key.value_type)?;
        Ok(value.is_null() || converter.validate(value))
    }
}

impl TryFrom<Vec<SettingKey>> for SettingsSchema {
    type Error = ConfigError;

    /// Creates a schema from its keys, rejecting names defined more than once.
    fn try_from(keys: Vec<SettingKey>) -> Result<Self, Self::Error> {
        let mut map = IndexMap::with_capacity(keys.len());
        for key in keys {
            if let Some(existing) = map.insert(key.name.clone(), key) {
                return Err(ConfigError::DuplicateSetting(existing.name));
            }
        }
        Ok(Self { keys: map })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MissingConverter;
    use serde_json::json;

    fn schema() -> SettingsSchema {
        SettingsSchema::scaffold_defaults()
    }

    #[test]
    fn test_setting_type_exact_and_wildcard() {
        let schema = schema();

        assert_eq!(schema.setting_type("git.name"), Some(&TypeToken::of::<String>()));
        assert_eq!(
            schema.setting_type("templates.mappings.spring"),
            Some(&TypeToken::of::<Url>())
        );
        assert_eq!(
            schema.setting_type("templateRepositories"),
            Some(&TypeToken::list_of::<String>())
        );
        assert_eq!(schema.setting_type("git"), None);
        assert_eq!(schema.setting_type("git.unknown"), None);
    }

    #[test]
    fn test_matching_setting() {
        let schema = schema();

        assert_eq!(
            schema.matching_setting("systemProp.http.proxyHost").map(|k| k.name.as_str()),
            Some("systemProp.*")
        );
        assert_eq!(schema.matching_setting("systemProp"), None);
        assert_eq!(
            schema.matching_setting("options.quiet").map(|k| k.name.as_str()),
            Some("options.quiet")
        );
    }

    #[test]
    fn test_has_sub_settings() {
        let schema = schema();

        assert!(schema.has_sub_settings("options"));
        assert!(schema.has_sub_settings("templates"));
        assert!(schema.has_sub_settings("templates.mappings"));
        assert!(schema.has_sub_settings("systemProp.http"));
        assert!(!schema.has_sub_settings("opt"));
        assert!(!schema.has_sub_settings("unknown"));
    }

    #[test]
    fn test_validate_setting() {
        let schema = schema();
        let converters = Converters::global();

        assert!(schema.validate_setting("options.verbose", &json!(true), converters).unwrap());
        assert!(!schema.validate_setting("options.verbose", &json!("true"), converters).unwrap());
        assert!(schema.validate_setting("git.name", &Value::Null, converters).unwrap());
        assert!(
            schema
                .validate_setting("templates.mappings.web", &json!("http://x.org/t.zip"), converters)
                .unwrap()
        );
        assert!(
            !schema
                .validate_setting("templateRepositories", &json!(["a", 2]), converters)
                .unwrap()
        );

        let res = schema.validate_setting("git.nmae", &json!("x"), converters);
        assert!(
            matches!(&res, Err(ConfigError::UnknownSetting(s)) if s == "git.nmae"),
            "Expected UnknownSetting error, but got {:?}",
            &res
        );
    }

    #[test]
    fn test_validate_setting_without_converter() {
        let schema = SettingsSchema::builder()
            .define("ratio", TypeToken::of::<f64>())
            .build()
            .unwrap();

        let res = schema.validate_setting("ratio", &json!(0.5), Converters::global());

        match res {
            Err(ConfigError::MissingConverter(err)) => {
                assert_eq!(err, MissingConverter::new(TypeToken::of::<f64>()));
            }
            _ => panic!("Expected MissingConverter error, but got {:?}", res),
        }
    }

    #[test]
    fn test_validate_setting_with_plain_vec_token() {
        let schema = SettingsSchema::builder()
            .define("repos", TypeToken::of::<Vec<String>>())
            .build()
            .unwrap();
        let converters = Converters::global();

        assert!(schema.validate_setting("repos", &json!(["a", "b"]), converters).unwrap());
        assert!(!schema.validate_setting("repos", &json!([1]), converters).unwrap());
    }

    #[test]
    fn test_duplicate_definition() {
        let res = SettingsSchema::builder()
            .define("git.name", TypeToken::of::<String>())
            .define("git.email", TypeToken::of::<String>())
            .define("git.name", TypeToken::of::<bool>())
            .build();

        assert!(matches!(res, Err(ConfigError::DuplicateSetting(s)) if s == "git.name"));
    }

    #[test]
    fn test_keys_keep_declaration_order() {
        let schema = SettingsSchema::builder()
            .define("b", TypeToken::of::<String>())
            .define("a", TypeToken::of::<String>())
            .build()
            .unwrap();

        let names: Vec<_> = schema.keys().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
