/// Implements `SettingValue` for types stored as a JSON scalar with a
/// matching `serde_json::Value` accessor.
macro_rules! impl_setting_value_for_json_scalar {
    ($($t:ty => $accessor:ident, $expected:literal);* $(;)?) => {
        $(
            impl SettingValue for $t {
                fn type_token() -> TypeToken {
                    TypeToken::of::<$t>()
                }

                fn from_setting(name: &str, value: Option<&Value>) -> Result<Self, ConfigError> {
                    let value = require_present(name, value)?;
                    value
                        .$accessor()
                        .ok_or_else(|| mismatch(name, $expected, value))
                }
            }
        )*
    };
}
