/// One or more configuration settings hold values that failed validation.
///
/// The names are copied in on construction, so the batch never shares state
/// with the producer's collection and reads only ever see the original list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct InvalidSettingsBatch {
    setting_names: Vec<String>,
    message: String,
}

const DEFAULT_MESSAGE_PREFIX: &str = "The following configuration settings are invalid: ";

impl InvalidSettingsBatch {
    /// Creates a batch whose message lists every name, in order, separated by `", "`.
    pub fn new<I, S>(setting_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let setting_names: Vec<String> = setting_names.into_iter().map(Into::into).collect();
        let message = format!("{DEFAULT_MESSAGE_PREFIX}{}", setting_names.join(", "));
        Self {
            setting_names,
            message,
        }
    }

    /// Creates a batch with an explicit message. The names are still retained.
    pub fn with_message<I, S>(setting_names: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            setting_names: setting_names.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    pub fn setting_names(&self) -> &[String] {
        &self.setting_names
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
