use crate::TypeToken;

/// No converter is registered for the type a setting was declared with.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct MissingConverter {
    requested_type: TypeToken,
    message: String,
}

impl MissingConverter {
    pub fn new(requested_type: TypeToken) -> Self {
        let message = format!(
            "No converter could be found for values of type {}",
            requested_type.qualified_name()
        );
        Self {
            requested_type,
            message,
        }
    }

    pub fn with_message(requested_type: TypeToken, message: impl Into<String>) -> Self {
        Self {
            requested_type,
            message: message.into(),
        }
    }

    pub fn requested_type(&self) -> &TypeToken {
        &self.requested_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
