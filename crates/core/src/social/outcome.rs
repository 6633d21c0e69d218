use serde::{Deserialize, Serialize};

/// Result of one access operation: a success flag and a message for display.
///
/// Writes that create a row also report the new row's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            record_id: None,
        }
    }

    pub fn created(message: impl Into<String>, record_id: i64) -> Self {
        Self {
            success: true,
            message: message.into(),
            record_id: Some(record_id),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            record_id: None,
        }
    }

    /// The `(success, message)` pair.
    pub fn into_pair(self) -> (bool, String) {
        (self.success, self.message)
    }
}

impl<E: std::error::Error> From<E> for Outcome {
    fn from(err: E) -> Self {
        Self::failed(err.to_string())
    }
}
