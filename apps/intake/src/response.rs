use serde::{Deserialize, Serialize};

/// JSON envelope returned by the submission and deletion endpoints.
///
/// `data` carries the user-facing confirmation or error message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope {
    pub success: bool,
    pub data: String,
}

impl ApiEnvelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: message.into(),
        }
    }
}
