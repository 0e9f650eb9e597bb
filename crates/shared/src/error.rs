use serde::{Deserialize, Serialize};

/// Body the board service returns alongside non-success statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new("Board not found")
    }
}
