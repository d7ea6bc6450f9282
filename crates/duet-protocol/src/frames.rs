use serde::{Deserialize, Serialize};

/// `GET /health` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthFrame {
    pub status: String,
    pub version: String,
}

impl HealthFrame {
    pub fn ok(version: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            version: version.into(),
        }
    }
}
