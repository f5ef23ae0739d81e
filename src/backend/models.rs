use serde::{Deserialize, Serialize};

/// Response from `GET /api/profile`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Name shown in the header, `User` when the account has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "User",
        }
    }

    /// Free-text location for the weather lookup, empty when unset.
    #[must_use]
    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or_default()
    }
}

/// One entry of `GET /api/devices`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Device {
    pub id: i64,
    pub device_id: String,
    #[serde(default)]
    pub mac_address: String,
}

/// One entry of `GET /api/devices/{id}/data`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorSample {
    /// Server-local `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    /// `None` for a missing reading; charted as a gap.
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub temperature_unit: Option<String>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub pressure_unit: Option<String>,
}

/// One entry of `GET /api/wardrobe`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClothingItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl ClothingItem {
    /// `"{color} {name}"`, or the bare name for colorless items.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.color.as_deref() {
            Some(color) if !color.is_empty() => format!("{color} {}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Body of `POST /api/ai`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    pub prompt: String,
}

/// Response from `POST /api/ai`; every level is optional so that a malformed
/// shape surfaces as a parse error at the client rather than a serde failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiResponse {
    #[serde(default)]
    pub result: Option<AiResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiResult {
    #[serde(default)]
    pub response: Option<String>,
}

impl AiResponse {
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        self.result
            .and_then(|r| r.response)
            .filter(|text| !text.is_empty())
    }
}
