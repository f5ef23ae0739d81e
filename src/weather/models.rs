use serde::{Deserialize, Deserializer, Serialize};

/// One match from the geocoder's `/search?format=json`
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeMatch {
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(deserialize_with = "coordinate")]
    pub lon: f64,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// `lat,lon` as the grid lookup expects it (at most four decimals).
    #[must_use]
    pub fn to_point(&self) -> String {
        format!("{:.4},{:.4}", self.lat, self.lon)
    }
}

impl From<&GeocodeMatch> for Coordinates {
    fn from(m: &GeocodeMatch) -> Self {
        Self {
            lat: m.lat,
            lon: m.lon,
        }
    }
}

/// The geocoder reports coordinates as strings; accept numbers too.
fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Response from `/points/{lat},{lon}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointsResponse {
    #[serde(default)]
    pub properties: Option<PointsProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointsProperties {
    #[serde(default)]
    pub forecast: Option<String>,
}

impl PointsResponse {
    #[must_use]
    pub fn forecast_url(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.forecast.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Response from the forecast URL returned by the grid lookup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub properties: Option<ForecastProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub temperature: serde_json::Value,
    #[serde(default)]
    pub temperature_unit: String,
    #[serde(default)]
    pub short_forecast: String,
}

impl ForecastPeriod {
    /// `"{temperature} {unit}"`, e.g. `72 F`
    #[must_use]
    pub fn temperature_text(&self) -> String {
        let value = match &self.temperature {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        format!("{value} {}", self.temperature_unit)
    }
}

impl ForecastResponse {
    #[must_use]
    pub fn periods(&self) -> &[ForecastPeriod] {
        self.properties.as_ref().map_or(&[], |p| p.periods.as_slice())
    }
}

/// Last successfully fetched weather state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeatherSnapshot {
    pub current_temperature: String,
    pub current_conditions: String,
    pub forecast_conditions: String,
}

impl WeatherSnapshot {
    /// Build a snapshot from the current and next forecast periods.
    #[must_use]
    pub fn from_periods(current: &ForecastPeriod, next: &ForecastPeriod) -> Self {
        Self {
            current_temperature: current.temperature_text(),
            current_conditions: current.short_forecast.clone(),
            forecast_conditions: next.short_forecast.clone(),
        }
    }
}
