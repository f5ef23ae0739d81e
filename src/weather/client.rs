use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::weather::models::{Coordinates, ForecastResponse, GeocodeMatch, PointsResponse};

/// The three external lookups behind a weather snapshot.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Resolve free text to candidate coordinates, best match first.
    async fn geocode(&self, location: &str) -> AppResult<Vec<GeocodeMatch>>;

    /// Look up the forecast endpoint for a coordinate pair.
    async fn points(&self, coordinates: &Coordinates) -> AppResult<PointsResponse>;

    /// Fetch the forecast periods from an endpoint returned by [`WeatherApi::points`].
    async fn forecast(&self, url: &str) -> AppResult<ForecastResponse>;
}

pub struct WeatherClient {
    http_client: Client,
    geocoder_base_url: String,
    weather_base_url: String,
    geocode_cache: Cache<String, Vec<GeocodeMatch>>,
}

impl WeatherClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(config.http_user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        // Geocoder usage policy discourages repeated identical queries
        let geocode_cache = Cache::builder()
            .max_capacity(config.geocode_cache_max_entries)
            .time_to_live(Duration::from_secs(config.geocode_cache_ttl_seconds))
            .build();

        Ok(Self {
            http_client,
            geocoder_base_url: config.geocoder_base_url.clone(),
            weather_base_url: config.weather_base_url.clone(),
            geocode_cache,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> AppResult<T> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Http {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Parse(e.to_string()))
    }
}

#[async_trait]
impl WeatherApi for WeatherClient {
    async fn geocode(&self, location: &str) -> AppResult<Vec<GeocodeMatch>> {
        let key = location.trim().to_lowercase();
        if let Some(cached) = self.geocode_cache.get(&key).await {
            tracing::debug!(location = %location, "geocode_cache_hit");
            return Ok(cached);
        }

        let url = format!("{}/search", self.geocoder_base_url);
        let matches: Vec<GeocodeMatch> = self
            .get_json(&url, &[("q", location), ("format", "json")])
            .await?;

        // Empty results are not cached so a corrected profile location is retried
        if !matches.is_empty() {
            self.geocode_cache.insert(key, matches.clone()).await;
        }
        Ok(matches)
    }

    async fn points(&self, coordinates: &Coordinates) -> AppResult<PointsResponse> {
        let url = format!("{}/points/{}", self.weather_base_url, coordinates.to_point());
        self.get_json(&url, &[]).await
    }

    async fn forecast(&self, url: &str) -> AppResult<ForecastResponse> {
        self.get_json(url, &[]).await
    }
}
