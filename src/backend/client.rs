use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;

use crate::backend::models::{AiRequest, AiResponse, ClothingItem, Device, SensorSample, UserProfile};
use crate::config::Config;
use crate::dashboard::TimeWindow;
use crate::error::{AppError, AppResult};

/// Operations the dashboard needs from its own REST API.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn profile(&self) -> AppResult<UserProfile>;

    async fn devices(&self) -> AppResult<Vec<Device>>;

    async fn device_data(&self, device_id: i64, window: &TimeWindow) -> AppResult<Vec<SensorSample>>;

    async fn wardrobe(&self) -> AppResult<Vec<ClothingItem>>;

    /// Send a prompt to the AI proxy and return the generated text.
    async fn ask_ai(&self, prompt: &str) -> AppResult<String>;
}

pub struct BackendClient {
    http_client: Client,
    base_url: String,
    session_cookie: String,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(config.http_user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.dashboard_url.clone(),
            session_cookie: format!("sessionId={}", config.session_id),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http_client
            .get(format!("{}{path}", self.base_url))
            .header(header::ACCEPT, "application/json")
            .header(header::COOKIE, &self.session_cookie)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> AppResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Request(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }

        if !status.is_success() {
            return Err(AppError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Request(format!("Failed to get response text: {e}")))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::debug!(
                error = %e,
                body_preview = %text.chars().take(200).collect::<String>(),
                "Unexpected response body"
            );
            AppError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl DashboardApi for BackendClient {
    async fn profile(&self) -> AppResult<UserProfile> {
        Self::send_json(self.get("/api/profile")).await
    }

    async fn devices(&self) -> AppResult<Vec<Device>> {
        let devices: Option<Vec<Device>> = Self::send_json(self.get("/api/devices")).await?;
        Ok(devices.unwrap_or_default())
    }

    async fn device_data(&self, device_id: i64, window: &TimeWindow) -> AppResult<Vec<SensorSample>> {
        let request = self
            .get(&format!("/api/devices/{device_id}/data"))
            .query(&[
                ("start_date", window.start_param()),
                ("end_date", window.end_param()),
            ]);

        let samples: Option<Vec<SensorSample>> = Self::send_json(request).await?;
        Ok(samples.unwrap_or_default())
    }

    async fn wardrobe(&self) -> AppResult<Vec<ClothingItem>> {
        let items: Option<Vec<ClothingItem>> = Self::send_json(self.get("/api/wardrobe")).await?;
        Ok(items.unwrap_or_default())
    }

    async fn ask_ai(&self, prompt: &str) -> AppResult<String> {
        let request = self
            .http_client
            .post(format!("{}/api/ai", self.base_url))
            .header(header::COOKIE, &self.session_cookie)
            .json(&AiRequest {
                prompt: prompt.to_string(),
            });

        let response: AiResponse = Self::send_json(request).await?;
        response
            .into_text()
            .ok_or_else(|| AppError::Parse("Invalid AI response format".to_string()))
    }
}
