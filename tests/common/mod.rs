//! In-memory fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use telemetry_dash::backend::{ClothingItem, DashboardApi, Device, SensorSample, UserProfile};
use telemetry_dash::common::AppState;
use telemetry_dash::config::Config;
use telemetry_dash::dashboard::{Chart, DashboardView, DeviceOption, TimeRange, TimeWindow};
use telemetry_dash::error::{AppError, AppResult};
use telemetry_dash::weather::models::{
    ForecastProperties, ForecastResponse, GeocodeMatch, PointsProperties, PointsResponse,
};
use telemetry_dash::weather::{Coordinates, WeatherApi, WeatherSnapshot};

/// Scripted outcome of a fake call.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Unauthorized,
    Fail,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> AppResult<T> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Unauthorized => Err(AppError::Unauthorized),
            Self::Fail => Err(AppError::Request("connection refused".to_string())),
        }
    }
}

type SampleFn = dyn Fn(i64, &TimeWindow) -> Reply<Vec<SensorSample>> + Send + Sync;

pub struct FakeBackend {
    pub profile: Mutex<Reply<UserProfile>>,
    pub devices: Mutex<Reply<Vec<Device>>>,
    pub samples: Mutex<Box<SampleFn>>,
    pub data_delay: Mutex<Duration>,
    pub wardrobe: Mutex<Reply<Vec<ClothingItem>>>,
    pub ai: Mutex<Reply<String>>,
    pub data_calls: Mutex<Vec<(i64, TimeWindow)>>,
    pub prompts: Mutex<Vec<String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            profile: Mutex::new(Reply::Ok(profile("Ada", "San Diego"))),
            devices: Mutex::new(Reply::Ok(vec![device(1, "D1")])),
            samples: Mutex::new(Box::new(|_, _| Reply::Ok(Vec::new()))),
            data_delay: Mutex::new(Duration::ZERO),
            wardrobe: Mutex::new(Reply::Ok(Vec::new())),
            ai: Mutex::new(Reply::Ok("Wear a jacket.".to_string())),
            data_calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn set_samples<F>(&self, f: F)
    where
        F: Fn(i64, &TimeWindow) -> Reply<Vec<SensorSample>> + Send + Sync + 'static,
    {
        *self.samples.lock().unwrap() = Box::new(f);
    }

    pub fn calls_for(&self, device_id: i64) -> usize {
        self.data_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == device_id)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.data_calls.lock().unwrap().len()
    }

    pub fn last_window(&self) -> Option<TimeWindow> {
        self.data_calls.lock().unwrap().last().map(|(_, w)| *w)
    }
}

#[async_trait]
impl DashboardApi for FakeBackend {
    async fn profile(&self) -> AppResult<UserProfile> {
        self.profile.lock().unwrap().get()
    }

    async fn devices(&self) -> AppResult<Vec<Device>> {
        self.devices.lock().unwrap().get()
    }

    async fn device_data(&self, device_id: i64, window: &TimeWindow) -> AppResult<Vec<SensorSample>> {
        self.data_calls.lock().unwrap().push((device_id, *window));
        let delay = *self.data_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let reply = (*self.samples.lock().unwrap())(device_id, window);
        reply.get()
    }

    async fn wardrobe(&self) -> AppResult<Vec<ClothingItem>> {
        self.wardrobe.lock().unwrap().get()
    }

    async fn ask_ai(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.ai.lock().unwrap().get()
    }
}

pub struct FakeWeather {
    pub matches: Mutex<Reply<Vec<GeocodeMatch>>>,
    pub points: Mutex<Reply<PointsResponse>>,
    pub forecast: Mutex<Reply<ForecastResponse>>,
    pub geocode_calls: Mutex<Vec<String>>,
    pub points_calls: Mutex<Vec<Coordinates>>,
    pub forecast_calls: Mutex<Vec<String>>,
}

impl Default for FakeWeather {
    fn default() -> Self {
        Self {
            matches: Mutex::new(Reply::Ok(vec![geocode_match(32.7157, -117.1611)])),
            points: Mutex::new(Reply::Ok(points("https://weather.test/gridpoints/SGX/1,2/forecast"))),
            forecast: Mutex::new(Reply::Ok(forecast(&[
                (72, "F", "Sunny"),
                (60, "F", "Partly Cloudy"),
            ]))),
            geocode_calls: Mutex::new(Vec::new()),
            points_calls: Mutex::new(Vec::new()),
            forecast_calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeWeather {
    pub fn total_calls(&self) -> (usize, usize, usize) {
        (
            self.geocode_calls.lock().unwrap().len(),
            self.points_calls.lock().unwrap().len(),
            self.forecast_calls.lock().unwrap().len(),
        )
    }
}

#[async_trait]
impl WeatherApi for FakeWeather {
    async fn geocode(&self, location: &str) -> AppResult<Vec<GeocodeMatch>> {
        self.geocode_calls.lock().unwrap().push(location.to_string());
        self.matches.lock().unwrap().get()
    }

    async fn points(&self, coordinates: &Coordinates) -> AppResult<PointsResponse> {
        self.points_calls.lock().unwrap().push(*coordinates);
        self.points.lock().unwrap().get()
    }

    async fn forecast(&self, url: &str) -> AppResult<ForecastResponse> {
        self.forecast_calls.lock().unwrap().push(url.to_string());
        self.forecast.lock().unwrap().get()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Profile { name: String, role: String },
    Location(String),
    Weather(WeatherSnapshot),
    Devices(Vec<DeviceOption>),
    Selected(Option<i64>),
    TimeFilter(TimeRange),
    Chart(Chart),
    Advice(String),
    AdviceHidden,
    RedirectToLogin,
}

#[derive(Default)]
pub struct RecordingView {
    pub events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn charts(&self) -> Vec<Chart> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Chart(chart) => Some(chart),
                _ => None,
            })
            .collect()
    }

    pub fn last_chart(&self) -> Option<Chart> {
        self.charts().pop()
    }

    pub fn advice(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Advice(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn redirects(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ViewEvent::RedirectToLogin))
            .count()
    }
}

impl DashboardView for RecordingView {
    fn show_profile(&self, name: &str, role: &str) {
        self.push(ViewEvent::Profile {
            name: name.to_string(),
            role: role.to_string(),
        });
    }

    fn show_location(&self, location: &str) {
        self.push(ViewEvent::Location(location.to_string()));
    }

    fn show_weather(&self, snapshot: &WeatherSnapshot) {
        self.push(ViewEvent::Weather(snapshot.clone()));
    }

    fn populate_devices(&self, options: &[DeviceOption]) {
        self.push(ViewEvent::Devices(options.to_vec()));
    }

    fn select_device(&self, device_id: Option<i64>) {
        self.push(ViewEvent::Selected(device_id));
    }

    fn set_time_filter(&self, range: TimeRange) {
        self.push(ViewEvent::TimeFilter(range));
    }

    fn render_chart(&self, chart: &Chart) {
        self.push(ViewEvent::Chart(chart.clone()));
    }

    fn show_advice(&self, message: &str) {
        self.push(ViewEvent::Advice(message.to_string()));
    }

    fn hide_advice(&self) {
        self.push(ViewEvent::AdviceHidden);
    }

    fn redirect_to_login(&self) {
        self.push(ViewEvent::RedirectToLogin);
    }
}

pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub weather: Arc<FakeWeather>,
    pub view: Arc<RecordingView>,
    pub state: AppState,
}

pub fn config_with(vars: &[(&str, &str)]) -> Config {
    Config::from_vars(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
            .or_else(|| (key == "DASHBOARD_SESSION_ID").then(|| "test-session".to_string()))
    })
    .expect("test config")
}

pub fn harness() -> Harness {
    harness_with(FakeBackend::default(), FakeWeather::default(), config_with(&[]))
}

pub fn harness_with(backend: FakeBackend, weather: FakeWeather, config: Config) -> Harness {
    let backend = Arc::new(backend);
    let weather = Arc::new(weather);
    let view = Arc::new(RecordingView::default());
    let state = AppState::new(config, backend.clone(), weather.clone(), view.clone());

    Harness {
        backend,
        weather,
        view,
        state,
    }
}

pub fn profile(name: &str, location: &str) -> UserProfile {
    UserProfile {
        id: Some(1),
        name: Some(name.to_string()),
        email: None,
        location: Some(location.to_string()),
        created_at: None,
    }
}

pub fn device(id: i64, device_id: &str) -> Device {
    Device {
        id,
        device_id: device_id.to_string(),
        mac_address: format!("AA:BB:CC:DD:EE:{id:02X}"),
    }
}

pub fn sample(timestamp: &str, temperature: f64, pressure: f64) -> SensorSample {
    SensorSample {
        timestamp: timestamp.to_string(),
        temperature: Some(temperature),
        temperature_unit: Some("C".to_string()),
        pressure: Some(pressure),
        pressure_unit: Some("hPa".to_string()),
    }
}

pub fn clothing(name: &str, color: Option<&str>) -> ClothingItem {
    ClothingItem {
        id: None,
        name: name.to_string(),
        color: color.map(str::to_string),
    }
}

pub fn geocode_match(lat: f64, lon: f64) -> GeocodeMatch {
    serde_json::from_value(serde_json::json!({
        "lat": lat.to_string(),
        "lon": lon.to_string(),
    }))
    .expect("geocode match")
}

pub fn points(forecast_url: &str) -> PointsResponse {
    PointsResponse {
        properties: Some(PointsProperties {
            forecast: Some(forecast_url.to_string()),
        }),
    }
}

pub fn forecast(periods: &[(i64, &str, &str)]) -> ForecastResponse {
    ForecastResponse {
        properties: Some(ForecastProperties {
            periods: periods
                .iter()
                .map(|(temperature, unit, short)| {
                    serde_json::from_value(serde_json::json!({
                        "temperature": temperature,
                        "temperatureUnit": unit,
                        "shortForecast": short,
                    }))
                    .expect("forecast period")
                })
                .collect(),
        }),
    }
}

/// Let spawned tasks run; with a paused clock this also advances time.
pub async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
