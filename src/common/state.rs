use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::backend::{DashboardApi, Device, UserProfile};
use crate::config::Config;
use crate::dashboard::{ChartRenderer, DashboardView, TimeRange};
use crate::weather::{WeatherApi, WeatherService, WeatherSnapshot};

/// Identifies what a device data request was issued for.
///
/// Results are applied only while the ticket is still current, so a response
/// for a deselected device or an old time range never reaches the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub device_id: i64,
    pub range: TimeRange,
    pub generation: u64,
}

/// Mutable dashboard state, one writer role per field.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Profile Loader
    pub profile: Option<UserProfile>,
    /// Device Selector
    pub devices: Vec<Device>,
    pub active_device: Option<i64>,
    /// Time-Range Filter
    pub time_range: TimeRange,
    /// Bumped on every device or time-range change
    pub generation: u64,
    /// Weather Fetcher; last successful lookup
    pub weather: WeatherSnapshot,
}

impl DashboardState {
    #[must_use]
    pub fn new(time_range: TimeRange) -> Self {
        Self {
            time_range,
            ..Self::default()
        }
    }

    /// Change the active device, invalidating outstanding requests.
    pub fn select_device(&mut self, device_id: Option<i64>) -> u64 {
        self.active_device = device_id;
        self.generation += 1;
        self.generation
    }

    /// Change the time range, invalidating outstanding requests.
    pub fn set_time_range(&mut self, range: TimeRange) -> u64 {
        self.time_range = range;
        self.generation += 1;
        self.generation
    }

    /// Ticket for a request about `device_id`, if it is the active device.
    #[must_use]
    pub fn ticket_for(&self, device_id: i64) -> Option<FetchTicket> {
        (self.active_device == Some(device_id)).then_some(FetchTicket {
            device_id,
            range: self.time_range,
            generation: self.generation,
        })
    }

    #[must_use]
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.generation == ticket.generation && self.active_device == Some(ticket.device_id)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn DashboardApi>,
    pub weather: WeatherService,
    pub view: Arc<dyn DashboardView>,
    pub dashboard: Arc<RwLock<DashboardState>>,
    pub chart: Arc<Mutex<ChartRenderer>>,
}

impl AppState {
    pub fn new(
        config: Config,
        backend: Arc<dyn DashboardApi>,
        weather_api: Arc<dyn WeatherApi>,
        view: Arc<dyn DashboardView>,
    ) -> Self {
        let dashboard = DashboardState::new(config.initial_time_range);

        Self {
            config: Arc::new(config),
            backend,
            weather: WeatherService::new(weather_api),
            view,
            dashboard: Arc::new(RwLock::new(dashboard)),
            chart: Arc::new(Mutex::new(ChartRenderer::new())),
        }
    }
}
