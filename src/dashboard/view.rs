//! Rendering boundary of the dashboard.
//!
//! The controller never formats pages itself; it tells a [`DashboardView`]
//! what changed. [`LogView`] renders those changes as structured log lines.

use crate::backend::Device;
use crate::dashboard::chart::Chart;
use crate::dashboard::time_range::TimeRange;
use crate::weather::WeatherSnapshot;

pub const ROLE_LABEL: &str = "ESP32 Champion";
pub const DEVICE_PLACEHOLDER: &str = "Select a device";

/// One entry of the device selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOption {
    /// `None` for the placeholder entry.
    pub value: Option<i64>,
    pub label: String,
}

impl DeviceOption {
    /// Placeholder followed by one option per device, in list order.
    #[must_use]
    pub fn list(devices: &[Device]) -> Vec<Self> {
        std::iter::once(Self {
            value: None,
            label: DEVICE_PLACEHOLDER.to_string(),
        })
        .chain(devices.iter().map(|d| Self {
            value: Some(d.id),
            label: d.device_id.clone(),
        }))
        .collect()
    }
}

pub trait DashboardView: Send + Sync {
    fn show_profile(&self, name: &str, role: &str);

    fn show_location(&self, location: &str);

    fn show_weather(&self, snapshot: &WeatherSnapshot);

    fn populate_devices(&self, options: &[DeviceOption]);

    /// Reflect the selector value; `None` shows the placeholder.
    fn select_device(&self, device_id: Option<i64>);

    /// Highlight exactly the control for `range`.
    fn set_time_filter(&self, range: TimeRange);

    /// Redraw after the chart was created or updated.
    fn render_chart(&self, chart: &Chart);

    /// Open the advice panel with `message`.
    fn show_advice(&self, message: &str);

    fn hide_advice(&self);

    /// Leave the dashboard for the login page.
    fn redirect_to_login(&self);
}

/// View that writes every update to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogView;

impl DashboardView for LogView {
    fn show_profile(&self, name: &str, role: &str) {
        tracing::info!(name = %name, role = %role, "Profile");
    }

    fn show_location(&self, location: &str) {
        tracing::info!("Location: {location}");
    }

    fn show_weather(&self, snapshot: &WeatherSnapshot) {
        tracing::info!("Temperature: {}", snapshot.current_temperature);
        tracing::info!("Conditions: {}", snapshot.current_conditions);
        tracing::info!("Forecast: {}", snapshot.forecast_conditions);
    }

    fn populate_devices(&self, options: &[DeviceOption]) {
        for option in options {
            match option.value {
                Some(id) => tracing::info!(id, label = %option.label, "Device option"),
                None => tracing::info!(label = %option.label, "Device option"),
            }
        }
    }

    fn select_device(&self, device_id: Option<i64>) {
        tracing::info!(device_id = ?device_id, "Device selected");
    }

    fn set_time_filter(&self, range: TimeRange) {
        for control in TimeRange::ALL {
            tracing::debug!(control = %control, active = control == range, "Time filter");
        }
        tracing::info!(range = %range, "Time range");
    }

    fn render_chart(&self, chart: &Chart) {
        let Some(label) = chart.labels.last() else {
            tracing::info!(revision = chart.revision, "Chart empty");
            return;
        };

        let point = |data: &[Option<f64>]| match data.last().copied().flatten() {
            Some(value) => value.to_string(),
            None => "-".to_string(),
        };
        tracing::info!(
            points = chart.labels.len(),
            revision = chart.revision,
            "{label}  {}: {}  {}: {}",
            chart.y.title,
            point(&chart.temperature.data),
            chart.y1.title,
            point(&chart.pressure.data),
        );
    }

    fn show_advice(&self, message: &str) {
        tracing::info!("Advice: {message}");
    }

    fn hide_advice(&self) {
        tracing::debug!("Advice panel closed");
    }

    fn redirect_to_login(&self) {
        tracing::warn!("Session expired or missing, log in again at /login");
    }
}
