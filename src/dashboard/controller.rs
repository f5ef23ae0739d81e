//! Dashboard controller.
//!
//! [`Dashboard`] owns the polling timer and reacts to [`Command`]s coming from
//! the UI. The data loaders are free functions over [`AppState`] so they can run
//! inside the polling task and in spawned tasks such as the advice request.
//!
//! Startup order:
//!
//! 1. create the chart
//! 2. concurrently: profile → weather, and device list → select first device
//! 3. polling runs until the selection is cleared or the dashboard is dropped

use chrono::Local;
use std::ops::ControlFlow;
use std::str::FromStr;
use tokio::sync::mpsc;

use crate::common::AppState;
use crate::dashboard::advice::{self, FALLBACK_MESSAGE, THINKING_MESSAGE};
use crate::dashboard::chart::{CANVAS_ID, ChartUpdate};
use crate::dashboard::poller::Poller;
use crate::dashboard::time_range::TimeRange;
use crate::dashboard::view::{DeviceOption, ROLE_LABEL};
use crate::error::AppError;
use crate::weather::Stage;

/// User actions the dashboard responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pick a device from the selector; `None` is the placeholder.
    SelectDevice(Option<i64>),
    SetTimeRange(TimeRange),
    RequestAdvice,
    DismissAdvice,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized command {0:?}")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().map(str::to_lowercase);
        let arg = words.next();

        let command = match (verb.as_deref(), arg) {
            (Some("device"), None | Some("none")) => Self::SelectDevice(None),
            (Some("device"), Some(id)) => {
                Self::SelectDevice(Some(id.parse().map_err(|_| ParseCommandError(s.to_string()))?))
            }
            (Some("range"), Some(range)) => {
                Self::SetTimeRange(range.parse().map_err(|_| ParseCommandError(s.to_string()))?)
            }
            (Some(range @ ("day" | "week")), None) => Self::SetTimeRange(
                range.parse().map_err(|_| ParseCommandError(s.to_string()))?,
            ),
            (Some("advice"), None) => Self::RequestAdvice,
            (Some("close"), None) => Self::DismissAdvice,
            _ => return Err(ParseCommandError(s.to_string())),
        };

        Ok(command)
    }
}

pub struct Dashboard {
    state: AppState,
    poller: Poller,
}

impl Dashboard {
    pub fn new(state: AppState) -> Self {
        let poller = Poller::new(state.config.poll_interval());
        Self { state, poller }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.is_active()
    }

    /// Page load: chart, then profile/weather and device list side by side.
    pub async fn start(&mut self) {
        tracing::info!("Starting dashboard");

        {
            let mut chart = self.state.chart.lock().await;
            let chart = chart.init(CANVAS_ID);
            self.state.view.render_chart(chart);
        }

        let range = self.state.dashboard.read().await.time_range;
        self.state.view.set_time_filter(range);
        self.state.view.hide_advice();

        let state = self.state.clone();
        futures::join!(load_profile(&state), self.init_devices());
    }

    /// Process commands until the sender side is dropped.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        while let Some(command) = commands.recv().await {
            self.handle(command).await;
        }

        self.poller.stop();
        tracing::info!("Command channel closed, dashboard stopped");
    }

    pub async fn handle(&mut self, command: Command) {
        tracing::debug!(?command, "Handling command");

        match command {
            Command::SelectDevice(device_id) => self.select_device(device_id).await,
            Command::SetTimeRange(range) => self.set_time_range(range).await,
            Command::RequestAdvice => {
                let state = self.state.clone();
                tokio::spawn(async move { show_advice(&state).await });
            }
            Command::DismissAdvice => self.state.view.hide_advice(),
        }
    }

    /// Device Selector: fill the selector and start polling the first device.
    pub async fn init_devices(&mut self) {
        let devices = match self.state.backend.devices().await {
            Ok(devices) => devices,
            Err(AppError::Unauthorized) => {
                self.state.view.redirect_to_login();
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load devices");
                return;
            }
        };

        tracing::info!(count = devices.len(), "Devices loaded");
        self.state.view.populate_devices(&DeviceOption::list(&devices));

        let first = devices.first().map(|d| d.id);
        self.state.dashboard.write().await.devices = devices;

        match first {
            Some(device_id) => self.select_device(Some(device_id)).await,
            None => clear_chart(&self.state).await,
        }
    }

    /// Switch polling to `device_id`, or stop and blank the chart for `None`.
    pub async fn select_device(&mut self, device_id: Option<i64>) {
        self.poller.stop();

        let generation = self.state.dashboard.write().await.select_device(device_id);
        self.state.view.select_device(device_id);
        tracing::info!(device_id = ?device_id, generation, "Active device changed");

        let Some(device_id) = device_id else {
            clear_chart(&self.state).await;
            return;
        };

        let state = self.state.clone();
        self.poller.start(move || {
            let state = state.clone();
            async move { load_device_data(&state, device_id).await }
        });
    }

    /// Time-Range Filter: switch the window and reload once, keeping the timer cadence.
    pub async fn set_time_range(&mut self, range: TimeRange) {
        let active = {
            let mut dashboard = self.state.dashboard.write().await;
            dashboard.set_time_range(range);
            dashboard.active_device
        };
        self.state.view.set_time_filter(range);

        // The reload runs on the polling task, so a 401 there also ends polling
        if let Some(device_id) = active
            && !self.poller.trigger()
        {
            tracing::debug!(device_id, "Polling inactive, time range change not reloaded");
        }
    }
}

/// Profile Loader, followed by the weather lookup for the profile location.
pub async fn load_profile(state: &AppState) {
    let profile = match state.backend.profile().await {
        Ok(profile) => profile,
        Err(AppError::Unauthorized) => {
            state.view.redirect_to_login();
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load profile");
            return;
        }
    };

    state.view.show_profile(profile.display_name(), ROLE_LABEL);
    let location = profile.location().to_string();
    state.dashboard.write().await.profile = Some(profile);

    load_weather(state, &location).await;
}

/// Weather Fetcher: only a complete lookup replaces the cached snapshot.
pub async fn load_weather(state: &AppState, location: &str) {
    state.view.show_location(location);

    match state.weather.resolve(location).await {
        Stage::Found(snapshot) => {
            tracing::info!(
                location = %location,
                temperature = %snapshot.current_temperature,
                "Weather updated"
            );
            state.view.show_weather(&snapshot);
            state.dashboard.write().await.weather = snapshot;
        }
        Stage::Empty(reason) => {
            tracing::warn!(location = %location, reason, "Weather lookup found nothing");
        }
        Stage::Failed(e) => {
            tracing::error!(location = %location, error = %e, "Weather lookup failed");
        }
    }
}

/// One fetch-and-render for `device_id` over the current time range.
///
/// Returns [`ControlFlow::Break`] when the session is gone and polling must end.
pub async fn load_device_data(state: &AppState, device_id: i64) -> ControlFlow<()> {
    let Some(ticket) = state.dashboard.read().await.ticket_for(device_id) else {
        return ControlFlow::Continue(());
    };

    let window = ticket.range.window(Local::now().naive_local());
    let samples = match state.backend.device_data(device_id, &window).await {
        Ok(samples) => samples,
        Err(AppError::Unauthorized) => {
            state.view.redirect_to_login();
            return ControlFlow::Break(());
        }
        Err(e) => {
            tracing::warn!(device_id, error = %e, "Failed to load device data");
            return ControlFlow::Continue(());
        }
    };

    // Hold the state lock until the chart is updated so a selection change
    // cannot slip in between the check and the redraw.
    let dashboard = state.dashboard.read().await;
    if !dashboard.is_current(&ticket) {
        tracing::debug!(device_id, generation = ticket.generation, "Discarding stale device data");
        return ControlFlow::Continue(());
    }

    let update = ChartUpdate::from_samples(&samples, ticket.range, &Local);
    let mut chart = state.chart.lock().await;
    match chart.apply(update) {
        Ok(chart) => state.view.render_chart(chart),
        Err(e) => tracing::error!(error = %e, "Failed to update chart"),
    }
    drop(dashboard);

    ControlFlow::Continue(())
}

/// AI Advice Panel: always ends with either the answer or the fallback text.
pub async fn show_advice(state: &AppState) {
    state.view.show_advice(THINKING_MESSAGE);

    let weather = state.dashboard.read().await.weather.clone();
    let message = match advice::request_advice(state.backend.as_ref(), &weather).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get outfit advice");
            FALLBACK_MESSAGE.to_string()
        }
    };

    state.view.show_advice(&message);
}

async fn clear_chart(state: &AppState) {
    let mut chart = state.chart.lock().await;
    match chart.clear() {
        Ok(chart) => state.view.render_chart(chart),
        Err(e) => tracing::error!(error = %e, "Failed to clear chart"),
    }
}
