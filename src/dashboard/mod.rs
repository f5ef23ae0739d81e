//! Device telemetry poller and chart updater.

pub mod advice;
pub mod chart;
pub mod controller;
pub mod poller;
pub mod time_range;
pub mod view;

pub use chart::{Chart, ChartRenderer, ChartUpdate, Units};
pub use controller::{Command, Dashboard, ParseCommandError};
pub use poller::Poller;
pub use time_range::{TimeRange, TimeWindow};
pub use view::{DashboardView, DeviceOption, LogView};
