//! Chart Renderer: a single two-axis line chart (temperature left, pressure right)
//! whose labels, values and unit titles are replaced in place on every update.

use chrono::TimeZone;
use std::fmt;

use crate::backend::SensorSample;
use crate::dashboard::time_range::{TimeRange, sample_label};
use crate::error::{AppError, AppResult};

pub const CANVAS_ID: &str = "deviceDataChart";

pub const DEFAULT_TEMPERATURE_UNIT: &str = "°C";
pub const DEFAULT_PRESSURE_UNIT: &str = "Pa";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Units {
    pub temperature: String,
    pub pressure: String,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE_UNIT.to_string(),
            pressure: DEFAULT_PRESSURE_UNIT.to_string(),
        }
    }
}

impl Units {
    pub fn new(temperature: impl Into<String>, pressure: impl Into<String>) -> Self {
        Self {
            temperature: temperature.into(),
            pressure: pressure.into(),
        }
    }

    /// Units reported by the first sample, defaults when absent.
    #[must_use]
    pub fn from_samples(samples: &[SensorSample]) -> Self {
        let defaults = Self::default();
        let Some(first) = samples.first() else {
            return defaults;
        };

        Self {
            temperature: first
                .temperature_unit
                .clone()
                .unwrap_or(defaults.temperature),
            pressure: first.pressure_unit.clone().unwrap_or(defaults.pressure),
        }
    }

    #[must_use]
    pub fn temperature_title(&self) -> String {
        format!("Temperature ({})", self.temperature)
    }

    #[must_use]
    pub fn pressure_title(&self) -> String {
        format!("Pressure ({})", self.pressure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPosition {
    Left,
    Right,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub id: &'static str,
    pub position: AxisPosition,
    pub title: String,
    /// Whether this axis draws gridlines across the plot area.
    pub draw_on_chart_area: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    /// One point per label; `None` leaves a gap in the line.
    pub data: Vec<Option<f64>>,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub y_axis_id: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub canvas_id: String,
    pub labels: Vec<String>,
    pub temperature: Dataset,
    pub pressure: Dataset,
    pub y: Axis,
    pub y1: Axis,
    pub x: Axis,
    /// Incremented on every redraw.
    pub revision: u64,
}

impl Chart {
    fn new(canvas_id: &str) -> Self {
        let units = Units::default();
        Self {
            canvas_id: canvas_id.to_string(),
            labels: Vec::new(),
            temperature: Dataset {
                label: units.temperature_title(),
                data: Vec::new(),
                border_color: "rgb(75, 192, 192)",
                background_color: "rgba(75, 192, 192, 0.2)",
                y_axis_id: "y",
            },
            pressure: Dataset {
                label: units.pressure_title(),
                data: Vec::new(),
                border_color: "rgb(255, 99, 132)",
                background_color: "rgba(255, 99, 132, 0.2)",
                y_axis_id: "y1",
            },
            y: Axis {
                id: "y",
                position: AxisPosition::Left,
                title: units.temperature_title(),
                draw_on_chart_area: true,
            },
            y1: Axis {
                id: "y1",
                position: AxisPosition::Right,
                title: units.pressure_title(),
                draw_on_chart_area: false,
            },
            x: Axis {
                id: "x",
                position: AxisPosition::Bottom,
                title: "Time".to_string(),
                draw_on_chart_area: true,
            },
            revision: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Data for one chart redraw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartUpdate {
    pub labels: Vec<String>,
    pub temperatures: Vec<Option<f64>>,
    pub pressures: Vec<Option<f64>>,
    pub units: Units,
}

impl ChartUpdate {
    /// Empty series with default units.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Transform server samples, keeping server order.
    pub fn from_samples<Tz>(samples: &[SensorSample], range: TimeRange, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            labels: samples
                .iter()
                .map(|s| sample_label(&s.timestamp, range, tz))
                .collect(),
            temperatures: samples.iter().map(|s| s.temperature).collect(),
            pressures: samples.iter().map(|s| s.pressure).collect(),
            units: Units::from_samples(samples),
        }
    }
}

/// Owns the one chart instance.
#[derive(Debug, Default)]
pub struct ChartRenderer {
    chart: Option<Chart>,
    instances_created: u64,
}

impl ChartRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the chart on `canvas_id`, destroying any existing instance first.
    pub fn init(&mut self, canvas_id: &str) -> &Chart {
        if let Some(old) = self.chart.take() {
            tracing::debug!(canvas = %old.canvas_id, "Destroying previous chart instance");
        }
        self.instances_created += 1;
        self.chart.insert(Chart::new(canvas_id))
    }

    /// Replace labels, both series and the unit titles, then redraw.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if called before [`ChartRenderer::init`].
    pub fn update(
        &mut self,
        labels: Vec<String>,
        temperatures: Vec<Option<f64>>,
        pressures: Vec<Option<f64>>,
        units: &Units,
    ) -> AppResult<&Chart> {
        let chart = self
            .chart
            .as_mut()
            .ok_or_else(|| AppError::Internal("chart updated before init".to_string()))?;

        chart.labels = labels;

        chart.temperature.data = temperatures;
        chart.temperature.label = units.temperature_title();
        chart.y.title = units.temperature_title();

        chart.pressure.data = pressures;
        chart.pressure.label = units.pressure_title();
        chart.y1.title = units.pressure_title();

        chart.revision += 1;
        Ok(&*chart)
    }

    /// [`ChartRenderer::update`] from a prepared [`ChartUpdate`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if called before [`ChartRenderer::init`].
    pub fn apply(&mut self, update: ChartUpdate) -> AppResult<&Chart> {
        self.update(update.labels, update.temperatures, update.pressures, &update.units)
    }

    /// Blank both series, restoring default units.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if called before [`ChartRenderer::init`].
    pub fn clear(&mut self) -> AppResult<&Chart> {
        self.apply(ChartUpdate::empty())
    }

    #[must_use]
    pub fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }

    #[must_use]
    pub fn instances_created(&self) -> u64 {
        self.instances_created
    }
}
