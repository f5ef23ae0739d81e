//! Telemetry Dash - device telemetry dashboard client
//!
//! Polls sensor data for the selected device, keeps a two-axis chart current,
//! resolves local weather and asks the AI endpoint for outfit advice.

pub mod backend;
pub mod common;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod weather;
