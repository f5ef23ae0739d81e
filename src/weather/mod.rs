pub mod client;
pub mod models;
pub mod pipeline;

pub use client::{WeatherApi, WeatherClient};
pub use models::{Coordinates, WeatherSnapshot};
pub use pipeline::{Stage, WeatherService};
