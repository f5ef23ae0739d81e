pub mod client;
pub mod models;

pub use client::{BackendClient, DashboardApi};
pub use models::{ClothingItem, Device, SensorSample, UserProfile};
