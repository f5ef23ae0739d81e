//! Chained weather lookup: location text → coordinates → forecast URL → snapshot.
//!
//! Each stage yields a [`Stage`]. Only [`Stage::Found`] lets the chain continue;
//! the first `Empty` or `Failed` is carried through unchanged and no later
//! request is issued.

use std::future::Future;
use std::sync::Arc;

use crate::error::AppError;
use crate::weather::client::WeatherApi;
use crate::weather::models::{Coordinates, WeatherSnapshot};

/// Outcome of one lookup stage.
#[derive(Debug)]
pub enum Stage<T> {
    Found(T),
    /// The service answered but had nothing usable.
    Empty(&'static str),
    Failed(AppError),
}

impl<T> Stage<T> {
    /// Run `next` on a found value; pass `Empty`/`Failed` through untouched.
    pub async fn then<U, F, Fut>(self, next: F) -> Stage<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Stage<U>>,
    {
        match self {
            Self::Found(value) => next(value).await,
            Self::Empty(reason) => Stage::Empty(reason),
            Self::Failed(error) => Stage::Failed(error),
        }
    }

    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty(_) | Self::Failed(_) => None,
        }
    }
}

/// Weather Fetcher: resolves a profile location to a [`WeatherSnapshot`].
#[derive(Clone)]
pub struct WeatherService {
    api: Arc<dyn WeatherApi>,
}

impl WeatherService {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api }
    }

    /// Run the full chain for `location`.
    pub async fn resolve(&self, location: &str) -> Stage<WeatherSnapshot> {
        self.coordinates(location)
            .await
            .then(|coordinates| self.forecast_url(coordinates))
            .await
            .then(|url| self.snapshot(url))
            .await
    }

    async fn coordinates(&self, location: &str) -> Stage<Coordinates> {
        if location.trim().is_empty() {
            return Stage::Empty("no location on profile");
        }

        match self.api.geocode(location).await {
            Ok(matches) => match matches.first() {
                Some(best) => {
                    tracing::debug!(
                        location = %location,
                        matched = best.display_name.as_deref().unwrap_or_default(),
                        "Location geocoded"
                    );
                    Stage::Found(Coordinates::from(best))
                }
                None => Stage::Empty("location not found"),
            },
            Err(e) => Stage::Failed(e),
        }
    }

    async fn forecast_url(&self, coordinates: Coordinates) -> Stage<String> {
        match self.api.points(&coordinates).await {
            Ok(points) => match points.forecast_url() {
                Some(url) => Stage::Found(url.to_string()),
                None => Stage::Empty("no forecast endpoint for coordinates"),
            },
            Err(e) => Stage::Failed(e),
        }
    }

    async fn snapshot(&self, url: String) -> Stage<WeatherSnapshot> {
        match self.api.forecast(&url).await {
            Ok(forecast) => match forecast.periods() {
                [current, next, ..] => Stage::Found(WeatherSnapshot::from_periods(current, next)),
                _ => Stage::Empty("forecast has fewer than two periods"),
            },
            Err(e) => Stage::Failed(e),
        }
    }
}
