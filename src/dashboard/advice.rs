use crate::backend::{ClothingItem, DashboardApi};
use crate::error::AppResult;
use crate::weather::WeatherSnapshot;

pub const THINKING_MESSAGE: &str = "Thinking about what you should wear...";
pub const FALLBACK_MESSAGE: &str = "Sorry, I couldn't provide a recommendation right now.";

/// Comma-joined `"color name"` listing of the wardrobe.
#[must_use]
pub fn clothing_list(items: &[ClothingItem]) -> String {
    items
        .iter()
        .map(ClothingItem::describe)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prompt for the AI endpoint from the cached weather and the wardrobe.
#[must_use]
pub fn build_prompt(weather: &WeatherSnapshot, wardrobe: &[ClothingItem]) -> String {
    let conditions = format!(
        "It is currently {} and {} outside and forecasted to be {}.",
        weather.current_temperature, weather.current_conditions, weather.forecast_conditions
    );

    if wardrobe.is_empty() {
        format!(
            "{conditions} The user does not have any clothes added to their wardrobe, \
             tell them so and what they should buy to fit the current conditions."
        )
    } else {
        format!(
            "{conditions} I need to decide what to wear from the following list: {}. \
             What should I wear? Do not comment on non chosen items.",
            clothing_list(wardrobe)
        )
    }
}

/// Fetch the wardrobe, build the prompt and ask the AI endpoint.
///
/// A failed wardrobe fetch counts as an empty wardrobe.
///
/// # Errors
///
/// Returns whatever the AI request fails with.
pub async fn request_advice(api: &dyn DashboardApi, weather: &WeatherSnapshot) -> AppResult<String> {
    let wardrobe = match api.wardrobe().await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch wardrobe, continuing without it");
            Vec::new()
        }
    };

    let prompt = build_prompt(weather, &wardrobe);
    tracing::debug!(items = wardrobe.len(), "Requesting outfit advice");

    api.ask_ai(&prompt).await
}
