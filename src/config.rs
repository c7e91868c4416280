//! Carousel configuration.
//!
//! Deployments disagree on retry budget and track layout, so both observed
//! shapes are presets of one config rather than separate code paths.

use serde::Deserialize;

use crate::catalog::GameRecord;
use crate::error::Result;

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "others/assets/images/placeholder.png";
pub const TRACK_CLASS: &str = "carousel-track";
pub const TOP_TRACK_ID: &str = "carousel-track-top";
pub const BOTTOM_TRACK_ID: &str = "carousel-track-bottom";

/// How many tracks the homepage shows.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrackLayout {
    /// One full-width strip.
    Single { track_id: String },
    /// Top / bottom strips fed from disjoint halves of the selection.
    Split { top_id: String, bottom_id: String },
}

impl TrackLayout {
    pub fn track_ids(&self) -> Vec<&str> {
        match self {
            TrackLayout::Single { track_id } => vec![track_id.as_str()],
            TrackLayout::Split { top_id, bottom_id } => vec![top_id.as_str(), bottom_id.as_str()],
        }
    }
}

impl Default for TrackLayout {
    fn default() -> Self {
        TrackLayout::Single { track_id: TOP_TRACK_ID.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub max_attempts: u32,
    pub retry_delay_ms: u32,
    pub initial_delay_ms: u32,
    /// Cards per track before duplication.
    pub desired_count: usize,
    pub layout: TrackLayout,
    /// Class shared by every track (visibility pause / resume).
    pub track_class: String,
    pub placeholder_image: String,
    pub excluded_names: Vec<String>,
    /// Rendered if the catalog never shows up.
    pub fallback: Vec<GameRecord>,
    /// Global the catalog is published under.
    pub catalog_global: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::full_width()
    }
}

impl CarouselConfig {
    /// Single strip, 30 x 200ms budget, 20 cards.
    pub fn full_width() -> Self {
        Self {
            max_attempts: 30,
            retry_delay_ms: 200,
            initial_delay_ms: 100,
            desired_count: 20,
            layout: TrackLayout::default(),
            track_class: TRACK_CLASS.to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            excluded_names: vec!["Feedback".to_string()],
            fallback: Vec::new(),
            catalog_global: "games".to_string(),
        }
    }

    /// Top / bottom strips, 10 x 500ms budget, 10 cards per strip.
    pub fn split() -> Self {
        Self {
            max_attempts: 10,
            retry_delay_ms: 500,
            desired_count: 10,
            layout: TrackLayout::Split {
                top_id: TOP_TRACK_ID.to_string(),
                bottom_id: BOTTOM_TRACK_ID.to_string(),
            },
            ..Self::full_width()
        }
    }

    /// Preset by name; anything unrecognised gets the full-width preset.
    pub fn variant(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "split" | "dual" => Self::split(),
            _ => Self::full_width(),
        }
    }

    /// Overrides from the page. Missing fields keep the full-width defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let full = CarouselConfig::full_width();
        assert_eq!((full.max_attempts, full.retry_delay_ms, full.desired_count), (30, 200, 20));
        assert_eq!(full.layout.track_ids(), vec![TOP_TRACK_ID]);

        let split = CarouselConfig::split();
        assert_eq!((split.max_attempts, split.retry_delay_ms), (10, 500));
        assert_eq!(split.layout.track_ids(), vec![TOP_TRACK_ID, BOTTOM_TRACK_ID]);
        assert!(split.is_excluded("Feedback"));
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(CarouselConfig::variant(" Split "), CarouselConfig::split());
        assert_eq!(CarouselConfig::variant("whatever"), CarouselConfig::full_width());
    }

    #[test]
    fn test_from_json_partial_override() {
        let cfg = CarouselConfig::from_json(
            r#"{"max_attempts":5,"layout":{"kind":"split","top_id":"a","bottom_id":"b"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.max_attempts, 5);
        assert_eq!(cfg.retry_delay_ms, 200);
        assert_eq!(cfg.layout.track_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(CarouselConfig::from_json("[1,2").is_err());
    }
}
