//! Scroller tuning options
//!
//! Field names follow the option names the gallery page passes in its
//! settings blob (camelCase), so a saved configuration can be parsed
//! directly with [`ScrollerConfig::from_json`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Card aspect ratio used by the gallery thumbnails (width / height)
pub const DEFAULT_ITEM_ASPECT_RATIO: f64 = 896.0 / 1152.0;

/// Card density chosen in the gallery settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayDensity {
    #[default]
    Default,
    Medium,
    Compact,
}

/// Configuration for the windowed grid
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollerConfig {
    /// Extra rows rendered above/below the viewport
    pub overscan: usize,
    /// Informational only; the fetcher decides how many items a page carries
    pub batch_size: usize,
    /// Page size requested from the page fetcher
    pub page_size: usize,
    /// Vertical gap between rows (pixels)
    pub row_gap: f64,
    /// Horizontal gap between columns (pixels)
    pub column_gap: f64,
    /// Card width divided by card height
    pub item_aspect_ratio: f64,
    /// How long a fetch may hold the loading flag before it is released
    pub loading_timeout_ms: u64,
    /// Scroll events closer together than this collapse into one
    pub scroll_debounce_ms: u64,
    /// Resize events closer together than this collapse into one
    pub resize_debounce_ms: u64,
    /// Surplus indices a rendered window may keep before it is rebuilt
    pub reuse_tolerance: usize,
    pub display_density: DisplayDensity,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            overscan: 5,
            batch_size: 50,
            page_size: 100,
            row_gap: 20.0,
            column_gap: 12.0,
            item_aspect_ratio: DEFAULT_ITEM_ASPECT_RATIO,
            loading_timeout_ms: 15_000,
            scroll_debounce_ms: 10,
            resize_debounce_ms: 150,
            reuse_tolerance: 10,
            display_density: DisplayDensity::Default,
        }
    }
}

impl ScrollerConfig {
    /// Parse a configuration from a JSON settings blob, filling in defaults
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("Invalid scroller config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the layout math cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("pageSize must be at least 1".to_string());
        }
        if !(self.item_aspect_ratio.is_finite() && self.item_aspect_ratio > 0.0) {
            return Err(format!(
                "itemAspectRatio must be positive, got {}",
                self.item_aspect_ratio
            ));
        }
        if self.row_gap < 0.0 || self.column_gap < 0.0 {
            return Err("gaps must not be negative".to_string());
        }
        Ok(())
    }

    pub fn loading_timeout(&self) -> Duration {
        Duration::from_millis(self.loading_timeout_ms)
    }

    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
