//! Grid layout math
//!
//! Pure functions from container width and scroll position to column count,
//! card size, item slots, the visible index window and the spacer height.
//! Nothing here touches the surface, which keeps the math testable.

use std::ops::Range;

use super::config::{DisplayDensity, ScrollerConfig};
use super::surface::{ContainerMetrics, ItemSlot, ScrollMetrics};

/// Viewport size class picked from the window width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenTier {
    /// Narrower than 2000px
    Standard,
    /// 2000px and wider
    Large,
    /// 3000px and wider
    UltraWide,
}

impl ScreenTier {
    pub fn for_viewport(viewport_width: f64) -> Self {
        if viewport_width >= 3000.0 {
            ScreenTier::UltraWide
        } else if viewport_width >= 2000.0 {
            ScreenTier::Large
        } else {
            ScreenTier::Standard
        }
    }

    /// Widest the card grid may grow before it is centered
    pub fn max_grid_width(self) -> f64 {
        match self {
            ScreenTier::Standard => 1400.0,
            ScreenTier::Large => 1800.0,
            ScreenTier::UltraWide => 2400.0,
        }
    }

    /// Target card width before the remaining space is spread across columns
    pub fn card_width(self, density: DisplayDensity) -> f64 {
        match (self, density) {
            (ScreenTier::Standard, DisplayDensity::Default) => 260.0,
            (ScreenTier::Standard, DisplayDensity::Medium) => 230.0,
            (ScreenTier::Standard, DisplayDensity::Compact) => 200.0,
            (ScreenTier::Large, DisplayDensity::Default) => 290.0,
            (ScreenTier::Large, DisplayDensity::Medium) => 260.0,
            (ScreenTier::Large, DisplayDensity::Compact) => 230.0,
            (ScreenTier::UltraWide, DisplayDensity::Default) => 330.0,
            (ScreenTier::UltraWide, DisplayDensity::Medium) => 290.0,
            (ScreenTier::UltraWide, DisplayDensity::Compact) => 250.0,
        }
    }
}

/// Column count and card geometry for one container width
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Zero while the container has no usable width
    pub columns: usize,
    pub item_width: f64,
    pub item_height: f64,
    pub column_gap: f64,
    pub row_gap: f64,
    /// Horizontal offset of the first column (padding plus centering)
    pub left_offset: f64,
}

impl GridLayout {
    /// Layout with no columns; every derived computation is a no-op
    pub fn degenerate(config: &ScrollerConfig) -> Self {
        Self {
            columns: 0,
            item_width: 0.0,
            item_height: 0.0,
            column_gap: config.column_gap,
            row_gap: config.row_gap,
            left_offset: 0.0,
        }
    }

    pub fn compute(metrics: &ContainerMetrics, config: &ScrollerConfig) -> Self {
        let available =
            (metrics.client_width - metrics.padding_left - metrics.padding_right).max(0.0);
        if available <= 0.0 {
            return Self::degenerate(config);
        }

        let tier = ScreenTier::for_viewport(metrics.viewport_width);
        let card_width = tier.card_width(config.display_density);
        let grid_width = available.min(tier.max_grid_width());
        let gap = config.column_gap;

        let columns = (((grid_width + gap) / (card_width + gap)).floor() as usize).max(1);
        let total_gaps = (columns - 1) as f64 * gap;
        let item_width = ((grid_width - total_gaps) / columns as f64).max(0.0);
        let item_height = item_width / config.item_aspect_ratio;

        Self {
            columns,
            item_width,
            item_height,
            column_gap: gap,
            row_gap: config.row_gap,
            left_offset: metrics.padding_left + ((available - grid_width) / 2.0).max(0.0),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.columns == 0 || self.item_height <= 0.0
    }

    pub fn row_height(&self) -> f64 {
        self.item_height + self.row_gap
    }

    pub fn total_rows(&self, total_items: usize) -> usize {
        if self.columns == 0 {
            0
        } else {
            total_items.div_ceil(self.columns)
        }
    }

    /// Height that gives the scroll container its full range
    pub fn spacer_height(&self, total_items: usize) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let rows = self.total_rows(total_items);
        if rows == 0 {
            return 0.0;
        }
        rows as f64 * self.item_height + (rows - 1) as f64 * self.row_gap
    }

    /// Pixel rectangle for an item index
    pub fn slot(&self, index: usize) -> ItemSlot {
        let columns = self.columns.max(1);
        let row = index / columns;
        let column = index % columns;
        ItemSlot {
            index,
            row,
            column,
            left: self.left_offset + column as f64 * (self.item_width + self.column_gap),
            top: row as f64 * self.row_height(),
            width: self.item_width,
            height: self.item_height,
        }
    }

    /// Scroll offset that puts the row holding `index` at the top
    pub fn offset_of(&self, index: usize) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (index / self.columns) as f64 * self.row_height()
    }

    /// Index window `[start, end)` to materialize for the current scroll
    /// position, expanded by `overscan` rows each way and clamped to
    /// `[0, total_items]`.
    pub fn visible_range(
        &self,
        metrics: &ScrollMetrics,
        total_items: usize,
        overscan: usize,
    ) -> Range<usize> {
        if self.is_degenerate() || total_items == 0 {
            return 0..0;
        }

        let row_height = self.row_height();
        let total_rows = self.total_rows(total_items);
        let scroll_top = (metrics.scroll_top - metrics.content_offset).max(0.0);
        let viewport_height = metrics.viewport_height.max(0.0);

        let start_row = (scroll_top / row_height).floor() as usize;
        let end_row = ((scroll_top + viewport_height) / row_height).ceil() as usize;

        let start_row = start_row.saturating_sub(overscan).min(total_rows);
        let end_row = end_row.saturating_add(overscan).min(total_rows);

        let end = (end_row * self.columns).min(total_items);
        let start = (start_row * self.columns).min(end);
        start..end
    }
}
