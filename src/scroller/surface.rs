/// Presentation target the scroller draws into.
///
/// In the browser this is the grid element plus its scroll container
/// (see `dom::DomSurface`); anything that can place a unit at a rectangle
/// and report its own scroll position can host the grid.

/// Width measurements used by the layout pass
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerMetrics {
    /// Inner width of the sizing container, padding included
    pub client_width: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    /// Width of the whole viewport (window), used for breakpoints
    pub viewport_width: f64,
}

/// Scroll measurements used by range computation and the bottom threshold
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    /// Visible height of the scroll container
    pub viewport_height: f64,
    /// Full scrollable height of the scroll container
    pub scroll_height: f64,
    /// Distance from the top of the scrolled content to the top of the grid
    pub content_offset: f64,
}

/// Where one materialized item sits inside the grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemSlot {
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

pub trait GridSurface {
    /// Presentation unit produced by the item factory
    type Unit;

    fn container_metrics(&self) -> ContainerMetrics;

    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Place `unit` at `slot`; the surface owns absolute positioning
    fn attach(&mut self, unit: &Self::Unit, slot: &ItemSlot);

    fn detach(&mut self, index: usize, unit: &Self::Unit);

    fn set_spacer_height(&mut self, height: f64);

    /// Toggle the "no items" placeholder
    fn set_empty_placeholder(&mut self, visible: bool);

    fn scroll_to(&mut self, top: f64);

    /// Remove everything the surface created (spacer, placeholder)
    fn teardown(&mut self);
}
