//! DOM-backed grid surface
//!
//! Cards are absolutely positioned children of the grid element. A hidden
//! spacer child stretches the grid to the full collection height so the
//! scroll container gets a correct scrollbar without instantiating every
//! card.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::scroller::{ContainerMetrics, GridSurface, ItemSlot, ScrollMetrics};

const SPACER_CLASS: &str = "virtual-scroll-spacer";
const PLACEHOLDER_CLASS: &str = "virtual-scroll-empty";

pub struct DomSurface {
    document: Document,
    grid: HtmlElement,
    /// Sizing ancestor (width and padding)
    container: HtmlElement,
    /// Element whose scroll position drives the window
    scroll_container: HtmlElement,
    spacer: Option<HtmlElement>,
    placeholder: Option<HtmlElement>,
    empty_message: String,
}

fn create_div(document: &Document, class: &str) -> Result<HtmlElement, JsValue> {
    let element = document.create_element("div")?;
    element.set_class_name(class);
    element.dyn_into::<HtmlElement>().map_err(JsValue::from)
}

fn parse_px(value: &str) -> f64 {
    value.trim().trim_end_matches("px").parse::<f64>().unwrap_or(0.0)
}

impl DomSurface {
    /// Bind to `grid`. `container` defaults to the grid's parent and
    /// `scroll_container` defaults to `container`.
    pub fn new(
        grid: HtmlElement,
        container: Option<HtmlElement>,
        scroll_container: Option<HtmlElement>,
    ) -> Result<Self, JsValue> {
        let document = grid
            .owner_document()
            .ok_or_else(|| JsValue::from_str("Grid element is not attached to a document"))?;

        let container = match container {
            Some(container) => container,
            None => grid
                .parent_element()
                .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
                .ok_or_else(|| JsValue::from_str("Grid element has no parent container"))?,
        };
        let scroll_container = scroll_container.unwrap_or_else(|| container.clone());

        grid.style().set_property("position", "relative")?;

        let spacer = create_div(&document, SPACER_CLASS)?;
        let style = spacer.style();
        style.set_property("position", "absolute")?;
        style.set_property("top", "0")?;
        style.set_property("left", "0")?;
        style.set_property("width", "1px")?;
        style.set_property("height", "0px")?;
        style.set_property("visibility", "hidden")?;
        style.set_property("pointer-events", "none")?;
        grid.append_child(&spacer)?;

        Ok(Self {
            document,
            grid,
            container,
            scroll_container,
            spacer: Some(spacer),
            placeholder: None,
            empty_message: "No models found".to_string(),
        })
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn grid(&self) -> &HtmlElement {
        &self.grid
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn scroll_container(&self) -> &HtmlElement {
        &self.scroll_container
    }

    fn padding(&self) -> (f64, f64) {
        let style = web_sys::window().and_then(|w| w.get_computed_style(&self.container).ok().flatten());
        match style {
            Some(style) => (
                parse_px(&style.get_property_value("padding-left").unwrap_or_default()),
                parse_px(&style.get_property_value("padding-right").unwrap_or_default()),
            ),
            None => (0.0, 0.0),
        }
    }

    /// Top of the grid measured in the scroll container's content space
    fn content_offset(&self) -> f64 {
        let grid: &Element = self.grid.as_ref();
        let scroller: &Element = self.scroll_container.as_ref();
        if grid == scroller {
            return 0.0;
        }
        grid.get_bounding_client_rect().top() - scroller.get_bounding_client_rect().top()
            + self.scroll_container.scroll_top() as f64
    }

    fn show_placeholder(&mut self) -> Result<(), JsValue> {
        if self.placeholder.is_none() {
            let placeholder = create_div(&self.document, PLACEHOLDER_CLASS)?;
            placeholder.set_text_content(Some(&self.empty_message));
            self.grid.append_child(&placeholder)?;
            self.placeholder = Some(placeholder);
        }
        Ok(())
    }

    fn hide_placeholder(&mut self) {
        if let Some(placeholder) = self.placeholder.take() {
            placeholder.remove();
        }
    }
}

impl GridSurface for DomSurface {
    type Unit = HtmlElement;

    fn container_metrics(&self) -> ContainerMetrics {
        let (padding_left, padding_right) = self.padding();
        let viewport_width = web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0);
        ContainerMetrics {
            client_width: self.container.client_width() as f64,
            padding_left,
            padding_right,
            viewport_width,
        }
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_container.scroll_top() as f64,
            viewport_height: self.scroll_container.client_height() as f64,
            scroll_height: self.scroll_container.scroll_height() as f64,
            content_offset: self.content_offset(),
        }
    }

    fn attach(&mut self, unit: &HtmlElement, slot: &ItemSlot) {
        let style = unit.style();
        style.set_property("position", "absolute").ok();
        style.set_property("left", &format!("{}px", slot.left)).ok();
        style.set_property("top", &format!("{}px", slot.top)).ok();
        style.set_property("width", &format!("{}px", slot.width)).ok();
        style.set_property("height", &format!("{}px", slot.height)).ok();
        unit.set_attribute("data-index", &slot.index.to_string()).ok();
        if let Err(e) = self.grid.append_child(unit) {
            log::warn!("Failed to attach card {}: {:?}", slot.index, e);
        }
    }

    fn detach(&mut self, _index: usize, unit: &HtmlElement) {
        unit.remove();
    }

    fn set_spacer_height(&mut self, height: f64) {
        if let Some(spacer) = &self.spacer {
            spacer
                .style()
                .set_property("height", &format!("{}px", height))
                .ok();
        }
    }

    fn set_empty_placeholder(&mut self, visible: bool) {
        if visible {
            if let Err(e) = self.show_placeholder() {
                log::warn!("Failed to show empty placeholder: {:?}", e);
            }
        } else {
            self.hide_placeholder();
        }
    }

    fn scroll_to(&mut self, top: f64) {
        self.scroll_container.set_scroll_top(top.max(0.0) as i32);
    }

    fn teardown(&mut self) {
        self.hide_placeholder();
        if let Some(spacer) = self.spacer.take() {
            spacer.remove();
        }
    }
}
