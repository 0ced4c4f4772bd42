//! Event wiring between the DOM and a windowed view
//!
//! Scroll events on the scroll container, window resizes and container
//! resizes (ResizeObserver) are forwarded to the view's debounced handlers.
//! Closures are owned by the binding and dropped in `detach`, never
//! forgotten.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, HtmlElement, ResizeObserver};

use super::surface::DomSurface;
use crate::scroller::{WeakView, WindowedCollectionView};

pub type DomView<T> = WindowedCollectionView<T, DomSurface>;

pub struct GridBinding<T: 'static> {
    view: DomView<T>,
    scroll_target: HtmlElement,
    on_scroll: Option<Closure<dyn FnMut()>>,
    on_window_resize: Option<Closure<dyn FnMut()>>,
    on_container_resize: Option<Closure<dyn FnMut(js_sys::Array)>>,
    observer: Option<ResizeObserver>,
}

impl<T: 'static> GridBinding<T> {
    /// Start forwarding events to `view`
    pub fn attach(view: DomView<T>) -> Result<Self, JsValue> {
        let (scroll_target, sizing_target) = view.with_surface(|surface| {
            (surface.scroll_container().clone(), surface.container().clone())
        });

        let mut binding = Self {
            view,
            scroll_target,
            on_scroll: None,
            on_window_resize: None,
            on_container_resize: None,
            observer: None,
        };

        let weak = binding.view.downgrade();
        let on_scroll = Closure::wrap(Box::new(move || {
            if let Some(view) = weak.upgrade() {
                view.on_scroll();
            }
        }) as Box<dyn FnMut()>);

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        binding
            .scroll_target
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                on_scroll.as_ref().unchecked_ref(),
                &options,
            )?;
        binding.on_scroll = Some(on_scroll);

        let weak = binding.view.downgrade();
        let on_window_resize = Closure::wrap(Box::new(move || {
            if let Some(view) = weak.upgrade() {
                view.on_resize();
            }
        }) as Box<dyn FnMut()>);

        if let Some(window) = web_sys::window() {
            window.add_event_listener_with_callback(
                "resize",
                on_window_resize.as_ref().unchecked_ref(),
            )?;
        }
        binding.on_window_resize = Some(on_window_resize);

        let weak = binding.view.downgrade();
        let on_container_resize = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            if let Some(view) = weak.upgrade() {
                view.on_resize();
            }
        }) as Box<dyn FnMut(js_sys::Array)>);

        match ResizeObserver::new(on_container_resize.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&sizing_target);
                binding.observer = Some(observer);
                binding.on_container_resize = Some(on_container_resize);
            }
            Err(e) => {
                // Window resizes still reach the view
                log::warn!("ResizeObserver unavailable: {:?}", e);
            }
        }

        log::debug!("Grid binding attached");
        Ok(binding)
    }

    pub fn view(&self) -> &DomView<T> {
        &self.view
    }

    pub fn weak_view(&self) -> WeakView<T, DomSurface> {
        self.view.downgrade()
    }

    /// Remove every listener and dispose the view
    pub fn detach(mut self) {
        self.unbind();
        self.view.dispose();
    }

    fn unbind(&mut self) {
        if let Some(callback) = self.on_scroll.take() {
            self.scroll_target
                .remove_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())
                .ok();
        }

        if let Some(callback) = self.on_window_resize.take() {
            if let Some(window) = web_sys::window() {
                window
                    .remove_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
                    .ok();
            }
        }

        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.on_container_resize = None;
    }
}

impl<T: 'static> Drop for GridBinding<T> {
    fn drop(&mut self) {
        self.unbind();
    }
}
