/// Virtualized media card grid
///
/// Mounts a `WindowedCollectionView` on a DOM grid element. Cards are
/// built outside the Dioxus tree (the scroller owns their elements), so
/// only a few rows of `HtmlElement`s exist at any time however many pages
/// have been loaded.
///
/// `render_card`, `fetcher` and `config` are captured when the grid mounts;
/// later changes to them do not reach the live view. Bump `refresh_key` to
/// reload data (the fetcher may read shared filter state), or remount the
/// component (e.g. with a new `key`) to swap the fetcher itself.
///
/// Must be rendered inside a `ToastProvider`; fetch failures become toasts.
///
/// # Example
/// ```rust,ignore
/// MediaGrid {
///     render_card: CardRenderer::new(|model: &ModelCard| build_card(model)),
///     fetcher: SharedFetcher::new(GalleryFetcher::default()),
///     config: ScrollerConfig {
///         display_density: DisplayDensity::Compact,
///         ..Default::default()
///     },
///     refresh_key: *filter_version.read(),
/// }
/// ```
use std::rc::Rc;

use async_trait::async_trait;
use dioxus::prelude::*;
use dioxus_primitives::toast::consume_toast;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::dom::{BrowserScheduler, DomSurface, GridBinding};
use crate::scroller::{Page, PageFetcher, ScrollerConfig, ViewParts, WindowedCollectionView};
use super::toast::ToastNotifier;

/// Builds the element for one card. Compared by pointer in props.
pub struct CardRenderer<T>(Rc<dyn Fn(&T) -> HtmlElement>);

impl<T> CardRenderer<T> {
    pub fn new(render: impl Fn(&T) -> HtmlElement + 'static) -> Self {
        Self(Rc::new(render))
    }

    pub fn render(&self, item: &T) -> HtmlElement {
        (self.0)(item)
    }
}

impl<T> Clone for CardRenderer<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for CardRenderer<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Page fetcher shared between the component props and the live view
pub struct SharedFetcher<T>(Rc<dyn PageFetcher<T>>);

impl<T> SharedFetcher<T> {
    pub fn new(fetcher: impl PageFetcher<T> + 'static) -> Self {
        Self(Rc::new(fetcher))
    }
}

impl<T> Clone for SharedFetcher<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for SharedFetcher<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[async_trait(?Send)]
impl<T: 'static> PageFetcher<T> for SharedFetcher<T> {
    async fn fetch_page(&self, page: u32, page_size: usize) -> Result<Page<T>, String> {
        self.0.fetch_page(page, page_size).await
    }
}

#[derive(Props)]
pub struct MediaGridProps<T: 'static> {
    pub render_card: CardRenderer<T>,

    pub fetcher: SharedFetcher<T>,

    #[props(default)]
    pub config: ScrollerConfig,

    /// Changing this drops every loaded card and starts again at page 1
    /// (filter or sort change)
    #[props(default)]
    pub refresh_key: u64,

    #[props(default = "media-grid-container".to_string())]
    pub container_class: String,
}

// Manual impls: items are never cloned or compared, only the handles
impl<T: 'static> Clone for MediaGridProps<T> {
    fn clone(&self) -> Self {
        Self {
            render_card: self.render_card.clone(),
            fetcher: self.fetcher.clone(),
            config: self.config.clone(),
            refresh_key: self.refresh_key,
            container_class: self.container_class.clone(),
        }
    }
}

impl<T: 'static> PartialEq for MediaGridProps<T> {
    fn eq(&self, other: &Self) -> bool {
        self.render_card == other.render_card
            && self.fetcher == other.fetcher
            && self.config == other.config
            && self.refresh_key == other.refresh_key
            && self.container_class == other.container_class
    }
}

#[component]
pub fn MediaGrid<T: 'static>(props: MediaGridProps<T>) -> Element {
    let toasts = consume_toast();
    let grid_id = use_signal(|| format!("media-grid-{}", uuid::Uuid::new_v4()));
    let mut binding = use_signal(|| None::<GridBinding<T>>);
    let mut last_refresh_key = use_signal(|| props.refresh_key);

    // Start over when the refresh key changes
    use_effect(use_reactive(&props.refresh_key, move |key| {
        if *last_refresh_key.peek() == key {
            return;
        }
        last_refresh_key.set(key);

        let view = binding.peek().as_ref().map(|b| b.view().clone());
        if let Some(view) = view {
            log::info!("Refresh key changed to {}, reloading gallery", key);
            view.reset();
            spawn(async move {
                if let Err(e) = view.initialize().await {
                    log::error!("Gallery reload failed: {}", e);
                }
            });
        }
    }));

    // Tear down listeners and cards on unmount
    use_drop(move || {
        if let Ok(mut slot) = binding.try_write() {
            if let Some(active) = slot.take() {
                active.detach();
            }
        }
    });

    let render_card = props.render_card.clone();
    let fetcher = props.fetcher.clone();
    let config = props.config.clone();

    rsx! {
        div {
            class: "{props.container_class}",
            style: "overflow-y: auto; position: relative; height: 100%;",

            div {
                id: "{grid_id}",
                class: "media-grid",
                onmounted: move |evt| {
                    if binding.peek().is_some() {
                        return;
                    }

                    let Some(element) = evt.data.downcast::<web_sys::Element>() else {
                        log::warn!("Grid mounted without a DOM element");
                        return;
                    };
                    let Ok(grid) = element.clone().dyn_into::<HtmlElement>() else {
                        log::warn!("Grid element is not an HtmlElement");
                        return;
                    };

                    let surface = match DomSurface::new(grid, None, None) {
                        Ok(surface) => surface,
                        Err(e) => {
                            log::error!("Failed to prepare grid surface: {:?}", e);
                            return;
                        }
                    };

                    let render_card = render_card.clone();
                    let parts = ViewParts {
                        surface,
                        create_item: Box::new(move |item: &T| render_card.render(item)),
                        fetch_items: Box::new(fetcher.clone()),
                        scheduler: Rc::new(BrowserScheduler::new()),
                        notifier: Rc::new(ToastNotifier::new(toasts.clone())),
                    };
                    let view = WindowedCollectionView::new(parts, config.clone());

                    match GridBinding::attach(view.clone()) {
                        Ok(active) => binding.set(Some(active)),
                        Err(e) => {
                            log::error!("Failed to bind grid events: {:?}", e);
                            view.dispose();
                            return;
                        }
                    }

                    spawn(async move {
                        match view.initialize().await {
                            Ok(outcome) => log::debug!("Gallery initialized: {:?}", outcome),
                            Err(e) => log::error!("Gallery initialization failed: {}", e),
                        }
                    });
                },
            }
        }
    }
}
