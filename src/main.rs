#![allow(non_snake_case)]

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use dioxus::prelude::*;
use gallery_scroller::components::{CardRenderer, MediaGrid, SharedFetcher, ToastProvider};
use gallery_scroller::scroller::{Page, PageFetcher, ScrollerConfig};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

/// Settings blob the demo gallery starts with
const DEMO_SETTINGS: &str = r#"{ "pageSize": 60, "overscan": 3, "displayDensity": "medium" }"#;

const DEMO_TOTAL: usize = 2_500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KindFilter {
    All,
    Lora,
    Checkpoint,
}

impl KindFilter {
    fn label(&self) -> &'static str {
        match self {
            KindFilter::All => "All",
            KindFilter::Lora => "LoRA",
            KindFilter::Checkpoint => "Checkpoint",
        }
    }

    fn matches(&self, model: &ModelCard) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Lora => model.kind == "LoRA",
            KindFilter::Checkpoint => model.kind == "Checkpoint",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ModelCard {
    id: usize,
    name: String,
    kind: &'static str,
    downloads: u32,
}

impl ModelCard {
    fn demo(id: usize) -> Self {
        let kind = if id % 3 == 0 { "Checkpoint" } else { "LoRA" };
        Self {
            id,
            name: format!("{} #{:04}", kind, id),
            kind,
            downloads: ((id * 7919) % 50_000) as u32,
        }
    }
}

/// Generates model cards on the fly, with a short artificial latency
struct DemoFetcher {
    total: usize,
    filter: Rc<Cell<KindFilter>>,
}

#[async_trait(?Send)]
impl PageFetcher<ModelCard> for DemoFetcher {
    async fn fetch_page(&self, page: u32, page_size: usize) -> Result<Page<ModelCard>, String> {
        #[cfg(target_arch = "wasm32")]
        gloo_timers::future::TimeoutFuture::new(250).await;

        let filter = self.filter.get();
        let matching: Vec<ModelCard> = (0..self.total)
            .map(ModelCard::demo)
            .filter(|model| filter.matches(model))
            .collect();

        let start = (page.saturating_sub(1) as usize) * page_size;
        let items: Vec<ModelCard> = matching.iter().skip(start).take(page_size).cloned().collect();
        let has_more = start + items.len() < matching.len();
        log::debug!("Demo page {} ({}): {} cards", page, filter.label(), items.len());
        Ok(Page::new(items, matching.len(), has_more))
    }
}

/// Empty card all cards are cloned from; `None` outside a browser document
fn card_template() -> Option<HtmlElement> {
    let document = web_sys::window().and_then(|w| w.document())?;
    let template = document.create_element("div").ok()?.dyn_into::<HtmlElement>().ok()?;
    template.set_class_name("model-card");
    Some(template)
}

fn fill_card(template: &HtmlElement, model: &ModelCard) -> Result<HtmlElement, JsValue> {
    let card = template
        .clone_node()?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)?;
    let document = card
        .owner_document()
        .ok_or_else(|| JsValue::from_str("card has no document"))?;

    let title = document.create_element("div")?;
    title.set_class_name("model-card-title");
    title.set_text_content(Some(&model.name));
    card.append_child(&title)?;

    let meta = document.create_element("div")?;
    meta.set_class_name("model-card-meta");
    meta.set_text_content(Some(&format!("{} · {} downloads", model.kind, model.downloads)));
    card.append_child(&meta)?;

    Ok(card)
}

fn build_card(template: &HtmlElement, model: &ModelCard) -> HtmlElement {
    match fill_card(template, model) {
        Ok(card) => card,
        Err(e) => {
            log::warn!("Failed to build card {}: {:?}", model.id, e);
            template.clone()
        }
    }
}

fn main() {
    // Initialize panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    }

    log::info!("Starting gallery scroller demo");

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let filter = use_hook(|| Rc::new(Cell::new(KindFilter::All)));
    let fetcher = use_hook({
        let filter = filter.clone();
        move || {
            SharedFetcher::new(DemoFetcher {
                total: DEMO_TOTAL,
                filter,
            })
        }
    });
    let render_card = use_hook(|| {
        card_template().map(|template| {
            CardRenderer::new(move |model: &ModelCard| build_card(&template, model))
        })
    });
    let config = use_hook(|| {
        ScrollerConfig::from_json(DEMO_SETTINGS).unwrap_or_else(|e| {
            log::warn!("{}, using defaults", e);
            ScrollerConfig::default()
        })
    });

    let mut refresh_key = use_signal(|| 0u64);
    let mut active = use_signal(|| KindFilter::All);

    rsx! {
        ToastProvider {
            div {
                class: "gallery-page flex flex-col h-screen",

                div {
                    class: "gallery-toolbar flex gap-2 p-2",
                    for kind in [KindFilter::All, KindFilter::Lora, KindFilter::Checkpoint] {
                        button {
                            key: "{kind.label()}",
                            class: if *active.read() == kind { "filter-button active" } else { "filter-button" },
                            onclick: {
                                let filter = filter.clone();
                                move |_| {
                                    if *active.peek() == kind {
                                        return;
                                    }
                                    filter.set(kind);
                                    active.set(kind);
                                    *refresh_key.write() += 1;
                                }
                            },
                            "{kind.label()}"
                        }
                    }
                }

                div {
                    class: "flex-1 min-h-0",
                    if let Some(render_card) = render_card {
                        MediaGrid::<ModelCard> {
                            render_card,
                            fetcher: fetcher.clone(),
                            config: config.clone(),
                            refresh_key: *refresh_key.read(),
                        }
                    } else {
                        p { class: "gallery-error", "The gallery needs a browser document." }
                    }
                }
            }
        }
    }
}
