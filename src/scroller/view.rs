//! Windowed collection view
//!
//! Keeps a large, server-paginated collection of cards cheap to display by
//! materializing only the rows around the viewport.
//!
//! # Features
//! - Responsive grid layout with viewport breakpoints
//! - Overscan rows above/below the viewport to hide pop-in
//! - Render passes coalesced to one per frame
//! - Background page fetches near the loaded boundary and the scroll bottom
//! - Loading timeout so a hung request cannot wedge pagination
//!
//! The view is a cheap-clone handle; clones share the same state. All state
//! lives behind one `RefCell` and no borrow is held across an `.await` or
//! while the scheduler runs a callback.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::ops::Range;
use std::rc::{Rc, Weak};

use super::config::ScrollerConfig;
use super::error::{NoticeLevel, Notifier, ScrollerError};
use super::fetch::{LoadOutcome, Page, PageFetcher, SkipReason};
use super::layout::GridLayout;
use super::lifecycle::ViewPhase;
use super::scheduler::{Scheduler, TimerId};
use super::surface::GridSurface;

/// Collaborators handed to [`WindowedCollectionView::new`]
pub struct ViewParts<T, S: GridSurface> {
    pub surface: S,
    /// Builds the presentation unit for one item. Must not call back into
    /// the view; the view positions the unit itself.
    pub create_item: Box<dyn Fn(&T) -> S::Unit>,
    pub fetch_items: Box<dyn PageFetcher<T>>,
    pub scheduler: Rc<dyn Scheduler>,
    pub notifier: Rc<dyn Notifier>,
}

/// Last observed scroll movement (diagnostics only)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    #[default]
    Idle,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FetchKind {
    Initial,
    More,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Debounced {
    Scroll,
    Resize,
}

#[derive(Debug)]
struct FetchTicket {
    kind: FetchKind,
    page: u32,
    page_size: usize,
    generation: u64,
    session: u64,
}

/// The fetch currently holding the loading flag
#[derive(Debug)]
struct InFlight {
    generation: u64,
    timer: Option<TimerId>,
}

struct ViewState<T, S: GridSurface> {
    config: ScrollerConfig,
    surface: S,
    phase: ViewPhase,

    items: Vec<T>,
    total_items: usize,
    has_more: bool,
    /// Next page the fetcher will be asked for (1-indexed)
    next_page: u32,
    loading: Option<InFlight>,
    fetch_generation: u64,
    /// Bumped by reset/refresh/dispose; older fetch results are dropped
    session: u64,

    layout: GridLayout,
    rendered_range: Range<usize>,
    mounted: BTreeMap<usize, S::Unit>,
    spacer_height: f64,
    placeholder_visible: bool,
    render_scheduled: bool,

    last_scroll_top: f64,
    scroll_direction: ScrollDirection,
    scroll_timer: Option<TimerId>,
    resize_timer: Option<TimerId>,
}

impl<T, S: GridSurface> ViewState<T, S> {
    fn detach_all(&mut self) {
        for (index, unit) in std::mem::take(&mut self.mounted) {
            self.surface.detach(index, &unit);
        }
        self.rendered_range = 0..0;
    }

    fn update_spacer_height(&mut self) {
        self.spacer_height = self.layout.spacer_height(self.total_items);
        self.surface.set_spacer_height(self.spacer_height);
    }

    fn set_placeholder(&mut self, visible: bool) {
        if self.placeholder_visible != visible {
            self.placeholder_visible = visible;
            self.surface.set_empty_placeholder(visible);
        }
    }

    fn timer_slot(&mut self, which: Debounced) -> &mut Option<TimerId> {
        match which {
            Debounced::Scroll => &mut self.scroll_timer,
            Debounced::Resize => &mut self.resize_timer,
        }
    }

    /// Whether the current window can stay as it is for `next`.
    ///
    /// The window is kept when `next` lies inside it, it holds at most
    /// `reuse_tolerance` surplus indices, and every loaded index in it is
    /// mounted (newly loaded items always force a pass).
    fn can_reuse(&self, next: &Range<usize>) -> bool {
        let current = &self.rendered_range;
        if next.start < current.start || next.end > current.end {
            return false;
        }
        let surplus = (next.start - current.start) + (current.end - next.end);
        if surplus > self.config.reuse_tolerance {
            return false;
        }
        let loaded_end = current.end.min(self.items.len());
        self.mounted.len() == loaded_end.saturating_sub(current.start)
    }

    /// Drop everything tied to the current result set. Returns the loading
    /// timer that must be cleared once the borrow is released.
    fn clear_collection(&mut self) -> Option<TimerId> {
        self.session += 1;
        self.detach_all();
        self.items.clear();
        self.total_items = 0;
        self.has_more = true;
        self.next_page = 1;
        self.last_scroll_top = 0.0;
        self.scroll_direction = ScrollDirection::Idle;
        self.phase = self.phase.settle();
        self.loading.take().and_then(|in_flight| in_flight.timer)
    }

    /// `owns_flag` is false when the loading flag was released by a timeout
    /// (and possibly handed to a newer fetch) before this result arrived.
    fn apply_page(
        &mut self,
        ticket: &FetchTicket,
        page: Page<T>,
        owns_flag: bool,
    ) -> LoadOutcome {
        let count = page.items.len();
        match ticket.kind {
            FetchKind::Initial => {
                // pages loaded since the timeout must not be rolled back
                if !owns_flag && self.next_page != 1 {
                    log::debug!(
                        "Dropping late first page ({} items already loaded)",
                        self.items.len()
                    );
                    return LoadOutcome::Skipped(SkipReason::Stale);
                }
                self.detach_all();
                self.items = page.items;
            }
            FetchKind::More => {
                if ticket.page != self.next_page {
                    log::debug!(
                        "Dropping page {} (expected page {})",
                        ticket.page,
                        self.next_page
                    );
                    return LoadOutcome::Skipped(SkipReason::Stale);
                }
                self.items.extend(page.items);
            }
        }

        self.has_more = page.has_more;
        self.total_items = if page.has_more {
            page.total_items.max(self.items.len())
        } else {
            self.items.len()
        };
        self.next_page = ticket.page + 1;
        self.update_spacer_height();

        log::debug!(
            "Loaded page {} ({} items, {}/{} loaded, has_more={})",
            ticket.page,
            count,
            self.items.len(),
            self.total_items,
            self.has_more
        );
        LoadOutcome::Loaded {
            page: ticket.page,
            count,
        }
    }
}

struct Shared<T, S: GridSurface> {
    state: RefCell<ViewState<T, S>>,
    create_item: Box<dyn Fn(&T) -> S::Unit>,
    fetch_items: Box<dyn PageFetcher<T>>,
    scheduler: Rc<dyn Scheduler>,
    notifier: Rc<dyn Notifier>,
}

/// Virtual scroller over a paginated item collection
pub struct WindowedCollectionView<T: 'static, S: GridSurface + 'static> {
    shared: Rc<Shared<T, S>>,
}

impl<T: 'static, S: GridSurface + 'static> Clone for WindowedCollectionView<T, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

/// Non-owning handle used by timer and frame callbacks
pub struct WeakView<T: 'static, S: GridSurface + 'static> {
    shared: Weak<Shared<T, S>>,
}

impl<T: 'static, S: GridSurface + 'static> Clone for WeakView<T, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T: 'static, S: GridSurface + 'static> WeakView<T, S> {
    pub fn upgrade(&self) -> Option<WindowedCollectionView<T, S>> {
        self.shared
            .upgrade()
            .map(|shared| WindowedCollectionView { shared })
    }
}

impl<T: 'static, S: GridSurface + 'static> WindowedCollectionView<T, S> {
    /// Build a view and run the first layout pass. No data is requested
    /// until [`initialize`](Self::initialize) is called.
    pub fn new(parts: ViewParts<T, S>, config: ScrollerConfig) -> Self {
        let ViewParts {
            mut surface,
            create_item,
            fetch_items,
            scheduler,
            notifier,
        } = parts;

        let layout = GridLayout::compute(&surface.container_metrics(), &config);
        surface.set_spacer_height(0.0);
        log::debug!(
            "Scroller created: {} columns, {:.1}x{:.1} cards",
            layout.columns,
            layout.item_width,
            layout.item_height
        );

        let state = ViewState {
            config,
            surface,
            phase: ViewPhase::Constructed,
            items: Vec::new(),
            total_items: 0,
            has_more: true,
            next_page: 1,
            loading: None,
            fetch_generation: 0,
            session: 0,
            layout,
            rendered_range: 0..0,
            mounted: BTreeMap::new(),
            spacer_height: 0.0,
            placeholder_visible: false,
            render_scheduled: false,
            last_scroll_top: 0.0,
            scroll_direction: ScrollDirection::Idle,
            scroll_timer: None,
            resize_timer: None,
        };

        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(state),
                create_item,
                fetch_items,
                scheduler,
                notifier,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakView<T, S> {
        WeakView {
            shared: Rc::downgrade(&self.shared),
        }
    }

    fn state(&self) -> Ref<'_, ViewState<T, S>> {
        self.shared.state.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, ViewState<T, S>> {
        self.shared.state.borrow_mut()
    }

    // ── Data loading ──────────────────────────────────────────────────

    /// Lay out the grid, fetch the first page and render it
    pub async fn initialize(&self) -> Result<LoadOutcome, ScrollerError> {
        if self.phase().is_disposed() {
            return Err(ScrollerError::Disposed);
        }
        self.calculate_layout();
        self.load_initial_batch().await
    }

    /// Fetch page 1 and replace the collection with it
    pub async fn load_initial_batch(&self) -> Result<LoadOutcome, ScrollerError> {
        self.run_fetch(FetchKind::Initial).await
    }

    /// Fetch the next page and append it. A no-op while another fetch is in
    /// flight or once the backend reported the last page.
    pub async fn load_more_items(&self) -> Result<LoadOutcome, ScrollerError> {
        self.run_fetch(FetchKind::More).await
    }

    async fn run_fetch(&self, kind: FetchKind) -> Result<LoadOutcome, ScrollerError> {
        let ticket = match self.begin_fetch(kind) {
            Ok(ticket) => ticket,
            Err(reason) => {
                log::trace!("Skipping {:?} fetch: {:?}", kind, reason);
                return Ok(LoadOutcome::Skipped(reason));
            }
        };

        log::debug!(
            "Fetching page {} (page size {})",
            ticket.page,
            ticket.page_size
        );
        let result = self
            .shared
            .fetch_items
            .fetch_page(ticket.page, ticket.page_size)
            .await;
        self.finish_fetch(ticket, result)
    }

    fn begin_fetch(&self, kind: FetchKind) -> Result<FetchTicket, SkipReason> {
        let (ticket, timeout) = {
            let mut st = self.state_mut();
            if st.phase.is_disposed() {
                return Err(SkipReason::Disposed);
            }
            if st.loading.is_some() {
                return Err(SkipReason::AlreadyLoading);
            }
            let page = match kind {
                FetchKind::Initial => 1,
                FetchKind::More if !st.has_more => return Err(SkipReason::Exhausted),
                FetchKind::More => st.next_page,
            };
            if kind == FetchKind::Initial && st.phase.is_constructed() {
                st.phase = ViewPhase::Initializing;
            }

            st.fetch_generation += 1;
            let generation = st.fetch_generation;
            st.loading = Some(InFlight {
                generation,
                timer: None,
            });
            let ticket = FetchTicket {
                kind,
                page,
                page_size: st.config.page_size,
                generation,
                session: st.session,
            };
            (ticket, st.config.loading_timeout())
        };

        let generation = ticket.generation;
        let weak = self.downgrade();
        let timer = self.shared.scheduler.set_timeout(
            timeout,
            Box::new(move || {
                if let Some(view) = weak.upgrade() {
                    view.expire_loading(generation);
                }
            }),
        );
        if let Some(in_flight) = self.state_mut().loading.as_mut() {
            if in_flight.generation == generation {
                in_flight.timer = Some(timer);
            }
        }
        Ok(ticket)
    }

    /// Release the loading flag of a fetch that never settled
    fn expire_loading(&self, generation: u64) {
        let mut st = self.state_mut();
        let owns_flag = st
            .loading
            .as_ref()
            .map_or(false, |in_flight| in_flight.generation == generation);
        if owns_flag {
            log::warn!(
                "Page fetch did not settle within {}ms, releasing loading flag",
                st.config.loading_timeout_ms
            );
            st.loading = None;
            st.phase = st.phase.settle();
        }
    }

    fn finish_fetch(
        &self,
        ticket: FetchTicket,
        result: Result<Page<T>, String>,
    ) -> Result<LoadOutcome, ScrollerError> {
        let (outcome, timer) = {
            let mut guard = self.state_mut();
            let st = &mut *guard;
            if st.session != ticket.session || st.phase.is_disposed() {
                log::debug!("Discarding page {} from a previous session", ticket.page);
                return Ok(LoadOutcome::Skipped(SkipReason::Stale));
            }

            let owns_flag = st
                .loading
                .as_ref()
                .map_or(false, |in_flight| in_flight.generation == ticket.generation);
            let timer = if owns_flag {
                st.loading.take().and_then(|in_flight| in_flight.timer)
            } else {
                None
            };
            if ticket.kind == FetchKind::Initial {
                st.phase = st.phase.settle();
            }

            let outcome = match result {
                Ok(page) => Ok(st.apply_page(&ticket, page, owns_flag)),
                Err(message) => Err(ScrollerError::Fetch {
                    page: ticket.page,
                    message,
                }),
            };
            (outcome, timer)
        };

        if let Some(timer) = timer {
            self.shared.scheduler.clear_timeout(timer);
        }

        match &outcome {
            Ok(LoadOutcome::Loaded { .. }) => self.schedule_render(),
            Ok(LoadOutcome::Skipped(_)) => {}
            Err(err) => {
                log::error!("{}", err);
                self.shared
                    .notifier
                    .notify(NoticeLevel::Error, &err.user_message());
            }
        }
        outcome
    }

    fn spawn_load_more(&self) {
        let view = self.clone();
        self.shared.scheduler.spawn_local(Box::pin(async move {
            if let Err(err) = view.load_more_items().await {
                log::debug!("Background page load failed: {}", err);
            }
        }));
    }

    // ── Layout ────────────────────────────────────────────────────────

    /// Recompute the grid from the container width. When the layout changed
    /// every mounted unit is detached (positions are stale) and a render is
    /// scheduled. Returns whether the layout changed.
    pub fn calculate_layout(&self) -> bool {
        let changed = {
            let mut guard = self.state_mut();
            let st = &mut *guard;
            if st.phase.is_disposed() {
                return false;
            }
            let next = GridLayout::compute(&st.surface.container_metrics(), &st.config);
            if next == st.layout {
                false
            } else {
                log::debug!(
                    "Layout changed: {} -> {} columns, card {:.1}x{:.1}",
                    st.layout.columns,
                    next.columns,
                    next.item_width,
                    next.item_height
                );
                st.layout = next;
                st.detach_all();
                st.update_spacer_height();
                true
            }
        };
        if changed {
            self.schedule_render();
        }
        changed
    }

    fn handle_resize(&self) {
        self.calculate_layout();
        // viewport height may have changed without touching the columns
        self.schedule_render();
    }

    // ── Rendering ─────────────────────────────────────────────────────

    /// Request a render pass; repeated calls within one frame coalesce
    pub fn schedule_render(&self) {
        {
            let mut st = self.state_mut();
            if st.render_scheduled || st.phase.is_disposed() {
                return;
            }
            st.render_scheduled = true;
        }
        let weak = self.downgrade();
        self.shared.scheduler.request_frame(Box::new(move || {
            if let Some(view) = weak.upgrade() {
                view.render_items();
            }
        }));
    }

    /// Reconcile mounted units with the window for the current scroll
    /// position. Normally reached through [`schedule_render`](Self::schedule_render).
    pub fn render_items(&self) {
        let started = instant::Instant::now();
        let load_more = {
            let mut guard = self.state_mut();
            let st = &mut *guard;
            st.render_scheduled = false;
            if st.phase.is_disposed() || st.layout.is_degenerate() {
                return;
            }

            let metrics = st.surface.scroll_metrics();
            let range = st
                .layout
                .visible_range(&metrics, st.total_items, st.config.overscan);

            if st.can_reuse(&range) {
                log::trace!(
                    "Keeping window {:?} for {:?}",
                    st.rendered_range,
                    range
                );
            } else {
                let stale: Vec<usize> = st
                    .mounted
                    .keys()
                    .copied()
                    .filter(|index| !range.contains(index) || *index >= st.items.len())
                    .collect();
                for index in stale {
                    if let Some(unit) = st.mounted.remove(&index) {
                        st.surface.detach(index, &unit);
                    }
                }

                let loaded_end = range.end.min(st.items.len());
                for index in range.start..loaded_end {
                    if st.mounted.contains_key(&index) {
                        continue;
                    }
                    let unit = (self.shared.create_item)(&st.items[index]);
                    let slot = st.layout.slot(index);
                    st.surface.attach(&unit, &slot);
                    st.mounted.insert(index, unit);
                }
                st.rendered_range = range.clone();
            }

            let empty = st.items.is_empty() && !st.has_more && st.loading.is_none();
            st.set_placeholder(empty);

            log::trace!(
                "Rendered {:?} ({} mounted) in {:?}",
                st.rendered_range,
                st.mounted.len(),
                started.elapsed()
            );

            let remaining = st.items.len().saturating_sub(range.end);
            st.phase.is_ready()
                && st.has_more
                && st.loading.is_none()
                && remaining <= 2 * st.layout.columns
        };

        if load_more {
            self.spawn_load_more();
        }
    }

    // ── Scroll and resize ─────────────────────────────────────────────

    /// Raw scroll event; debounced into [`handle_scroll`](Self::handle_scroll)
    pub fn on_scroll(&self) {
        self.debounce(Debounced::Scroll);
    }

    /// Raw resize event; debounced into a layout pass
    pub fn on_resize(&self) {
        self.debounce(Debounced::Resize);
    }

    fn debounce(&self, which: Debounced) {
        let (delay, previous) = {
            let mut st = self.state_mut();
            if st.phase.is_disposed() {
                return;
            }
            let delay = match which {
                Debounced::Scroll => st.config.scroll_debounce(),
                Debounced::Resize => st.config.resize_debounce(),
            };
            (delay, st.timer_slot(which).take())
        };
        if let Some(previous) = previous {
            self.shared.scheduler.clear_timeout(previous);
        }

        let weak = self.downgrade();
        let timer = self.shared.scheduler.set_timeout(
            delay,
            Box::new(move || {
                if let Some(view) = weak.upgrade() {
                    view.state_mut().timer_slot(which).take();
                    match which {
                        Debounced::Scroll => view.handle_scroll(),
                        Debounced::Resize => view.handle_resize(),
                    }
                }
            }),
        );
        *self.state_mut().timer_slot(which) = Some(timer);
    }

    /// Update scroll bookkeeping, schedule a render and load the next page
    /// when the scroll position is near the bottom of the content.
    pub fn handle_scroll(&self) {
        let load_more = {
            let mut st = self.state_mut();
            if st.phase.is_disposed() {
                return;
            }
            let metrics = st.surface.scroll_metrics();
            st.scroll_direction = if metrics.scroll_top > st.last_scroll_top {
                ScrollDirection::Down
            } else if metrics.scroll_top < st.last_scroll_top {
                ScrollDirection::Up
            } else {
                st.scroll_direction
            };
            st.last_scroll_top = metrics.scroll_top;

            if st.layout.is_degenerate() {
                false
            } else {
                let threshold =
                    (metrics.scroll_height * 0.2).min(st.layout.row_height() * 2.0);
                let near_bottom = metrics.scroll_top + metrics.viewport_height
                    >= metrics.scroll_height - threshold;
                near_bottom && st.phase.is_ready() && st.has_more && st.loading.is_none()
            }
        };

        self.schedule_render();
        if load_more {
            log::debug!("Scrolled near the bottom, loading more items");
            self.spawn_load_more();
        }
    }

    // ── Reset and refresh ─────────────────────────────────────────────

    /// Drop every loaded item and mounted unit (e.g. after a filter change)
    pub fn reset(&self) {
        let timer = {
            let mut guard = self.state_mut();
            let st = &mut *guard;
            if st.phase.is_disposed() {
                return;
            }
            let timer = st.clear_collection();
            st.update_spacer_height();
            st.set_placeholder(false);
            st.surface.scroll_to(0.0);
            timer
        };
        if let Some(timer) = timer {
            self.shared.scheduler.clear_timeout(timer);
        }
        log::debug!("Scroller reset");
    }

    /// Replace the collection with an already fetched result set
    pub fn refresh_with_data(&self, items: Vec<T>, total_items: usize, has_more: bool) {
        let timer = {
            let mut guard = self.state_mut();
            let st = &mut *guard;
            if st.phase.is_disposed() {
                return;
            }
            let timer = st.clear_collection();

            let pages_covered = items.len().div_ceil(st.config.page_size.max(1));
            st.items = items;
            st.has_more = has_more;
            st.total_items = if has_more {
                total_items.max(st.items.len())
            } else {
                st.items.len()
            };
            st.next_page = pages_covered as u32 + 1;
            st.update_spacer_height();
            st.surface.scroll_to(0.0);
            log::debug!(
                "Refreshed with {} items (total {}, has_more={})",
                st.items.len(),
                st.total_items,
                st.has_more
            );
            timer
        };
        if let Some(timer) = timer {
            self.shared.scheduler.clear_timeout(timer);
        }
        self.schedule_render();
    }

    /// Detach everything, cancel timers and tear the surface down
    pub fn dispose(&self) {
        let timers: Vec<TimerId> = {
            let mut guard = self.state_mut();
            let st = &mut *guard;
            if st.phase.is_disposed() {
                return;
            }
            st.session += 1;
            st.detach_all();
            st.items.clear();
            st.surface.teardown();
            st.phase = ViewPhase::Disposed;

            st.loading
                .take()
                .and_then(|in_flight| in_flight.timer)
                .into_iter()
                .chain(st.scroll_timer.take())
                .chain(st.resize_timer.take())
                .collect()
        };
        for timer in timers {
            self.shared.scheduler.clear_timeout(timer);
        }
        log::info!("Scroller disposed");
    }

    // ── Item edits ────────────────────────────────────────────────────

    /// Replace one loaded item, rebuilding its unit in place if mounted
    pub fn update_item(&self, index: usize, item: T) -> bool {
        let mut guard = self.state_mut();
        let st = &mut *guard;
        if st.phase.is_disposed() || index >= st.items.len() {
            return false;
        }
        st.items[index] = item;
        if let Some(old) = st.mounted.remove(&index) {
            st.surface.detach(index, &old);
            let unit = (self.shared.create_item)(&st.items[index]);
            let slot = st.layout.slot(index);
            st.surface.attach(&unit, &slot);
            st.mounted.insert(index, unit);
        }
        true
    }

    /// Remove one loaded item (e.g. a deleted model). Items after it shift
    /// up one slot and are re-materialized on the next render.
    pub fn remove_item(&self, index: usize) -> Option<T> {
        let removed = {
            let mut guard = self.state_mut();
            let st = &mut *guard;
            if st.phase.is_disposed() || index >= st.items.len() {
                return None;
            }
            let removed = st.items.remove(index);
            st.total_items = st.total_items.saturating_sub(1).max(st.items.len());

            let shifted: Vec<usize> = st.mounted.range(index..).map(|(i, _)| *i).collect();
            for i in shifted {
                if let Some(unit) = st.mounted.remove(&i) {
                    st.surface.detach(i, &unit);
                }
            }
            st.rendered_range = if st.rendered_range.start <= index {
                st.rendered_range.start..index.min(st.rendered_range.end)
            } else {
                0..0
            };
            st.update_spacer_height();
            removed
        };
        self.schedule_render();
        Some(removed)
    }

    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&T) -> bool,
    {
        self.state().items.iter().position(predicate)
    }

    /// Scroll so the row holding `index` is at the top. Returns the offset
    /// scrolled to, or `None` when the index is out of range.
    pub fn scroll_to_index(&self, index: usize) -> Option<f64> {
        let offset = {
            let mut guard = self.state_mut();
            let st = &mut *guard;
            if st.phase.is_disposed() || index >= st.total_items || st.layout.is_degenerate() {
                return None;
            }
            let offset = st.layout.offset_of(index) + st.surface.scroll_metrics().content_offset;
            st.surface.scroll_to(offset);
            offset
        };
        self.schedule_render();
        Some(offset)
    }

    pub fn scroll_to_top(&self) {
        {
            let mut st = self.state_mut();
            if st.phase.is_disposed() {
                return;
            }
            st.surface.scroll_to(0.0);
        }
        self.schedule_render();
    }

    // ── Accessors ─────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }

    pub fn total_items(&self) -> usize {
        self.state().total_items
    }

    pub fn has_more(&self) -> bool {
        self.state().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading.is_some()
    }

    /// Page the next `load_more_items` call will request
    pub fn next_page(&self) -> u32 {
        self.state().next_page
    }

    pub fn phase(&self) -> ViewPhase {
        self.state().phase
    }

    pub fn layout(&self) -> GridLayout {
        self.state().layout
    }

    pub fn rendered_range(&self) -> Range<usize> {
        self.state().rendered_range.clone()
    }

    pub fn mounted_indices(&self) -> Vec<usize> {
        self.state().mounted.keys().copied().collect()
    }

    pub fn spacer_height(&self) -> f64 {
        self.state().spacer_height
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.state().scroll_direction
    }

    pub fn config(&self) -> ScrollerConfig {
        self.state().config.clone()
    }

    /// Run `f` over the loaded items without cloning them
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.state().items)
    }

    /// Borrow the surface, e.g. to wire host events to its elements.
    /// `f` must not call back into the view.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state().surface)
    }
}

impl<T: Clone + 'static, S: GridSurface + 'static> WindowedCollectionView<T, S> {
    pub fn item(&self, index: usize) -> Option<T> {
        self.state().items.get(index).cloned()
    }
}
