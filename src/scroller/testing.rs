//! Test doubles for driving a view without a browser

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use super::config::ScrollerConfig;
use super::error::{NoticeLevel, Notifier};
use super::fetch::{Page, PageFetcher};
use super::scheduler::{Scheduler, TimerId};
use super::surface::{ContainerMetrics, GridSurface, ItemSlot, ScrollMetrics};
use super::view::{ViewParts, WindowedCollectionView};

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: usize,
    pub name: String,
}

impl Card {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            name: format!("lora-{:04}", id),
        }
    }
}

/// Unit produced by the test factory
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub card_id: usize,
}

// ── Scheduler ───────────────────────────────────────────────────────────────

struct PendingTimer {
    id: TimerId,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

/// Scheduler with a virtual clock and an explicit frame queue
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_timer: Cell<u32>,
    frames: RefCell<VecDeque<Box<dyn FnOnce()>>>,
    timers: RefCell<Vec<PendingTimer>>,
    spawner: LocalSpawner,
}

impl ManualScheduler {
    pub fn new(spawner: LocalSpawner) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            next_timer: Cell::new(1),
            frames: RefCell::new(VecDeque::new()),
            timers: RefCell::new(Vec::new()),
            spawner,
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Run queued frames, including ones queued while running
    pub fn run_frames(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.frames.borrow_mut().pop_front();
            match next {
                Some(frame) => {
                    frame();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Move the clock forward, firing due timers in order
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let position = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.id))
                    .map(|(i, _)| i);
                position.map(|i| timers.remove(i))
            };
            match next {
                Some(timer) => {
                    self.now.set(timer.due);
                    (timer.callback)();
                }
                None => break,
            }
        }
        self.now.set(target);
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&self, frame: Box<dyn FnOnce()>) {
        self.frames.borrow_mut().push_back(frame);
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        self.timers.borrow_mut().push(PendingTimer {
            id,
            due: self.now.get() + delay,
            callback,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().retain(|timer| timer.id != id);
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner
            .spawn_local(task)
            .expect("local pool accepts tasks");
    }
}

// ── Surface ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub client_width: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub scroll_top: f64,
    pub content_offset: f64,
    pub spacer_height: f64,
    pub spacer_removed: bool,
    pub placeholder: bool,
    /// index -> (card id, slot)
    pub attached: BTreeMap<usize, (usize, ItemSlot)>,
    pub attach_calls: usize,
    pub detach_calls: usize,
}

impl SurfaceLog {
    pub fn scroll_height(&self) -> f64 {
        (self.spacer_height + self.content_offset).max(self.viewport_height)
    }
}

#[derive(Clone)]
pub struct RecordingSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl GridSurface for RecordingSurface {
    type Unit = Tile;

    fn container_metrics(&self) -> ContainerMetrics {
        let log = self.log.borrow();
        ContainerMetrics {
            client_width: log.client_width,
            padding_left: 0.0,
            padding_right: 0.0,
            viewport_width: log.viewport_width,
        }
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        let log = self.log.borrow();
        ScrollMetrics {
            scroll_top: log.scroll_top,
            viewport_height: log.viewport_height,
            scroll_height: log.scroll_height(),
            content_offset: log.content_offset,
        }
    }

    fn attach(&mut self, unit: &Tile, slot: &ItemSlot) {
        let mut log = self.log.borrow_mut();
        log.attach_calls += 1;
        let previous = log.attached.insert(slot.index, (unit.card_id, *slot));
        assert!(previous.is_none(), "index {} attached twice", slot.index);
    }

    fn detach(&mut self, index: usize, _unit: &Tile) {
        let mut log = self.log.borrow_mut();
        log.detach_calls += 1;
        assert!(
            log.attached.remove(&index).is_some(),
            "index {} detached but not attached",
            index
        );
    }

    fn set_spacer_height(&mut self, height: f64) {
        self.log.borrow_mut().spacer_height = height;
    }

    fn set_empty_placeholder(&mut self, visible: bool) {
        self.log.borrow_mut().placeholder = visible;
    }

    fn scroll_to(&mut self, top: f64) {
        self.log.borrow_mut().scroll_top = top;
    }

    fn teardown(&mut self) {
        let mut log = self.log.borrow_mut();
        log.spacer_height = 0.0;
        log.spacer_removed = true;
        log.placeholder = false;
    }
}

// ── Fetcher ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchMode {
    /// Resolve immediately
    Serve,
    /// Never settle
    Hang,
    /// Reject immediately
    Fail,
    /// Wait until the test releases the request
    Gate,
}

pub struct FetchLog {
    pub mode: FetchMode,
    pub calls: Vec<(u32, usize)>,
    pub gates: Vec<oneshot::Sender<()>>,
}

/// Serves `total` cards in pages of the requested size
pub struct ScriptedFetcher {
    pub total: usize,
    pub log: Rc<RefCell<FetchLog>>,
}

#[async_trait(?Send)]
impl PageFetcher<Card> for ScriptedFetcher {
    async fn fetch_page(&self, page: u32, page_size: usize) -> Result<Page<Card>, String> {
        let mode = {
            let mut log = self.log.borrow_mut();
            log.calls.push((page, page_size));
            log.mode
        };
        match mode {
            FetchMode::Serve => {}
            FetchMode::Hang => futures::future::pending::<()>().await,
            FetchMode::Fail => return Err("backend unavailable".to_string()),
            FetchMode::Gate => {
                let (tx, rx) = oneshot::channel();
                self.log.borrow_mut().gates.push(tx);
                let _ = rx.await;
            }
        }

        let start = (page as usize - 1) * page_size;
        let end = (start + page_size).min(self.total);
        let items = (start.min(end)..end).map(Card::new).collect();
        Ok(Page::new(items, self.total, end < self.total))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<(NoticeLevel, String)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.borrow_mut().push((level, message.to_string()));
    }
}

// ── Harness ─────────────────────────────────────────────────────────────────

pub struct Harness {
    pub pool: LocalPool,
    pub scheduler: Rc<ManualScheduler>,
    pub surface: Rc<RefCell<SurfaceLog>>,
    pub fetches: Rc<RefCell<FetchLog>>,
    pub notifier: Rc<RecordingNotifier>,
    pub view: WindowedCollectionView<Card, RecordingSurface>,
}

impl Harness {
    /// View over `total` backend items in a `width` x `height` container
    pub fn new(total: usize, config: ScrollerConfig, width: f64, height: f64) -> Self {
        let pool = LocalPool::new();
        let scheduler = Rc::new(ManualScheduler::new(pool.spawner()));
        let surface = Rc::new(RefCell::new(SurfaceLog {
            client_width: width,
            viewport_width: width,
            viewport_height: height,
            ..Default::default()
        }));
        let fetches = Rc::new(RefCell::new(FetchLog {
            mode: FetchMode::Serve,
            calls: Vec::new(),
            gates: Vec::new(),
        }));
        let notifier = Rc::new(RecordingNotifier::default());

        let view = WindowedCollectionView::new(
            ViewParts {
                surface: RecordingSurface {
                    log: Rc::clone(&surface),
                },
                create_item: Box::new(|card: &Card| Tile { card_id: card.id }),
                fetch_items: Box::new(ScriptedFetcher {
                    total,
                    log: Rc::clone(&fetches),
                }),
                scheduler: scheduler.clone(),
                notifier: notifier.clone(),
            },
            config,
        );

        Self {
            pool,
            scheduler,
            surface,
            fetches,
            notifier,
            view,
        }
    }

    pub fn with_page_size(total: usize, page_size: usize) -> Self {
        Self::new(
            total,
            ScrollerConfig {
                page_size,
                ..Default::default()
            },
            1400.0,
            800.0,
        )
    }

    /// Run spawned tasks until none can make progress
    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn initialize(&mut self) {
        let view = self.view.clone();
        let outcome = self.pool.run_until(view.initialize());
        assert!(outcome.is_ok(), "initialize failed: {:?}", outcome);
    }

    pub fn frames(&self) -> usize {
        self.scheduler.run_frames()
    }

    pub fn set_mode(&self, mode: FetchMode) {
        self.fetches.borrow_mut().mode = mode;
    }

    pub fn fetch_calls(&self) -> Vec<(u32, usize)> {
        self.fetches.borrow().calls.clone()
    }

    /// Let the oldest gated request complete
    pub fn release_gate(&self) {
        let gate = self.fetches.borrow_mut().gates.remove(0);
        let _ = gate.send(());
    }

    pub fn scroll_to_bottom(&self) {
        let mut log = self.surface.borrow_mut();
        log.scroll_top = (log.scroll_height() - log.viewport_height).max(0.0);
    }

    /// Mounted units agree with the rendered window and with the surface
    pub fn assert_consistent(&self) {
        let range = self.view.rendered_range();
        let loaded = self.view.len();
        let expected: Vec<usize> = (range.start..range.end.min(loaded)).collect();
        assert_eq!(self.view.mounted_indices(), expected);

        let surface = self.surface.borrow();
        let attached: Vec<usize> = surface.attached.keys().copied().collect();
        assert_eq!(attached, expected);

        let layout = self.view.layout();
        for (index, (card_id, slot)) in surface.attached.iter() {
            assert_eq!(*slot, layout.slot(*index));
            assert_eq!(self.view.item(*index).map(|card| card.id), Some(*card_id));
        }
    }

    pub fn expected_spacer(&self) -> f64 {
        let layout = self.view.layout();
        if layout.columns == 0 {
            return 0.0;
        }
        let rows = self.view.total_items().div_ceil(layout.columns);
        if rows == 0 {
            0.0
        } else {
            rows as f64 * layout.item_height + (rows - 1) as f64 * layout.row_gap
        }
    }
}
