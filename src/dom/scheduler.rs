//! Browser event-loop scheduler
//!
//! - Frames go through `requestAnimationFrame`
//! - Timeouts are `gloo_timers` handles kept in a thread-local table so they
//!   can be cancelled by id
//! - Tasks run on `wasm_bindgen_futures::spawn_local`

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::scroller::{Scheduler, TimerId};

/// Pending timer handles by id. A handle leaves the table when its timer
/// fires or is cleared, so the table only holds live timers.
struct TimerTable<H> {
    next_id: u32,
    handles: HashMap<TimerId, H>,
}

impl<H> TimerTable<H> {
    fn new() -> Self {
        Self {
            next_id: 1,
            handles: HashMap::new(),
        }
    }

    fn allocate(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    fn insert(&mut self, id: TimerId, handle: H) {
        self.handles.insert(id, handle);
    }

    fn remove(&mut self, id: TimerId) -> Option<H> {
        self.handles.remove(&id)
    }

    fn len(&self) -> usize {
        self.handles.len()
    }
}

// Timeout handles aren't Clone or Send, so they live in a thread_local
thread_local! {
    static PENDING_TIMERS: RefCell<TimerTable<Timeout>> = RefCell::new(TimerTable::new());
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl BrowserScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Number of timeouts that have neither fired nor been cleared
    pub fn pending_timers() -> usize {
        PENDING_TIMERS.with(|timers| timers.borrow().len())
    }
}

impl Scheduler for BrowserScheduler {
    fn request_frame(&self, frame: Box<dyn FnOnce()>) {
        let Some(window) = web_sys::window() else {
            log::warn!("No window for requestAnimationFrame, running frame inline");
            frame();
            return;
        };

        let callback = Closure::once_into_js(move || frame());
        if let Err(e) = window.request_animation_frame(callback.unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = PENDING_TIMERS.with(|timers| timers.borrow_mut().allocate());

        let millis = delay.as_millis().min(u32::MAX as u128) as u32;
        let timeout = Timeout::new(millis, move || {
            // The handle owns this closure; release it once the callback returned
            let handle = PENDING_TIMERS.with(|timers| timers.borrow_mut().remove(id));
            callback();
            if let Some(handle) = handle {
                wasm_bindgen_futures::spawn_local(async move {
                    drop(handle);
                });
            }
        });

        PENDING_TIMERS.with(|timers| {
            timers.borrow_mut().insert(id, timeout);
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        // Dropping a gloo Timeout cancels it
        let handle = PENDING_TIMERS.with(|timers| timers.borrow_mut().remove(id));
        drop(handle);
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
