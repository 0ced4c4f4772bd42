//! Event-loop hooks the scroller needs from its host
//!
//! Render passes are coalesced into at most one per frame, debounced scroll
//! and resize handling plus the loading timeout run on timers, and
//! background page fetches are spawned as local tasks. The browser host
//! maps these onto `requestAnimationFrame`, `gloo-timers` and
//! `wasm_bindgen_futures::spawn_local` (see `dom::BrowserScheduler`).

use futures::future::LocalBoxFuture;
use std::time::Duration;

/// Handle for a pending timeout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

pub trait Scheduler {
    /// Run `frame` before the next repaint
    fn request_frame(&self, frame: Box<dyn FnOnce()>);

    /// Run `callback` once after `delay` unless cleared first
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a pending timeout; unknown or fired ids are ignored
    fn clear_timeout(&self, id: TimerId);

    /// Drive a future to completion on the current thread
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);
}
