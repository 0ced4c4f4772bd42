// Virtual scrolling engine for the model gallery
// Layout math, the windowed view and the seams it talks to

pub mod config;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod lifecycle;
pub mod scheduler;
pub mod surface;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::{DisplayDensity, ScrollerConfig};
pub use error::{LogNotifier, NoticeLevel, Notifier, ScrollerError};
pub use fetch::{LoadOutcome, Page, PageFetcher, SkipReason};
pub use layout::{GridLayout, ScreenTier};
pub use lifecycle::ViewPhase;
pub use scheduler::{Scheduler, TimerId};
pub use surface::{ContainerMetrics, GridSurface, ItemSlot, ScrollMetrics};
pub use view::{ScrollDirection, ViewParts, WeakView, WindowedCollectionView};
