pub mod media_grid;
pub mod toast;

pub use media_grid::{CardRenderer, MediaGrid, SharedFetcher};
pub use toast::{ToastNotifier, ToastProvider};
