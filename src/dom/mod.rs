// Browser bindings for the scroller (wasm32 only)

pub mod binding;
pub mod scheduler;
pub mod surface;

pub use binding::{DomView, GridBinding};
pub use scheduler::BrowserScheduler;
pub use surface::DomSurface;
