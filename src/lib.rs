#![allow(non_snake_case)]

// Windowed media grid: layout engine, browser bindings and Dioxus components

pub mod components;
pub mod dom;
pub mod scroller;

pub use scroller::{
    DisplayDensity, LoadOutcome, Page, PageFetcher, ScrollerConfig, ScrollerError,
    WindowedCollectionView,
};
