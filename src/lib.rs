//! Election advertising and voting analysis.
//!
//! Loads party ad-spend records and merged constituency results, precomputes
//! per-state and per-phase summaries, and resolves a state or phase
//! selection into the bar-chart specifications for that view.
//!
//! The query layer (`aggregator`, `view`) has no I/O and can back any front
//! end; the bundled binary drives it from a terminal menu.

pub mod aggregator;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod output;
pub mod types;
pub mod util;
pub mod view;
