//! Genome size / GC content dashboard for viruses, prokaryotes, and
//! eukaryotes.
//!
//! The data pipeline lives in [`data`] and [`stats`] and has no UI
//! dependency; [`app`], [`state`], and [`ui`] wire it into an egui window.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod stats;
pub mod ui;
