//! Snowline Save - JSON persistence for track networks
//!
//! This crate handles loading and saving waypoints and segments as JSON.
//! Waypoints are referenced by array index in the file.

mod format;
mod loader;
mod saver;

pub use format::{SaveFile, SegmentRecord, WaypointRecord, SAVE_VERSION};
pub use loader::{load, load_string, LoadWarning, LoadedNetwork};
pub use saver::{save, save_string, to_save_file};
