//! Snowline Runtime - Driving and editing
//!
//! - `Vehicle` - locomotion along the track graph, with free roam fallback
//! - `GameClock` - fixed-timestep accumulator for deterministic ticks
//! - `InputState` - key tracking with action bindings
//! - `Session` - owns all state and routes every edit through history

mod clock;
pub mod input;
mod locomotion;
mod session;

pub use clock::GameClock;
pub use input::{InputBindings, InputState};
pub use locomotion::{DriveInput, MotionEvent, TrackPosition, TravelDirection, Vehicle};
pub use session::Session;
