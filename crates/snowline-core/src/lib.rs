//! Snowline Core - Foundational types for the Snowline track network
//!
//! This crate provides the types that all other Snowline crates depend on:
//! - `WaypointId` - Session-stable waypoint identifiers
//! - `Vec3` - Spatial type with the planar helpers the network needs
//! - `geometry` - Bezier evaluation, chord intersection and projection
//! - `TerrainHeight` - The injected terrain-height collaborator
//! - `SnowlineConfig` - Numeric tuning for network, vehicle and history
//! - Error types and Result alias

pub mod config;
mod error;
pub mod geometry;
mod id;
mod rng;
mod terrain;
mod types;

pub use config::{GridConfig, HistoryConfig, NetworkConfig, SnowlineConfig, VehicleConfig};
pub use error::{Result, SnowlineError};
pub use id::WaypointId;
pub use rng::TrackRng;
pub use terrain::{FlatTerrain, TerrainHeight};
pub use types::Vec3;
