//! Shared type definitions for the skill constellation.
//!
//! This crate is the single source of truth for the plain data exchanged
//! between the data layer, the layout engine, and the renderer. Types
//! defined here flow downstream to `TypeScript` via `ts-rs` so the web
//! renderer draws exactly what the engine computed.
//!
//! # Modules
//!
//! - [`ids`] -- String-backed identifier wrappers for pillars and satellites
//! - [`enums`] -- Quest status, node kinds, and rendering layers
//! - [`geometry`] -- Points and viewport dimensions
//! - [`structs`] -- Input records: pillars, satellites, data snapshots
//! - [`placed`] -- Output records: positioned pillars, satellites, connectors

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod placed;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Layer, NodeKind, QuestStatus};
pub use geometry::{Dimensions, Point};
pub use ids::{NodeId, PillarId, SatelliteId};
pub use placed::{Connector, PlacedPillar, PlacedSatellite};
pub use structs::{Pillar, Satellite, Snapshot};
