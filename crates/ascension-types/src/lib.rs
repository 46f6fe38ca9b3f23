//! Shared type definitions for the Ascension cultivation simulation.
//!
//! This crate is the single source of truth for the plain data types used
//! across the workspace. It holds no rule logic.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Realms, roots, essence types, region kinds, action kinds
//! - [`structs`] -- Positions, essence maps, events, narrative facts

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionKind, EssenceType, Realm, RegionKind, Root};
pub use ids::{AgentId, ItemId, RegionId, SpeciesId};
pub use structs::{Essence, Event, MAX_ESSENCE_DENSITY, NarrativeFact, Position};
