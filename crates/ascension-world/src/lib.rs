//! Map, regions, species, and items for the Ascension simulation.
//!
//! This crate is the World/Map collaborator consumed by the action engine:
//! a rectangular tile grid where each tile belongs to at most one region,
//! regions carry a kind, ambient essence densities, and creature/plant
//! species with realm requirements and loot tables.
//!
//! # Modules
//!
//! - [`catalog`] -- [`ItemCatalog`]: item definitions and market prices.
//! - [`error`] -- Error types for world construction and lookups.
//! - [`region`] -- [`Region`], [`Area`], and [`Species`].
//! - [`world_map`] -- The tile grid with bounds checks and region lookup.
//! - [`starting_world`] -- Default 7-region starting map.

pub mod catalog;
pub mod error;
pub mod region;
pub mod starting_world;
pub mod world_map;

// Re-export primary types at crate root.
pub use catalog::{ItemCatalog, ItemDef};
pub use error::WorldError;
pub use region::{Area, Region, Species};
pub use starting_world::{StartingRegionIds, create_starting_world};
pub use world_map::WorldMap;
