//! Error types for the `ascension-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use ascension_types::{ItemId, Position, RegionId};

/// Errors that can occur while building or querying the world map.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A region was not found by ID.
    #[error("region not found: {0}")]
    RegionNotFound(RegionId),

    /// A region was not found by name.
    #[error("no region named {0:?}")]
    RegionNameNotFound(String),

    /// An item was not found in the catalog.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// The map dimensions are unusable.
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width in tiles.
        width: u32,
        /// Requested height in tiles.
        height: u32,
    },

    /// A region's area reaches outside the map.
    #[error("region {name:?} extends outside the map at {position}")]
    RegionOutOfBounds {
        /// The offending region's name.
        name: String,
        /// The first tile found outside the map.
        position: Position,
    },

    /// Two regions claim the same tile.
    #[error("region {name:?} overlaps another region at {position}")]
    RegionOverlap {
        /// The region being inserted.
        name: String,
        /// The contested tile.
        position: Position,
    },

    /// A region with the same name already exists.
    #[error("duplicate region name: {0:?}")]
    DuplicateRegionName(String),

    /// An item with the same name already exists in the catalog.
    #[error("duplicate item name: {0:?}")]
    DuplicateItemName(String),

    /// Arithmetic overflow during tile index computation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
