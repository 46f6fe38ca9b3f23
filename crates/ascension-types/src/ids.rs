//! Identifiers for actors, regions, items and species.
//!
//! Each is its own newtype over a v7 [`Uuid`], so an `AgentId` can never be
//! passed where a `RegionId` is expected, and ordered maps keyed by id list
//! entities in creation order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares one id newtype with its conversions and `Display`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// A fresh, time-ordered id.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The wrapped [`Uuid`].
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an actor (cultivator) in the simulation.
    AgentId
}

define_id! {
    /// Unique identifier for a region of the world map.
    RegionId
}

define_id! {
    /// Unique identifier for an item definition in the item catalog.
    ItemId
}

define_id! {
    /// Unique identifier for a creature or plant species.
    SpeciesId
}
