//! Enumeration types for the Ascension simulation.
//!
//! Realms, spiritual roots, essence types, region kinds, and the action
//! kind discriminant shared by every crate in the workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Realms
// ---------------------------------------------------------------------------

/// A cultivation realm (power tier).
///
/// Realms are totally ordered by declaration order: an actor in a later
/// realm is strictly stronger than one in an earlier realm. The ordering is
/// used for eligibility checks (`actor.realm >= species.required_realm`) and
/// the realm tables are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Realm {
    /// The first realm: drawing qi into the body.
    QiRefinement,
    /// Building the foundation of the dao.
    FoundationEstablishment,
    /// Condensing a golden core.
    CoreFormation,
    /// Birthing the nascent soul. The peak realm in this world.
    NascentSoul,
}

impl Realm {
    /// Every realm in ascending order.
    pub const ALL: [Self; 4] = [
        Self::QiRefinement,
        Self::FoundationEstablishment,
        Self::CoreFormation,
        Self::NascentSoul,
    ];

    /// The realm an actor enters on a successful breakthrough.
    ///
    /// Returns `None` for the peak realm.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::QiRefinement => Some(Self::FoundationEstablishment),
            Self::FoundationEstablishment => Some(Self::CoreFormation),
            Self::CoreFormation => Some(Self::NascentSoul),
            Self::NascentSoul => None,
        }
    }

    /// Whether this is the highest realm.
    pub const fn is_peak(self) -> bool {
        self.next().is_none()
    }

    /// Human-readable realm name used in event text.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::QiRefinement => "Qi Refinement",
            Self::FoundationEstablishment => "Foundation Establishment",
            Self::CoreFormation => "Core Formation",
            Self::NascentSoul => "Nascent Soul",
        }
    }
}

// ---------------------------------------------------------------------------
// Roots and essence
// ---------------------------------------------------------------------------

/// An actor's spiritual root: its fixed elemental affinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Root {
    /// Metal root.
    Metal,
    /// Wood root.
    Wood,
    /// Water root.
    Water,
    /// Fire root.
    Fire,
    /// Earth root.
    Earth,
}

impl Root {
    /// Every root.
    pub const ALL: [Self; 5] = [Self::Metal, Self::Wood, Self::Water, Self::Fire, Self::Earth];
}

/// A kind of ambient essence a region can hold.
///
/// Roots map to one or more essence types through the affinity table; the
/// mapping is configuration, not a fixed one-to-one pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EssenceType {
    /// Metal essence.
    Metal,
    /// Wood essence.
    Wood,
    /// Water essence.
    Water,
    /// Fire essence.
    Fire,
    /// Earth essence.
    Earth,
}

impl EssenceType {
    /// Every essence type.
    pub const ALL: [Self; 5] = [Self::Metal, Self::Wood, Self::Water, Self::Fire, Self::Earth];
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// The functional kind of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// Wilderness: hunting grounds, herb fields, plains.
    Normal,
    /// A cultivation site where actors may cultivate.
    Cultivation,
    /// A city with a market where items can be sold.
    City,
    /// A sect's grounds.
    Sect,
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Discriminant identifying which concrete activity an action represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Step by a clamped offset on the map.
    Move,
    /// Travel toward a named region until inside it.
    MoveToRegion,
    /// Travel toward another actor until on the same tile.
    MoveToActor,
    /// Absorb ambient essence at a cultivation site.
    Cultivate,
    /// Attempt to break into the next realm.
    Breakthrough,
    /// Hunt creatures for loot.
    Hunt,
    /// Harvest plants for loot.
    Harvest,
    /// Sell an item at a market.
    Sell,
    /// Fight another actor.
    Battle,
}

impl ActionKind {
    /// Lowercase verb used in logs and event text.
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::MoveToRegion => "travel",
            Self::MoveToActor => "seek",
            Self::Cultivate => "cultivate",
            Self::Breakthrough => "break through",
            Self::Hunt => "hunt",
            Self::Harvest => "harvest",
            Self::Sell => "sell",
            Self::Battle => "battle",
        }
    }
}
