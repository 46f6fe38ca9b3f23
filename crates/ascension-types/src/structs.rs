//! Plain records shared across the workspace: map positions, essence
//! density maps, world events, and the structured facts handed to the
//! story teller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{EssenceType, Realm};
use crate::ids::AgentId;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A tile coordinate on the world map. `(0, 0)` is the top-left tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return this position shifted by `(dx, dy)`, saturating at the `i32`
    /// range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The per-axis vector from `self` to `other`.
    pub const fn delta_to(self, other: Self) -> (i32, i32) {
        (other.x.saturating_sub(self.x), other.y.saturating_sub(self.y))
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Essence
// ---------------------------------------------------------------------------

/// Highest density an essence type can have at a location.
pub const MAX_ESSENCE_DENSITY: u8 = 10;

/// Per-location essence densities, `EssenceType -> 0..=10`.
///
/// Missing entries read as density 0. Densities above
/// [`MAX_ESSENCE_DENSITY`] are clamped on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Essence(BTreeMap<EssenceType, u8>);

impl Essence {
    /// An essence map with every density at 0.
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Build an essence map from `(type, density)` pairs, clamping each
    /// density to [`MAX_ESSENCE_DENSITY`].
    pub fn from_pairs(pairs: &[(EssenceType, u8)]) -> Self {
        let mut essence = Self::empty();
        for &(kind, density) in pairs {
            essence.set(kind, density);
        }
        essence
    }

    /// Set the density for one essence type (clamped).
    pub fn set(&mut self, kind: EssenceType, density: u8) {
        let clamped = density.min(MAX_ESSENCE_DENSITY);
        if clamped == 0 {
            self.0.remove(&kind);
        } else {
            self.0.insert(kind, clamped);
        }
    }

    /// Density of one essence type (0 when absent).
    pub fn density(&self, kind: EssenceType) -> u8 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Iterate the essence types with nonzero density.
    pub fn present(&self) -> impl Iterator<Item = (EssenceType, u8)> + '_ {
        self.0.iter().map(|(&kind, &density)| (kind, density))
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An immutable fact recorded in the world's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The tick (month) the event happened in.
    pub tick: u64,
    /// Rendered event text.
    pub text: String,
    /// Actors the event concerns.
    pub related_actor_ids: Vec<AgentId>,
    /// Whether the event is significant enough to surface prominently.
    pub is_major: bool,
    /// Whether the text came from the story teller rather than a template.
    pub is_story: bool,
}

impl Event {
    /// A minor, templated event.
    pub fn minor(tick: u64, text: String, related_actor_ids: Vec<AgentId>) -> Self {
        Self {
            tick,
            text,
            related_actor_ids,
            is_major: false,
            is_story: false,
        }
    }

    /// A major, templated event.
    pub fn major(tick: u64, text: String, related_actor_ids: Vec<AgentId>) -> Self {
        Self {
            tick,
            text,
            related_actor_ids,
            is_major: true,
            is_story: false,
        }
    }

    /// A story event produced by the narrative collaborator.
    pub fn story(tick: u64, text: String, related_actor_ids: Vec<AgentId>) -> Self {
        Self {
            tick,
            text,
            related_actor_ids,
            is_major: true,
            is_story: true,
        }
    }

    /// Whether the event concerns the given actor.
    pub fn involves(&self, actor: AgentId) -> bool {
        self.related_actor_ids.contains(&actor)
    }
}

// ---------------------------------------------------------------------------
// Narrative facts
// ---------------------------------------------------------------------------

/// Structured facts handed to the story teller when an action completes.
///
/// The story teller turns these into flavor text; the facts themselves
/// carry no rule-side state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NarrativeFact {
    /// A breakthrough attempt resolved.
    Breakthrough {
        /// Name of the actor who attempted it.
        actor_name: String,
        /// Realm before the attempt.
        from: Realm,
        /// Realm after the attempt (equal to `from` on failure).
        to: Realm,
        /// Whether the attempt succeeded.
        success: bool,
        /// The rolled success probability.
        probability: f64,
        /// Lifespan years lost on failure (0 on success).
        lifespan_lost: u32,
    },
    /// A battle resolved.
    Battle {
        /// Name of the winner.
        winner_name: String,
        /// Name of the loser.
        loser_name: String,
        /// Whether the loser died of their wounds.
        loser_died: bool,
        /// Resolver-specific metadata.
        metadata: serde_json::Value,
    },
}
