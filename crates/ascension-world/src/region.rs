//! Regions: named rectangular areas of the map with a kind, ambient
//! essence, and the creatures and plants that live there.

use ascension_types::{Essence, ItemId, Position, Realm, RegionId, RegionKind, SpeciesId};
use serde::{Deserialize, Serialize};

/// A rectangular block of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Top-left tile.
    pub origin: Position,
    /// Width in tiles (at least 1).
    pub width: u32,
    /// Height in tiles (at least 1).
    pub height: u32,
}

impl Area {
    /// Create an area. Zero extents are raised to 1.
    pub fn new(origin: Position, width: u32, height: u32) -> Self {
        Self {
            origin,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Whether the tile lies inside this area.
    pub fn contains(&self, pos: Position) -> bool {
        let dx = i64::from(pos.x).saturating_sub(i64::from(self.origin.x));
        let dy = i64::from(pos.y).saturating_sub(i64::from(self.origin.y));
        dx >= 0 && dy >= 0 && dx < i64::from(self.width) && dy < i64::from(self.height)
    }

    /// The centre tile (rounded toward the origin).
    pub fn center(&self) -> Position {
        let half_w = i32::try_from(self.width / 2).unwrap_or(i32::MAX);
        let half_h = i32::try_from(self.height / 2).unwrap_or(i32::MAX);
        self.origin.offset(half_w, half_h)
    }

    /// Iterate every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        let width = i32::try_from(self.width).unwrap_or(i32::MAX);
        let height = i32::try_from(self.height).unwrap_or(i32::MAX);
        (0..height).flat_map(move |dy| (0..width).map(move |dx| self.origin.offset(dx, dy)))
    }
}

/// A creature or plant species found in a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    /// Unique species ID.
    pub id: SpeciesId,
    /// Display name.
    pub name: String,
    /// Minimum realm an actor needs to hunt or harvest this species.
    pub required_realm: Realm,
    /// Items this species can drop; one is drawn uniformly per success.
    pub loot: Vec<ItemId>,
}

impl Species {
    /// Create a species with a fresh ID.
    pub fn new(name: &str, required_realm: Realm, loot: Vec<ItemId>) -> Self {
        Self {
            id: SpeciesId::new(),
            name: name.to_owned(),
            required_realm,
            loot,
        }
    }

    /// Whether an actor in `realm` may hunt or harvest this species.
    pub fn is_accessible_to(&self, realm: Realm) -> bool {
        self.required_realm <= realm
    }
}

/// A region of the world map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Unique region ID.
    pub id: RegionId,
    /// Unique display name.
    pub name: String,
    /// Functional kind.
    pub kind: RegionKind,
    /// Tiles covered by this region.
    pub area: Area,
    /// Ambient essence densities.
    pub essence: Essence,
    /// Huntable creatures.
    pub creatures: Vec<Species>,
    /// Harvestable plants.
    pub plants: Vec<Species>,
}

impl Region {
    /// Create a region with no essence and no species.
    pub fn new(name: &str, kind: RegionKind, area: Area) -> Self {
        Self {
            id: RegionId::new(),
            name: name.to_owned(),
            kind,
            area,
            essence: Essence::empty(),
            creatures: Vec::new(),
            plants: Vec::new(),
        }
    }

    /// Builder: set the essence map.
    #[must_use]
    pub fn with_essence(mut self, essence: Essence) -> Self {
        self.essence = essence;
        self
    }

    /// Builder: add a creature species.
    #[must_use]
    pub fn with_creature(mut self, species: Species) -> Self {
        self.creatures.push(species);
        self
    }

    /// Builder: add a plant species.
    #[must_use]
    pub fn with_plant(mut self, species: Species) -> Self {
        self.plants.push(species);
        self
    }

    /// The region's centre tile.
    pub fn center(&self) -> Position {
        self.area.center()
    }

    /// Whether the tile lies in this region.
    pub fn contains(&self, pos: Position) -> bool {
        self.area.contains(pos)
    }

    /// Whether actors may cultivate here.
    pub fn is_cultivation_site(&self) -> bool {
        self.kind == RegionKind::Cultivation
    }

    /// Whether the region has a market.
    pub fn has_market(&self) -> bool {
        self.kind == RegionKind::City
    }

    /// Creatures an actor in `realm` may hunt.
    pub fn huntable_by(&self, realm: Realm) -> Vec<&Species> {
        self.creatures.iter().filter(|s| s.is_accessible_to(realm)).collect()
    }

    /// Plants an actor in `realm` may harvest.
    pub fn harvestable_by(&self, realm: Realm) -> Vec<&Species> {
        self.plants.iter().filter(|s| s.is_accessible_to(realm)).collect()
    }
}
