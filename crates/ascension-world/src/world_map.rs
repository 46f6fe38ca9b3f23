//! The tile grid: a fixed-size rectangle of tiles, each belonging to at most
//! one [`Region`].
//!
//! The [`WorldMap`] is the spatial backbone of the simulation. It answers the
//! questions actions ask of the world: is this tile on the map, which region
//! covers it, where is a region's centre, and what does the region hold.
//!
//! Internally a row-major `Vec<Option<RegionId>>` indexes tiles to regions,
//! and a name index maps display names to region IDs. The item catalog is
//! carried alongside so the engine has a single read-only world handle.

use std::collections::BTreeMap;

use ascension_types::{Position, RegionId};
use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::error::WorldError;
use crate::region::Region;

/// The world grid with its regions and item catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMap {
    /// Map width in tiles.
    width: u32,
    /// Map height in tiles.
    height: u32,
    /// Row-major tile -> region index.
    tiles: Vec<Option<RegionId>>,
    /// All regions indexed by their identifier.
    regions: BTreeMap<RegionId, Region>,
    /// Region name -> identifier.
    names: BTreeMap<String, RegionId>,
    /// Every lootable and sellable item.
    items: ItemCatalog,
}

impl WorldMap {
    /// Create an empty map of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] when either extent is zero
    /// or the tile count does not fit in memory.
    pub fn new(width: u32, height: u32, items: ItemCatalog) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        let count = usize::try_from(u64::from(width).saturating_mul(u64::from(height)))
            .map_err(|_err| WorldError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            tiles: vec![None; count],
            regions: BTreeMap::new(),
            names: BTreeMap::new(),
            items,
        })
    }

    /// Map width in tiles.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height in tiles.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The item catalog.
    pub const fn items(&self) -> &ItemCatalog {
        &self.items
    }

    // -------------------------------------------------------------------
    // Region operations
    // -------------------------------------------------------------------

    /// Add a region, claiming every tile in its area.
    ///
    /// Nothing is modified unless every tile is free and on the map.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateRegionName`] if the name is taken,
    /// [`WorldError::RegionOutOfBounds`] if the area leaves the map, or
    /// [`WorldError::RegionOverlap`] if a tile already belongs to a region.
    pub fn add_region(&mut self, region: Region) -> Result<RegionId, WorldError> {
        if self.names.contains_key(&region.name) {
            return Err(WorldError::DuplicateRegionName(region.name));
        }

        let mut claimed = Vec::new();
        for pos in region.area.tiles() {
            let Some(index) = self.tile_index(pos) else {
                return Err(WorldError::RegionOutOfBounds {
                    name: region.name,
                    position: pos,
                });
            };
            if matches!(self.tiles.get(index), Some(Some(_))) {
                return Err(WorldError::RegionOverlap {
                    name: region.name,
                    position: pos,
                });
            }
            claimed.push(index);
        }

        let id = region.id;
        for index in claimed {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = Some(id);
            }
        }
        self.names.insert(region.name.clone(), id);
        tracing::debug!(region = %id, name = %region.name, kind = ?region.kind, "region added");
        self.regions.insert(id, region);
        Ok(id)
    }

    /// Look up a region by ID.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] for unknown IDs.
    pub fn region(&self, id: RegionId) -> Result<&Region, WorldError> {
        self.regions.get(&id).ok_or(WorldError::RegionNotFound(id))
    }

    /// Look up a region by display name.
    pub fn region_by_name(&self, name: &str) -> Option<&Region> {
        self.names.get(name).and_then(|id| self.regions.get(id))
    }

    /// Look up a region by display name, failing loudly.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNameNotFound`] for unknown names.
    pub fn require_region_named(&self, name: &str) -> Result<&Region, WorldError> {
        self.region_by_name(name)
            .ok_or_else(|| WorldError::RegionNameNotFound(name.to_owned()))
    }

    /// Iterate over all regions in ID order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of regions on the map.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    // -------------------------------------------------------------------
    // Tile queries
    // -------------------------------------------------------------------

    /// Whether the tile lies on the map.
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.tile_index(pos).is_some()
    }

    /// The region covering a tile, if any.
    pub fn region_at(&self, pos: Position) -> Option<&Region> {
        let index = self.tile_index(pos)?;
        let id = (*self.tiles.get(index)?)?;
        self.regions.get(&id)
    }

    /// Row-major index of a tile, or `None` when off the map.
    fn tile_index(&self, pos: Position) -> Option<usize> {
        let x = u32::try_from(pos.x).ok()?;
        let y = u32::try_from(pos.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = u64::from(y)
            .checked_mul(u64::from(self.width))?
            .checked_add(u64::from(x))?;
        usize::try_from(index).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_types::{Essence, EssenceType, RegionKind};

    use super::*;
    use crate::region::Area;

    fn square(name: &str, x: i32, y: i32, size: u32) -> Region {
        Region::new(name, RegionKind::Normal, Area::new(Position::new(x, y), size, size))
    }

    fn empty_map(width: u32, height: u32) -> WorldMap {
        WorldMap::new(width, height, ItemCatalog::new()).unwrap()
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(matches!(
            WorldMap::new(0, 4, ItemCatalog::new()),
            Err(WorldError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn bounds_check() {
        let map = empty_map(4, 3);
        assert!(map.in_bounds(Position::new(0, 0)));
        assert!(map.in_bounds(Position::new(3, 2)));
        assert!(!map.in_bounds(Position::new(4, 0)));
        assert!(!map.in_bounds(Position::new(0, 3)));
        assert!(!map.in_bounds(Position::new(-1, 0)));
    }

    #[test]
    fn region_lookup_by_tile_and_name() {
        let mut map = empty_map(10, 10);
        let peak = Region::new(
            "Fire Peak",
            RegionKind::Cultivation,
            Area::new(Position::new(2, 2), 3, 3),
        )
        .with_essence(Essence::from_pairs(&[(EssenceType::Fire, 5)]));
        let id = map.add_region(peak).unwrap();

        assert_eq!(map.region_at(Position::new(3, 3)).unwrap().id, id);
        assert!(map.region_at(Position::new(0, 0)).is_none());
        assert_eq!(map.region_by_name("Fire Peak").unwrap().id, id);
        assert!(map.require_region_named("Nowhere").is_err());
        assert_eq!(map.region(id).unwrap().center(), Position::new(3, 3));
    }

    #[test]
    fn overlapping_regions_rejected_without_side_effects() {
        let mut map = empty_map(10, 10);
        map.add_region(square("A", 0, 0, 3)).unwrap();
        let result = map.add_region(square("B", 2, 2, 3));
        assert!(matches!(result, Err(WorldError::RegionOverlap { .. })));
        assert!(map.region_at(Position::new(4, 4)).is_none());
        assert_eq!(map.region_count(), 1);
    }

    #[test]
    fn out_of_bounds_region_rejected() {
        let mut map = empty_map(5, 5);
        let result = map.add_region(square("Edge", 3, 3, 3));
        assert!(matches!(result, Err(WorldError::RegionOutOfBounds { .. })));
        assert!(map.region_at(Position::new(3, 3)).is_none());
    }

    #[test]
    fn duplicate_region_name_rejected() {
        let mut map = empty_map(10, 10);
        map.add_region(square("Same", 0, 0, 1)).unwrap();
        assert!(matches!(
            map.add_region(square("Same", 5, 5, 1)),
            Err(WorldError::DuplicateRegionName(_))
        ));
    }
}
