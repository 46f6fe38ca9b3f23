//! Default starting world for the Ascension simulation.
//!
//! A 24x16 map with three cultivation sites (fire, water, metal), a city
//! with a market, a hunting forest, an herb valley, and a sect's grounds.
//! Untouched tiles are open wilderness with no region.

use ascension_types::{Essence, EssenceType, ItemId, Position, Realm, RegionId, RegionKind};

use crate::catalog::ItemCatalog;
use crate::error::WorldError;
use crate::region::{Area, Region, Species};
use crate::world_map::WorldMap;

/// Map width in tiles.
pub const STARTING_WIDTH: u32 = 24;

/// Map height in tiles.
pub const STARTING_HEIGHT: u32 = 16;

/// Identifiers for all starting regions, returned alongside the world map
/// so that callers can reference specific regions for actor placement.
#[derive(Debug, Clone)]
pub struct StartingRegionIds {
    /// Blazing Peak: fire-dense cultivation site.
    pub blazing_peak: RegionId,
    /// Azure Lake: water-dense cultivation site.
    pub azure_lake: RegionId,
    /// Golden Cliffs: metal and earth cultivation site.
    pub golden_cliffs: RegionId,
    /// Jade City: the market.
    pub jade_city: RegionId,
    /// Whispering Forest: hunting grounds.
    pub whispering_forest: RegionId,
    /// Herb Valley: harvesting grounds.
    pub herb_valley: RegionId,
    /// Cloud Sect: a sect's mountain gate.
    pub cloud_sect: RegionId,
}

/// Item IDs registered in the starting catalog.
struct Loot {
    rabbit_fur: ItemId,
    boar_tusk: ItemId,
    tiger_bone: ItemId,
    spirit_mushroom: ItemId,
    spirit_herb: ItemId,
    blood_ginseng: ItemId,
    lingzhi: ItemId,
}

fn register_items(catalog: &mut ItemCatalog) -> Result<Loot, WorldError> {
    Ok(Loot {
        rabbit_fur: catalog.register("Rabbit Fur", 5)?,
        boar_tusk: catalog.register("Boar Tusk", 12)?,
        tiger_bone: catalog.register("Flame Tiger Bone", 80)?,
        spirit_mushroom: catalog.register("Spirit Mushroom", 8)?,
        spirit_herb: catalog.register("Spirit Herb", 10)?,
        blood_ginseng: catalog.register("Blood Ginseng", 40)?,
        lingzhi: catalog.register("Thousand-Year Lingzhi", 150)?,
    })
}

/// Helper to build a rectangular [`Area`].
const fn rect(x: i32, y: i32, width: u32, height: u32) -> Area {
    Area {
        origin: Position::new(x, y),
        width,
        height,
    }
}

/// Create the default starting world.
///
/// Returns the populated [`WorldMap`] and the [`StartingRegionIds`] for
/// referencing specific regions.
///
/// # Errors
///
/// Returns [`WorldError`] if the map construction fails (should not happen
/// with valid hard-coded data).
pub fn create_starting_world() -> Result<(WorldMap, StartingRegionIds), WorldError> {
    let mut catalog = ItemCatalog::new();
    let loot = register_items(&mut catalog)?;
    let mut map = WorldMap::new(STARTING_WIDTH, STARTING_HEIGHT, catalog)?;

    // ---------------------------------------------------------------
    // Cultivation sites
    // ---------------------------------------------------------------

    let blazing_peak = map.add_region(
        Region::new("Blazing Peak", RegionKind::Cultivation, rect(2, 2, 4, 3)).with_essence(
            Essence::from_pairs(&[(EssenceType::Fire, 6), (EssenceType::Earth, 2)]),
        ),
    )?;

    let azure_lake = map.add_region(
        Region::new("Azure Lake", RegionKind::Cultivation, rect(18, 2, 4, 3)).with_essence(
            Essence::from_pairs(&[(EssenceType::Water, 5), (EssenceType::Wood, 2)]),
        ),
    )?;

    let golden_cliffs = map.add_region(
        Region::new("Golden Cliffs", RegionKind::Cultivation, rect(10, 13, 3, 3)).with_essence(
            Essence::from_pairs(&[(EssenceType::Metal, 4), (EssenceType::Earth, 3)]),
        ),
    )?;

    // ---------------------------------------------------------------
    // Settlements
    // ---------------------------------------------------------------

    let jade_city = map.add_region(Region::new("Jade City", RegionKind::City, rect(10, 6, 4, 4)))?;

    let cloud_sect = map.add_region(
        Region::new("Cloud Sect", RegionKind::Sect, rect(10, 0, 4, 2))
            .with_essence(Essence::from_pairs(&[(EssenceType::Wood, 3)])),
    )?;

    // ---------------------------------------------------------------
    // Wilderness
    // ---------------------------------------------------------------

    let whispering_forest = map.add_region(
        Region::new("Whispering Forest", RegionKind::Normal, rect(2, 10, 6, 4))
            .with_creature(Species::new("Spirit Rabbit", Realm::QiRefinement, vec![loot.rabbit_fur]))
            .with_creature(Species::new(
                "Iron-Hide Boar",
                Realm::QiRefinement,
                vec![loot.boar_tusk, loot.rabbit_fur],
            ))
            .with_creature(Species::new("Flame Tiger", Realm::CoreFormation, vec![loot.tiger_bone]))
            .with_plant(Species::new("Spirit Mushroom", Realm::QiRefinement, vec![
                loot.spirit_mushroom,
            ])),
    )?;

    let herb_valley = map.add_region(
        Region::new("Herb Valley", RegionKind::Normal, rect(16, 10, 5, 4))
            .with_plant(Species::new("Spirit Herb", Realm::QiRefinement, vec![loot.spirit_herb]))
            .with_plant(Species::new(
                "Blood Ginseng",
                Realm::FoundationEstablishment,
                vec![loot.blood_ginseng],
            ))
            .with_plant(Species::new("Thousand-Year Lingzhi", Realm::CoreFormation, vec![
                loot.lingzhi,
            ])),
    )?;

    tracing::info!(
        regions = map.region_count(),
        items = map.items().len(),
        "starting world created"
    );

    Ok((map, StartingRegionIds {
        blazing_peak,
        azure_lake,
        golden_cliffs,
        jade_city,
        whispering_forest,
        herb_valley,
        cloud_sect,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starting_world_builds() {
        let (map, ids) = create_starting_world().unwrap();
        assert_eq!(map.region_count(), 7);
        assert!(map.region(ids.jade_city).unwrap().has_market());
        assert!(map.region(ids.blazing_peak).unwrap().is_cultivation_site());
        assert!(map.region(ids.azure_lake).unwrap().is_cultivation_site());
        assert!(map.region(ids.golden_cliffs).unwrap().is_cultivation_site());
        assert!(!map.region(ids.cloud_sect).unwrap().has_market());
    }

    #[test]
    fn every_loot_item_is_in_the_catalog() {
        let (map, _) = create_starting_world().unwrap();
        for region in map.regions() {
            for species in region.creatures.iter().chain(&region.plants) {
                assert!(!species.loot.is_empty(), "{} has no loot", species.name);
                for item in &species.loot {
                    assert!(map.items().get(*item).is_some());
                }
            }
        }
    }

    #[test]
    fn region_centres_lie_inside_their_regions() {
        let (map, _) = create_starting_world().unwrap();
        for region in map.regions() {
            let center = region.center();
            assert_eq!(map.region_at(center).map(|r| r.id), Some(region.id));
        }
    }

    #[test]
    fn qi_refinement_can_hunt_and_harvest_somewhere() {
        let (map, ids) = create_starting_world().unwrap();
        let forest = map.region(ids.whispering_forest).unwrap();
        assert_eq!(forest.huntable_by(Realm::QiRefinement).len(), 2);
        let valley = map.region(ids.herb_valley).unwrap();
        assert_eq!(valley.harvestable_by(Realm::QiRefinement).len(), 1);
        assert_eq!(valley.harvestable_by(Realm::CoreFormation).len(), 3);
    }
}
