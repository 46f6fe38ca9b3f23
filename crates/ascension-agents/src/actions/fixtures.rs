//! Shared fixtures for action tests: a small world with one of every kind
//! of region and a harness that runs actions against it.

#![allow(clippy::unwrap_used)]

use ascension_types::{Essence, EssenceType, ItemId, Position, Realm, RegionKind, Root};
use ascension_world::{Area, ItemCatalog, Region, Species, WorldMap};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::combat::{BattleResolver, PowerBattleResolver};
use super::contract::{ActionContext, ExecutionContext, Invocable, StepReport};
use crate::actor::{Actor, ActorDirectory};
use crate::config::Rulebook;

/// Inside "Fire Peak" (fire 5, water 3).
pub(crate) const FIRE_PEAK: Position = Position::new(1, 1);
/// Inside "Lake" (water 3 only).
pub(crate) const LAKE: Position = Position::new(5, 1);
/// Inside "Market" (a city).
pub(crate) const MARKET: Position = Position::new(1, 5);
/// Inside "Forest" (rabbits, tigers, herbs).
pub(crate) const FOREST: Position = Position::new(5, 5);
/// Open wilderness with no region.
pub(crate) const WILDERNESS: Position = Position::new(9, 9);

pub(crate) fn test_world() -> WorldMap {
    let mut items = ItemCatalog::new();
    let fur = items.register("Rabbit Fur", 5).unwrap();
    let bone = items.register("Tiger Bone", 80).unwrap();
    let herb = items.register("Spirit Herb", 10).unwrap();

    let mut map = WorldMap::new(10, 10, items).unwrap();
    map.add_region(
        Region::new("Fire Peak", RegionKind::Cultivation, Area::new(Position::new(0, 0), 3, 3))
            .with_essence(Essence::from_pairs(&[(EssenceType::Fire, 5), (EssenceType::Water, 3)])),
    )
    .unwrap();
    map.add_region(
        Region::new("Lake", RegionKind::Cultivation, Area::new(Position::new(4, 0), 3, 3))
            .with_essence(Essence::from_pairs(&[(EssenceType::Water, 3)])),
    )
    .unwrap();
    map.add_region(Region::new(
        "Market",
        RegionKind::City,
        Area::new(Position::new(0, 4), 3, 3),
    ))
    .unwrap();
    map.add_region(
        Region::new("Forest", RegionKind::Normal, Area::new(Position::new(4, 4), 3, 3))
            .with_creature(Species::new("Rabbit", Realm::QiRefinement, vec![fur]))
            .with_creature(Species::new("Tiger", Realm::CoreFormation, vec![bone]))
            .with_plant(Species::new("Herb", Realm::QiRefinement, vec![herb])),
    )
    .unwrap();
    map
}

pub(crate) struct Harness {
    pub world: WorldMap,
    pub rules: Rulebook,
    pub actors: ActorDirectory,
    pub rng: SmallRng,
    pub resolver: Box<dyn BattleResolver>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            world: test_world(),
            rules: Rulebook::default(),
            actors: ActorDirectory::new(),
            rng: SmallRng::seed_from_u64(7),
            resolver: Box::new(PowerBattleResolver),
        }
    }

    pub fn actor(&self, name: &str, root: Root, position: Position) -> Actor {
        Actor::new(name, root, position, &self.rules)
    }

    pub fn item(&self, name: &str) -> ItemId {
        self.world.items().find_by_name(name).unwrap().id
    }

    pub fn view(&self, tick: u64) -> ActionContext<'_> {
        ActionContext {
            tick,
            world: &self.world,
            rules: &self.rules,
            actors: &self.actors,
        }
    }

    pub fn run<A: Invocable>(&mut self, action: &A, actor: &mut Actor, tick: u64) -> StepReport {
        let mut ctx = ExecutionContext {
            tick,
            world: &self.world,
            rules: &self.rules,
            actors: &mut self.actors,
            rng: &mut self.rng,
            resolver: self.resolver.as_mut(),
        };
        action.execute(actor, &mut ctx).unwrap()
    }
}
