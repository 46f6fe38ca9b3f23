//! Actor spawner for seeding the simulation with initial cultivators.
//!
//! At simulation start, the spawner creates N seed actors with unique
//! names, random spiritual roots, and random starting ages, and scatters
//! them over the tiles of the configured regions.

use ascension_agents::{Actor, Rulebook};
use ascension_types::{Position, Root};
use ascension_world::{Region, WorldMap};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use tracing::info;

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Configuration for the actor spawner, loaded from the `spawner` section
/// of `ascension-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpawnerConfig {
    /// Youngest starting age in years.
    #[serde(default = "default_min_age_years")]
    pub min_age_years: u32,

    /// Oldest starting age in years.
    #[serde(default = "default_max_age_years")]
    pub max_age_years: u32,

    /// Regions actors may start in. Empty means every region.
    #[serde(default)]
    pub regions: Vec<String>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            min_age_years: default_min_age_years(),
            max_age_years: default_max_age_years(),
            regions: Vec::new(),
        }
    }
}

const fn default_min_age_years() -> u32 {
    14
}

const fn default_max_age_years() -> u32 {
    30
}

// -----------------------------------------------------------------------
// Name pool
// -----------------------------------------------------------------------

/// Built-in pool of cultivator names. The spawner picks without
/// replacement so names stay unique.
const NAME_POOL: &[&str] = &[
    "Lin Feng", "Mei Xue", "Han Li", "Su Yan", "Bai Qing", "Chen Yu", "Du Lan",
    "Fang Yin", "Gu Hao", "Hua Rong", "Jiang Wu", "Kong Zhi", "Lan Ying", "Mo Fan",
    "Ning Shuang", "Ouyang Jian", "Qin Yue", "Shen Ming", "Tang Xin", "Wei Lian",
    "Xiao Yan", "Ye Chen", "Yun Che", "Zhao Ling", "Zhou Ruo", "Lu Bei", "Shi Hao",
    "Liu Xian", "Bai Zhu", "Hong Yi",
];

// -----------------------------------------------------------------------
// Spawning
// -----------------------------------------------------------------------

/// Create `count` seed actors placed inside the configured regions.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] if the age range is inverted, a named
/// region does not exist, no region is available, or the name pool is too
/// small for `count`.
pub fn spawn_seed_actors<R: Rng + ?Sized>(
    config: &SpawnerConfig,
    count: u32,
    world: &WorldMap,
    rules: &Rulebook,
    rng: &mut R,
) -> Result<Vec<Actor>, EngineError> {
    if config.min_age_years > config.max_age_years {
        return Err(EngineError::Spawner {
            message: format!(
                "min_age_years {} exceeds max_age_years {}",
                config.min_age_years, config.max_age_years
            ),
        });
    }

    let regions = starting_regions(config, world)?;
    let count = usize::try_from(count).unwrap_or(usize::MAX);
    if count > NAME_POOL.len() {
        return Err(EngineError::Spawner {
            message: format!("cannot name {count} actors from a pool of {}", NAME_POOL.len()),
        });
    }

    let names: Vec<&str> = NAME_POOL.choose_multiple(rng, count).copied().collect();
    let mut actors = Vec::with_capacity(count);
    for name in names {
        let root = Root::ALL.choose(rng).copied().unwrap_or(Root::Fire);
        let position = random_tile(&regions, rng)?;
        let age = rng.random_range(config.min_age_years..=config.max_age_years);

        let mut actor = Actor::new(name, root, position, rules);
        actor.lifespan = actor.lifespan.with_age_years(age);
        info!(
            actor = %actor.id,
            name,
            root = ?root,
            position = %position,
            age,
            "seed actor spawned"
        );
        actors.push(actor);
    }
    Ok(actors)
}

fn starting_regions<'w>(
    config: &SpawnerConfig,
    world: &'w WorldMap,
) -> Result<Vec<&'w Region>, EngineError> {
    let regions: Vec<&Region> = if config.regions.is_empty() {
        world.regions().collect()
    } else {
        config
            .regions
            .iter()
            .map(|name| {
                world.region_by_name(name).ok_or_else(|| EngineError::Spawner {
                    message: format!("unknown starting region {name:?}"),
                })
            })
            .collect::<Result<_, _>>()?
    };
    if regions.is_empty() {
        return Err(EngineError::Spawner {
            message: String::from("world map has no regions to place actors"),
        });
    }
    Ok(regions)
}

fn random_tile<R: Rng + ?Sized>(regions: &[&Region], rng: &mut R) -> Result<Position, EngineError> {
    let region = regions.choose(rng).ok_or_else(|| EngineError::Spawner {
        message: String::from("no starting region"),
    })?;
    let tiles: Vec<Position> = region.area.tiles().collect();
    tiles.choose(rng).copied().ok_or_else(|| EngineError::Spawner {
        message: format!("region {} has no tiles", region.name),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use ascension_world::create_starting_world;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn spawns_unique_names_inside_regions() {
        let (world, _) = create_starting_world().unwrap();
        let rules = Rulebook::default();
        let mut rng = StdRng::seed_from_u64(11);
        let actors =
            spawn_seed_actors(&SpawnerConfig::default(), 12, &world, &rules, &mut rng).unwrap();

        assert_eq!(actors.len(), 12);
        let names: BTreeSet<&str> = actors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names.len(), 12);
        for actor in &actors {
            assert!(world.region_at(actor.position).is_some());
            assert!((14..=30).contains(&actor.lifespan.age_years()));
            assert!(actor.is_alive());
        }
    }

    #[test]
    fn restricts_to_named_regions() {
        let (world, _) = create_starting_world().unwrap();
        let config = SpawnerConfig {
            regions: vec![String::from("Jade City")],
            ..SpawnerConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let actors =
            spawn_seed_actors(&config, 5, &world, &Rulebook::default(), &mut rng).unwrap();
        let city = world.region_by_name("Jade City").unwrap();
        assert!(actors.iter().all(|a| city.contains(a.position)));
    }

    #[test]
    fn same_seed_same_cast() {
        let (world, _) = create_starting_world().unwrap();
        let rules = Rulebook::default();
        let cast = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            spawn_seed_actors(&SpawnerConfig::default(), 6, &world, &rules, &mut rng)
                .unwrap()
                .into_iter()
                .map(|a| (a.name, a.root, a.position))
                .collect::<Vec<_>>()
        };
        assert_eq!(cast(5), cast(5));
    }

    #[test]
    fn rejects_bad_requests() {
        let (world, _) = create_starting_world().unwrap();
        let rules = Rulebook::default();
        let mut rng = StdRng::seed_from_u64(1);

        let unknown = SpawnerConfig {
            regions: vec![String::from("Atlantis")],
            ..SpawnerConfig::default()
        };
        assert!(spawn_seed_actors(&unknown, 1, &world, &rules, &mut rng).is_err());

        let inverted = SpawnerConfig {
            min_age_years: 40,
            max_age_years: 20,
            ..SpawnerConfig::default()
        };
        assert!(spawn_seed_actors(&inverted, 1, &world, &rules, &mut rng).is_err());

        assert!(spawn_seed_actors(&SpawnerConfig::default(), 500, &world, &rules, &mut rng).is_err());
    }
}
