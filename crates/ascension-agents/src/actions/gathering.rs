//! Hunting and harvesting.
//!
//! Both roll independently on every active tick. A passing roll draws one
//! species the actor's realm can handle, then one item from that species'
//! loot table, and adds a single unit to the inventory.

use ascension_types::{ActionKind, Event, Realm};
use ascension_world::{Region, Species};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::contract::{
    ActionContext, ExecutionContext, IneligibleReason, Invocable, LootDrop, Rejection, StepReport,
};
use crate::actor::Actor;
use crate::error::AgentError;

/// Which side of a region's wildlife a gathering action draws from.
#[derive(Debug, Clone, Copy)]
enum Quarry {
    Creatures,
    Plants,
}

impl Quarry {
    fn eligible(self, region: &Region, realm: Realm) -> Vec<&Species> {
        match self {
            Self::Creatures => region.huntable_by(realm),
            Self::Plants => region.harvestable_by(realm),
        }
    }

    const fn nothing_here(self) -> IneligibleReason {
        match self {
            Self::Creatures => IneligibleReason::NothingToHunt,
            Self::Plants => IneligibleReason::NothingToHarvest,
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Creatures => "hunted",
            Self::Plants => "harvested",
        }
    }
}

fn check(quarry: Quarry, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
    let available = ctx
        .world
        .region_at(actor.position)
        .is_some_and(|region| !quarry.eligible(region, actor.realm()).is_empty());
    if available {
        Ok(())
    } else {
        Err(quarry.nothing_here().into())
    }
}

fn gather(
    quarry: Quarry,
    success_rate: f64,
    actor: &mut Actor,
    ctx: &mut ExecutionContext<'_>,
) -> Result<StepReport, AgentError> {
    let world = ctx.world;
    let Some(region) = world.region_at(actor.position) else {
        return Ok(StepReport::default());
    };
    let candidates = quarry.eligible(region, actor.realm());
    if candidates.is_empty() || !ctx.roll(success_rate) {
        return Ok(StepReport::default());
    }
    let Some(species) = candidates.choose(&mut *ctx.rng) else {
        return Ok(StepReport::default());
    };
    let Some(&item) = species.loot.choose(&mut *ctx.rng) else {
        tracing::debug!(species = %species.name, "species has an empty loot table");
        return Ok(StepReport::default());
    };

    actor.inventory.add(item, 1)?;
    let item_name = world.items().name_of(item);
    tracing::debug!(actor = %actor.id, species = %species.name, item = item_name, "loot gained");

    Ok(StepReport {
        loot: Some(LootDrop {
            species: species.name.clone(),
            item,
        }),
        events: vec![Event::minor(
            ctx.tick,
            format!(
                "{} {} a {} and obtained {item_name}",
                actor.name,
                quarry.verb(),
                species.name
            ),
            vec![actor.id],
        )],
        ..StepReport::default()
    })
}

fn place_name<'a>(actor: &Actor, ctx: &ActionContext<'a>) -> &'a str {
    ctx.world
        .region_at(actor.position)
        .map_or("the wilds", |region| region.name.as_str())
}

// ---------------------------------------------------------------------------
// Hunt
// ---------------------------------------------------------------------------

/// Hunt creatures at the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hunt;

impl Invocable for Hunt {
    const KIND: ActionKind = ActionKind::Hunt;

    fn can_start(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        check(Quarry::Creatures, actor, ctx)
    }

    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        let rate = ctx.rules.actions.hunt_success_rate;
        gather(Quarry::Creatures, rate, actor, ctx)
    }

    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        Event::minor(
            ctx.tick,
            format!("{} goes hunting in {}", actor.name, place_name(actor, ctx)),
            vec![actor.id],
        )
    }
}

// ---------------------------------------------------------------------------
// Harvest
// ---------------------------------------------------------------------------

/// Gather plants at the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Harvest;

impl Invocable for Harvest {
    const KIND: ActionKind = ActionKind::Harvest;

    fn can_start(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        check(Quarry::Plants, actor, ctx)
    }

    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        let rate = ctx.rules.actions.harvest_success_rate;
        gather(Quarry::Plants, rate, actor, ctx)
    }

    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        Event::minor(
            ctx.tick,
            format!("{} gathers herbs in {}", actor.name, place_name(actor, ctx)),
            vec![actor.id],
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_types::Root;

    use super::*;
    use crate::actions::fixtures::{FOREST, Harness, MARKET, WILDERNESS};

    #[test]
    fn qi_actor_only_ever_catches_rabbits() {
        let mut h = Harness::new();
        h.rules.actions.hunt_success_rate = 1.0;
        let fur = h.item("Rabbit Fur");
        let mut actor = h.actor("Lin", Root::Wood, FOREST);
        assert!(Hunt.is_doable(&actor, &h.view(0)));

        for tick in 0..6 {
            let report = h.run(&Hunt, &mut actor, tick);
            assert_eq!(report.loot.unwrap().item, fur);
            assert_eq!(report.events.len(), 1);
        }
        assert_eq!(actor.inventory.quantity(fur), 6);
        assert!(Hunt.is_finished(0, &actor, &h.view(5)));
    }

    #[test]
    fn failed_rolls_yield_nothing() {
        let mut h = Harness::new();
        h.rules.actions.harvest_success_rate = 0.0;
        let mut actor = h.actor("Lin", Root::Wood, FOREST);
        for tick in 0..6 {
            assert_eq!(h.run(&Harvest, &mut actor, tick), StepReport::default());
        }
        assert!(actor.inventory.is_empty());
    }

    #[test]
    fn harvest_collects_herbs() {
        let mut h = Harness::new();
        h.rules.actions.harvest_success_rate = 1.0;
        let herb = h.item("Spirit Herb");
        let mut actor = h.actor("Lin", Root::Wood, FOREST);
        let report = h.run(&Harvest, &mut actor, 0);
        assert_eq!(
            report.loot,
            Some(LootDrop {
                species: String::from("Herb"),
                item: herb
            })
        );
        assert_eq!(actor.inventory.quantity(herb), 1);
    }

    #[test]
    fn nothing_to_gather_outside_the_forest() {
        let h = Harness::new();
        for position in [MARKET, WILDERNESS] {
            let actor = h.actor("Lin", Root::Wood, position);
            assert_eq!(
                Hunt.can_start(&actor, &h.view(0)),
                Err(IneligibleReason::NothingToHunt.into())
            );
            assert_eq!(
                Harvest.can_start(&actor, &h.view(0)),
                Err(IneligibleReason::NothingToHarvest.into())
            );
        }
    }
}
