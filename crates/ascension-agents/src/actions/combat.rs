//! Battles between two actors.
//!
//! [`Battle`] does not implement combat math itself. It draws one roll,
//! hands both participants to a [`BattleResolver`], and applies the fixed
//! HP penalty to whichever actor the resolver names as loser. A loser whose
//! health drops below zero dies of their wounds on the spot.
//!
//! [`PowerBattleResolver`] is the stock resolver: each side's win chance is
//! proportional to its battle power.

use ascension_types::{ActionKind, AgentId, Event, NarrativeFact, Realm};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::contract::{
    ActionContext, BattleReport, ExecutionContext, IneligibleReason, Invocable, Rejection,
    StepReport, UnresolvedReference,
};
use crate::actor::{Actor, DeathCause};
use crate::error::AgentError;

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// The outcome a resolver hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleDecision {
    /// Winning actor.
    pub winner: AgentId,
    /// Losing actor.
    pub loser: AgentId,
    /// Anything the resolver wants recorded alongside the result.
    pub metadata: serde_json::Value,
}

/// Decides who wins a battle.
///
/// `roll` is a uniform draw in `[0, 1)` taken from the simulation's seeded
/// generator, so resolvers stay deterministic under replay. The decision
/// must name both participants, one as winner and the other as loser.
pub trait BattleResolver: Send {
    /// Pick a winner between `initiator` and `opponent`.
    fn decide(&mut self, initiator: &Actor, opponent: &Actor, roll: f64) -> BattleDecision;
}

/// Power of an actor in a fight.
///
/// Formula:
/// - Realm weight: 100, 400, 1600, 6400 for the four realms
/// - Level bonus: `level * 5`
/// - Health bonus: remaining HP as a percentage of the cap (0 to 100)
pub fn battle_power(actor: &Actor) -> u32 {
    let realm_weight: u32 = match actor.realm() {
        Realm::QiRefinement => 100,
        Realm::FoundationEstablishment => 400,
        Realm::CoreFormation => 1600,
        Realm::NascentSoul => 6400,
    };
    let level_bonus = actor.ledger.level().saturating_mul(5);
    let health_pct = actor
        .hp
        .current()
        .max(0)
        .saturating_mul(100)
        .checked_div(actor.hp.max())
        .unwrap_or(0)
        .min(100);
    let health_bonus = u32::try_from(health_pct).unwrap_or(0);

    realm_weight
        .saturating_add(level_bonus)
        .saturating_add(health_bonus)
}

/// Win chance proportional to [`battle_power`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerBattleResolver;

impl BattleResolver for PowerBattleResolver {
    fn decide(&mut self, initiator: &Actor, opponent: &Actor, roll: f64) -> BattleDecision {
        let initiator_power = battle_power(initiator);
        let opponent_power = battle_power(opponent);
        let total = f64::from(initiator_power) + f64::from(opponent_power);
        let chance = if total > 0.0 {
            f64::from(initiator_power) / total
        } else {
            0.5
        };

        let (winner, loser) = if roll < chance {
            (initiator.id, opponent.id)
        } else {
            (opponent.id, initiator.id)
        };
        BattleDecision {
            winner,
            loser,
            metadata: serde_json::json!({
                "initiator_power": initiator_power,
                "opponent_power": opponent_power,
                "initiator_win_chance": chance,
                "roll": roll,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Battle
// ---------------------------------------------------------------------------

/// Challenge another actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    /// The actor being challenged.
    pub opponent: AgentId,
}

impl Invocable for Battle {
    const KIND: ActionKind = ActionKind::Battle;

    fn can_start(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        if self.opponent == actor.id {
            return Err(IneligibleReason::TargetIsSelf.into());
        }
        let opponent = ctx
            .actors
            .get(self.opponent)
            .ok_or(UnresolvedReference::Actor(self.opponent))?;
        if !opponent.is_alive() {
            return Err(IneligibleReason::TargetDead.into());
        }
        Ok(())
    }

    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        let tick = ctx.tick;
        let penalty = ctx.rules.actions.battle_hp_penalty;
        let roll = ctx.rng.random::<f64>();
        let Some(opponent) = ctx.actors.get_mut(self.opponent).filter(|o| o.is_alive()) else {
            return Ok(StepReport::default());
        };

        let decision = ctx.resolver.decide(actor, opponent, roll);
        let initiator_won = decision.winner == actor.id && decision.loser == opponent.id;
        let opponent_won = decision.winner == opponent.id && decision.loser == actor.id;
        assert!(
            initiator_won || opponent_won,
            "battle resolver named {} and {} instead of the two participants",
            decision.winner,
            decision.loser
        );

        let (winner_name, loser_name) = if initiator_won {
            (actor.name.clone(), opponent.name.clone())
        } else {
            (opponent.name.clone(), actor.name.clone())
        };
        let loser = if initiator_won { opponent } else { &mut *actor };
        let loser_died = loser.hp.reduce(penalty);
        if loser_died {
            loser.die(DeathCause::Wounds, tick);
        }

        tracing::info!(
            winner = %decision.winner,
            loser = %decision.loser,
            loser_died,
            "battle resolved"
        );

        let text = format!("{winner_name} defeated {loser_name} in battle");
        let related = vec![decision.winner, decision.loser];
        Ok(StepReport {
            battle: Some(BattleReport {
                winner: decision.winner,
                loser: decision.loser,
                winner_name,
                loser_name,
                loser_died,
                metadata: decision.metadata,
            }),
            events: vec![Event::major(tick, text, related)],
            ..StepReport::default()
        })
    }

    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        let opponent = ctx
            .actors
            .get(self.opponent)
            .map_or("someone", |o| o.name.as_str());
        Event::minor(
            ctx.tick,
            format!("{} challenges {opponent} to battle", actor.name),
            vec![actor.id, self.opponent],
        )
    }

    fn narrative_fact(&self, _actor: &Actor, report: &StepReport) -> Option<NarrativeFact> {
        let battle = report.battle.as_ref()?;
        Some(NarrativeFact::Battle {
            winner_name: battle.winner_name.clone(),
            loser_name: battle.loser_name.clone(),
            loser_died: battle.loser_died,
            metadata: battle.metadata.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_types::Root;

    use super::*;
    use crate::actions::fixtures::{FOREST, Harness, MARKET};
    use crate::progression::ProgressionLedger;

    /// Always lets the same side win.
    struct Rigged {
        initiator_wins: bool,
    }

    impl BattleResolver for Rigged {
        fn decide(&mut self, initiator: &Actor, opponent: &Actor, _roll: f64) -> BattleDecision {
            let (winner, loser) = if self.initiator_wins {
                (initiator.id, opponent.id)
            } else {
                (opponent.id, initiator.id)
            };
            BattleDecision {
                winner,
                loser,
                metadata: serde_json::Value::Null,
            }
        }
    }

    fn arena(initiator_wins: bool) -> (Harness, Actor, AgentId) {
        let mut h = Harness::new();
        h.resolver = Box::new(Rigged { initiator_wins });
        let opponent = h.actor("Mei", Root::Water, FOREST);
        let id = h.actors.insert(opponent).unwrap();
        let actor = h.actor("Lin", Root::Fire, MARKET);
        (h, actor, id)
    }

    #[test]
    fn loser_takes_the_hp_penalty() {
        let (mut h, mut actor, mei) = arena(true);
        let battle = Battle { opponent: mei };
        assert!(battle.is_doable(&actor, &h.view(0)));

        let report = h.run(&battle, &mut actor, 0);
        let outcome = report.battle.clone().unwrap();
        assert_eq!(outcome.winner, actor.id);
        assert_eq!(outcome.loser, mei);
        assert!(!outcome.loser_died);
        assert_eq!(h.actors.get(mei).unwrap().hp.current(), 50);
        assert!(actor.hp.is_full());
        assert!(battle.is_finished(0, &actor, &h.view(0)));
        assert!(matches!(
            battle.narrative_fact(&actor, &report),
            Some(NarrativeFact::Battle { .. })
        ));
    }

    #[test]
    fn initiator_can_lose_and_die() {
        let (mut h, mut actor, mei) = arena(false);
        actor.hp.reduce(80);
        let report = h.run(&Battle { opponent: mei }, &mut actor, 3);
        let outcome = report.battle.unwrap();
        assert_eq!(outcome.loser, actor.id);
        assert!(outcome.loser_died);
        assert!(!actor.is_alive());
        assert_eq!(actor.death.unwrap().tick, 3);
        assert!(h.actors.get(mei).unwrap().hp.is_full());
    }

    #[test]
    fn fighting_a_dead_or_missing_opponent_is_rejected() {
        let (mut h, actor, mei) = arena(true);
        h.actors.get_mut(mei).unwrap().die(DeathCause::OldAge, 0);
        assert_eq!(
            Battle { opponent: mei }.can_start(&actor, &h.view(0)),
            Err(IneligibleReason::TargetDead.into())
        );
        let ghost = AgentId::new();
        assert!(
            Battle { opponent: ghost }
                .can_start(&actor, &h.view(0))
                .unwrap_err()
                .is_unresolved()
        );
        assert_eq!(
            Battle { opponent: actor.id }.can_start(&actor, &h.view(0)),
            Err(IneligibleReason::TargetIsSelf.into())
        );
    }

    #[test]
    fn power_grows_with_realm() {
        let h = Harness::new();
        let mut elder = h.actor("Elder", Root::Earth, FOREST);
        elder.ledger = ProgressionLedger::at_level(Realm::CoreFormation, 1, &h.rules);
        let novice = h.actor("Novice", Root::Earth, FOREST);
        assert_eq!(battle_power(&novice), 205);
        assert_eq!(battle_power(&elder), 1705);
    }

    #[test]
    fn power_resolver_follows_the_roll() {
        let h = Harness::new();
        let a = h.actor("A", Root::Earth, FOREST);
        let b = h.actor("B", Root::Earth, FOREST);
        let mut resolver = PowerBattleResolver;

        let low = resolver.decide(&a, &b, 0.1);
        assert_eq!((low.winner, low.loser), (a.id, b.id));
        let high = resolver.decide(&a, &b, 0.9);
        assert_eq!((high.winner, high.loser), (b.id, a.id));
        assert_eq!(high.metadata["initiator_win_chance"], 0.5);
    }
}
