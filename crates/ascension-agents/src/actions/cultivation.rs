//! Cultivation and breakthrough.
//!
//! [`Cultivate`] converts the essence of a cultivation site into experience
//! every active tick. Once the ledger reaches the last level of its realm it
//! enters a bottleneck, and only [`Breakthrough`] can clear it: one roll per
//! commitment, with a permanent consequence either way.

use ascension_types::{ActionKind, Event, NarrativeFact};
use serde::{Deserialize, Serialize};

use super::contract::{
    ActionContext, BreakthroughOutcome, ExecutionContext, IneligibleReason, Invocable, Rejection,
    StepReport,
};
use crate::actor::Actor;
use crate::affinity::{best_density, has_affinity};
use crate::error::AgentError;

// ---------------------------------------------------------------------------
// Cultivate
// ---------------------------------------------------------------------------

/// Absorb essence at a cultivation site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cultivate;

impl Invocable for Cultivate {
    const KIND: ActionKind = ActionKind::Cultivate;

    fn can_start(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        if actor.ledger.is_at_peak(ctx.rules) {
            return Err(IneligibleReason::AlreadyAtPeak.into());
        }
        if actor.ledger.is_in_bottleneck() {
            return Err(IneligibleReason::InBottleneck.into());
        }
        let site = ctx
            .world
            .region_at(actor.position)
            .filter(|region| region.is_cultivation_site())
            .ok_or(IneligibleReason::NotAtCultivationSite)?;
        if !has_affinity(actor.root, &ctx.rules.affinities, &site.essence) {
            return Err(IneligibleReason::NoMatchingEssence.into());
        }
        Ok(())
    }

    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        let density = ctx
            .world
            .region_at(actor.position)
            .filter(|region| region.is_cultivation_site())
            .map_or(0, |site| best_density(actor.root, &ctx.rules.affinities, &site.essence));
        let gain = ctx
            .rules
            .actions
            .cultivate_exp_per_density
            .checked_mul(u64::from(density))
            .ok_or_else(|| AgentError::overflow("cultivation experience gain"))?;

        let was_blocked = actor.ledger.is_in_bottleneck();
        let applied = actor.ledger.add_experience(gain, ctx.rules);
        let entered_bottleneck = !was_blocked && actor.ledger.is_in_bottleneck();

        tracing::debug!(
            actor = %actor.id,
            density,
            gain = applied,
            level = actor.ledger.level(),
            "cultivated"
        );

        let mut report = StepReport {
            experience_gained: Some(applied),
            entered_bottleneck,
            ..StepReport::default()
        };
        if entered_bottleneck {
            report.events.push(Event::major(
                ctx.tick,
                format!(
                    "{} has reached the peak of {} and faces a bottleneck",
                    actor.name,
                    actor.realm().display_name()
                ),
                vec![actor.id],
            ));
        }
        Ok(report)
    }

    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        let place = ctx
            .world
            .region_at(actor.position)
            .map_or("the wilds", |region| region.name.as_str());
        Event::minor(
            ctx.tick,
            format!("{} begins cultivating at {place}", actor.name),
            vec![actor.id],
        )
    }
}

// ---------------------------------------------------------------------------
// Breakthrough
// ---------------------------------------------------------------------------

/// Attempt to break through into the next realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Breakthrough;

impl Invocable for Breakthrough {
    const KIND: ActionKind = ActionKind::Breakthrough;

    fn can_start(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        if actor.ledger.is_at_peak(ctx.rules) {
            return Err(IneligibleReason::AlreadyAtPeak.into());
        }
        if !actor.ledger.is_in_bottleneck() {
            return Err(IneligibleReason::NotInBottleneck.into());
        }
        Ok(())
    }

    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        if !actor.ledger.is_in_bottleneck() {
            return Ok(StepReport::default());
        }
        let from = actor.realm();
        let probability = actor.ledger.breakthrough_success_rate(actor.root, ctx.rules);

        let (outcome, text) = if ctx.roll(probability) {
            let Some(to) = actor.advance_realm(ctx.rules) else {
                return Ok(StepReport::default());
            };
            tracing::info!(actor = %actor.id, ?from, ?to, probability, "breakthrough succeeded");
            (
                BreakthroughOutcome::Success {
                    from,
                    to,
                    probability,
                },
                format!(
                    "{} broke through from {} to {}",
                    actor.name,
                    from.display_name(),
                    to.display_name()
                ),
            )
        } else {
            let penalty = actor.ledger.breakthrough_failure_penalty(ctx.rules);
            let lifespan_lost = actor.lifespan.apply_penalty(penalty);
            tracing::info!(
                actor = %actor.id,
                realm = ?from,
                probability,
                lifespan_lost,
                "breakthrough failed"
            );
            (
                BreakthroughOutcome::Failure {
                    realm: from,
                    probability,
                    lifespan_lost,
                },
                format!(
                    "{} failed to break through {} and lost {lifespan_lost} years of life",
                    actor.name,
                    from.display_name()
                ),
            )
        };

        Ok(StepReport {
            breakthrough: Some(outcome),
            events: vec![Event::major(ctx.tick, text, vec![actor.id])],
            ..StepReport::default()
        })
    }

    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        Event::minor(
            ctx.tick,
            format!(
                "{} attempts to break through {}",
                actor.name,
                actor.realm().display_name()
            ),
            vec![actor.id],
        )
    }

    fn narrative_fact(&self, actor: &Actor, report: &StepReport) -> Option<NarrativeFact> {
        let fact = match report.breakthrough? {
            BreakthroughOutcome::Success {
                from,
                to,
                probability,
            } => NarrativeFact::Breakthrough {
                actor_name: actor.name.clone(),
                from,
                to,
                success: true,
                probability,
                lifespan_lost: 0,
            },
            BreakthroughOutcome::Failure {
                realm,
                probability,
                lifespan_lost,
            } => NarrativeFact::Breakthrough {
                actor_name: actor.name.clone(),
                from: realm,
                to: realm,
                success: false,
                probability,
                lifespan_lost,
            },
        };
        Some(fact)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_types::{Realm, Root};

    use super::*;
    use crate::actions::fixtures::{FIRE_PEAK, Harness, LAKE, MARKET};
    use crate::progression::ProgressionLedger;

    #[test]
    fn fire_root_gains_from_the_fire_density_only() {
        let mut h = Harness::new();
        let mut actor = h.actor("Lin", Root::Fire, FIRE_PEAK);
        assert!(Cultivate.is_doable(&actor, &h.view(0)));
        let report = h.run(&Cultivate, &mut actor, 0);
        assert_eq!(report.experience_gained, Some(500));
        assert_eq!(actor.ledger.experience(), 500);
    }

    #[test]
    fn site_without_matching_essence_yields_nothing() {
        let mut h = Harness::new();
        let mut actor = h.actor("Lin", Root::Fire, LAKE);
        assert_eq!(
            Cultivate.can_start(&actor, &h.view(0)),
            Err(IneligibleReason::NoMatchingEssence.into())
        );
        let report = h.run(&Cultivate, &mut actor, 0);
        assert_eq!(report.experience_gained, Some(0));
        assert_eq!(actor.ledger.experience(), 0);
    }

    #[test]
    fn cultivation_needs_a_cultivation_site() {
        let h = Harness::new();
        let actor = h.actor("Lin", Root::Fire, MARKET);
        assert_eq!(
            Cultivate.can_start(&actor, &h.view(0)),
            Err(IneligibleReason::NotAtCultivationSite.into())
        );
    }

    #[test]
    fn level_29_gains_every_tick_without_reaching_the_bottleneck() {
        let mut h = Harness::new();
        let mut actor = h.actor("Lin", Root::Fire, FIRE_PEAK);
        actor.ledger = ProgressionLedger::at_level(Realm::QiRefinement, 29, &h.rules);
        let start = actor.ledger.experience();

        for tick in 0..10 {
            let report = h.run(&Cultivate, &mut actor, tick);
            assert_eq!(report.experience_gained, Some(500), "tick {tick}");
            assert_eq!(Cultivate.is_finished(0, &actor, &h.view(tick)), tick == 9);
        }
        assert_eq!(actor.ledger.experience(), start + 5000);
        assert!(!actor.ledger.is_in_bottleneck());
        assert_eq!(actor.ledger.experience_to_next_level(&h.rules), Some(800));
    }

    #[test]
    fn reaching_the_last_level_announces_the_bottleneck() {
        let mut h = Harness::new();
        let mut actor = h.actor("Lin", Root::Fire, FIRE_PEAK);
        actor.ledger = ProgressionLedger::at_level(Realm::QiRefinement, 29, &h.rules);

        let mut entered = None;
        for tick in 0..12 {
            let report = h.run(&Cultivate, &mut actor, tick);
            if report.entered_bottleneck {
                assert!(report.events.iter().any(|e| e.is_major));
                entered = Some(tick);
                break;
            }
        }
        assert_eq!(entered, Some(11));
        assert!(actor.ledger.is_in_bottleneck());
        assert_eq!(
            Cultivate.can_start(&actor, &h.view(12)),
            Err(IneligibleReason::InBottleneck.into())
        );
        let report = h.run(&Cultivate, &mut actor, 12);
        assert_eq!(report.experience_gained, Some(0));
    }

    #[test]
    fn breakthrough_requires_a_bottleneck() {
        let h = Harness::new();
        let actor = h.actor("Lin", Root::Fire, FIRE_PEAK);
        assert_eq!(
            Breakthrough.can_start(&actor, &h.view(0)),
            Err(IneligibleReason::NotInBottleneck.into())
        );
    }

    #[test]
    fn certain_breakthrough_advances_and_heals_the_delta() {
        let mut h = Harness::new();
        h.rules.realms.qi_refinement.breakthrough_rate = 1.0;
        let mut actor = h.actor("Lin", Root::Fire, FIRE_PEAK);
        actor.ledger = ProgressionLedger::at_level(Realm::QiRefinement, 30, &h.rules);
        actor.hp.reduce(40);
        assert!(Breakthrough.is_doable(&actor, &h.view(0)));

        let report = h.run(&Breakthrough, &mut actor, 0);
        assert!(matches!(
            report.breakthrough,
            Some(BreakthroughOutcome::Success {
                to: Realm::FoundationEstablishment,
                ..
            })
        ));
        assert_eq!(actor.realm(), Realm::FoundationEstablishment);
        assert_eq!(actor.hp.max(), 300);
        assert_eq!(actor.hp.current(), 260);
        assert_eq!(actor.mp.current(), 150);
        assert_eq!(actor.lifespan.max_years, 200);
        assert!(!actor.ledger.is_in_bottleneck());
        assert!(Breakthrough.is_finished(0, &actor, &h.view(0)));

        let fact = Breakthrough.narrative_fact(&actor, &report).unwrap();
        assert!(matches!(fact, NarrativeFact::Breakthrough { success: true, .. }));
    }

    #[test]
    fn every_realm_transition_raises_caps_and_heals_the_delta() {
        let mut h = Harness::new();
        h.rules.breakthrough.root_bonus.insert(Root::Fire, 1.0);
        let mut actor = h.actor("Lin", Root::Fire, FIRE_PEAK);

        for (tick, from) in (0_u64..).zip(Realm::ALL) {
            let Some(to) = from.next() else { break };
            assert_eq!(actor.realm(), from);
            actor.ledger = ProgressionLedger::at_level(from, 30, &h.rules);
            actor.hp.reduce(25);
            actor.mp.reduce(10);
            let before = actor.clone();

            h.run(&Breakthrough, &mut actor, tick);

            let caps = h.rules.realms.stats(to);
            assert_eq!(actor.realm(), to, "{from:?} breakthrough");
            assert_eq!(actor.hp.max(), caps.max_hp);
            assert_eq!(actor.mp.max(), caps.max_mp);
            assert!(actor.hp.max() >= before.hp.max());
            assert!(actor.mp.max() >= before.mp.max());
            assert_eq!(actor.hp.current(), before.hp.current() + (actor.hp.max() - before.hp.max()));
            assert_eq!(actor.mp.current(), before.mp.current() + (actor.mp.max() - before.mp.max()));
            assert!(actor.lifespan.max_years >= caps.lifespan_years);
        }
        assert_eq!(actor.realm(), Realm::NascentSoul);
    }

    #[test]
    fn failed_breakthrough_costs_lifespan_only() {
        let mut h = Harness::new();
        h.rules.realms.qi_refinement.breakthrough_rate = 0.0;
        h.rules.breakthrough.root_bonus.insert(Root::Fire, 0.0);
        let mut actor = h.actor("Lin", Root::Fire, FIRE_PEAK);
        actor.ledger = ProgressionLedger::at_level(Realm::QiRefinement, 30, &h.rules);

        let report = h.run(&Breakthrough, &mut actor, 0);
        assert_eq!(
            report.breakthrough,
            Some(BreakthroughOutcome::Failure {
                realm: Realm::QiRefinement,
                probability: 0.0,
                lifespan_lost: 5,
            })
        );
        assert_eq!(actor.realm(), Realm::QiRefinement);
        assert_eq!(actor.lifespan.max_years, 95);
        assert!(actor.ledger.is_in_bottleneck());
        assert_eq!(actor.hp.max(), 100);
    }
}
