//! Decision source trait and built-in implementations.
//!
//! When an actor has no active commitment, the driver shows it the current
//! world through a read-only [`ActionContext`] and asks a
//! [`DecisionSource`] what to do next. The answer is an [`Intent`]: an
//! action to commit to, a narrative gesture, or `None` to idle this tick.
//!
//! The trait abstracts how decisions are made -- a rule-of-thumb bot, a
//! scripted test double, or an external planner all plug in here. The
//! driver re-checks eligibility before committing, so a source may propose
//! actions that turn out to be ineligible.

use std::collections::{BTreeMap, VecDeque};

use ascension_agents::actions::{Breakthrough, Cultivate, Harvest, Hunt, MoveToRegion, Sell};
use ascension_agents::affinity::best_density;
use ascension_agents::{Action, ActionContext, Actor, Intent};
use ascension_types::{AgentId, Position};
use ascension_world::Region;

/// A source of actor decisions.
pub trait DecisionSource: Send {
    /// Choose what `actor` does next, or `None` to idle this tick.
    fn decide(&mut self, actor: &Actor, ctx: &ActionContext<'_>) -> Option<Intent>;
}

// ---------------------------------------------------------------------------
// IdleDecisionSource
// ---------------------------------------------------------------------------

/// Never proposes anything. Actors only age.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleDecisionSource;

impl DecisionSource for IdleDecisionSource {
    fn decide(&mut self, _actor: &Actor, _ctx: &ActionContext<'_>) -> Option<Intent> {
        None
    }
}

// ---------------------------------------------------------------------------
// ScriptedDecisionSource
// ---------------------------------------------------------------------------

/// Replays per-actor queues of intents, one per decision.
///
/// Used to drive deterministic scenarios. An actor with an empty queue
/// idles.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisionSource {
    scripts: BTreeMap<AgentId, VecDeque<Intent>>,
}

impl ScriptedDecisionSource {
    /// An empty script.
    pub const fn new() -> Self {
        Self {
            scripts: BTreeMap::new(),
        }
    }

    /// Queue an intent for an actor.
    pub fn push(&mut self, actor: AgentId, intent: Intent) {
        self.scripts.entry(actor).or_default().push_back(intent);
    }

    /// Queue an action for an actor.
    pub fn push_action(&mut self, actor: AgentId, action: Action) {
        self.push(actor, Intent::Act(action));
    }

    /// Intents still queued for an actor.
    pub fn remaining(&self, actor: AgentId) -> usize {
        self.scripts.get(&actor).map_or(0, VecDeque::len)
    }
}

impl DecisionSource for ScriptedDecisionSource {
    fn decide(&mut self, actor: &Actor, _ctx: &ActionContext<'_>) -> Option<Intent> {
        self.scripts.get_mut(&actor.id)?.pop_front()
    }
}

// ---------------------------------------------------------------------------
// HeuristicDecisionSource
// ---------------------------------------------------------------------------

/// A rule-of-thumb cultivator.
///
/// In priority order:
///
/// 1. Attempt a breakthrough when stuck in a bottleneck.
/// 2. With at least `sell_threshold` items in the bag, sell at a market or
///    travel to the nearest one.
/// 3. Cultivate when standing on a compatible site.
/// 4. Travel to the densest compatible site while there is still
///    experience to earn.
/// 5. Hunt or harvest when something here is within reach.
/// 6. Travel to the nearest region with game or herbs the actor can take.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicDecisionSource {
    /// Total items held before the actor goes to market.
    pub sell_threshold: u64,
}

impl Default for HeuristicDecisionSource {
    fn default() -> Self {
        Self::new(5)
    }
}

impl HeuristicDecisionSource {
    /// A heuristic that sells once `sell_threshold` items are held.
    pub const fn new(sell_threshold: u64) -> Self {
        Self { sell_threshold }
    }

    fn trade(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Option<Action> {
        let held: u64 = actor.inventory.iter().map(|(_, qty)| u64::from(qty)).sum();
        if held < self.sell_threshold {
            return None;
        }
        let (item, _) = actor.inventory.iter().max_by_key(|&(_, qty)| qty)?;
        let sell = Action::Sell(Sell::all(ctx.world.items().name_of(item)));
        if sell.is_doable(actor, ctx) {
            return Some(sell);
        }
        nearest(actor.position, ctx.world.regions().filter(|r| r.has_market()))
            .map(travel_to)
            .filter(|action| action.is_doable(actor, ctx))
    }
}

impl DecisionSource for HeuristicDecisionSource {
    fn decide(&mut self, actor: &Actor, ctx: &ActionContext<'_>) -> Option<Intent> {
        let rules = ctx.rules;

        let breakthrough = Action::Breakthrough(Breakthrough);
        if breakthrough.is_doable(actor, ctx) {
            return Some(Intent::Act(breakthrough));
        }

        if let Some(action) = self.trade(actor, ctx) {
            return Some(Intent::Act(action));
        }

        let cultivate = Action::Cultivate(Cultivate);
        if cultivate.is_doable(actor, ctx) {
            return Some(Intent::Act(cultivate));
        }

        let can_grow = !actor.ledger.is_at_peak(rules) && !actor.ledger.is_in_bottleneck();
        if can_grow {
            let site = ctx
                .world
                .regions()
                .filter(|r| r.is_cultivation_site())
                .map(|r| (best_density(actor.root, &rules.affinities, &r.essence), r))
                .filter(|(density, _)| *density > 0)
                .max_by_key(|(density, r)| {
                    (*density, std::cmp::Reverse(distance(actor.position, r.center())))
                });
            if let Some((_, region)) = site
                && !region.contains(actor.position)
            {
                return Some(Intent::Act(travel_to(region)));
            }
        }

        for gather in [Action::Hunt(Hunt), Action::Harvest(Harvest)] {
            if gather.is_doable(actor, ctx) {
                return Some(Intent::Act(gather));
            }
        }

        let realm = actor.realm();
        nearest(
            actor.position,
            ctx.world.regions().filter(|r| {
                !r.contains(actor.position)
                    && (!r.huntable_by(realm).is_empty() || !r.harvestable_by(realm).is_empty())
            }),
        )
        .map(|region| Intent::Act(travel_to(region)))
    }
}

fn travel_to(region: &Region) -> Action {
    Action::MoveToRegion(MoveToRegion {
        region: region.name.clone(),
    })
}

fn distance(from: Position, to: Position) -> u64 {
    let (dx, dy) = from.delta_to(to);
    u64::from(dx.unsigned_abs()).saturating_add(u64::from(dy.unsigned_abs()))
}

fn nearest<'w>(from: Position, regions: impl Iterator<Item = &'w Region>) -> Option<&'w Region> {
    regions.min_by_key(|r| distance(from, r.center()))
}
