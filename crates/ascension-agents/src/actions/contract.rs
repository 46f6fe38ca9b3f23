//! The uniform contract every invocable action implements.
//!
//! The tick driver only ever talks to actions through [`Invocable`]:
//!
//! 1. `can_start` -- a pure eligibility check, run before every commitment.
//!    It returns `Ok(())` or a [`Rejection`] explaining why not.
//! 2. `execute` -- the per-tick effect, called once per active tick.
//!    Effects are cumulative: calling it on ten ticks applies it ten times.
//! 3. `is_finished` -- completion check after each `execute`.
//! 4. `event` -- the event describing the start of the action.
//! 5. `narrative_fact` -- structured facts for the story teller on
//!    completion, for actions worth narrating.
//!
//! Probabilistic failure (a lost breakthrough roll, an empty hunt) is an
//! ordinary [`StepReport`], never an `Err`. Only genuine faults (overflow,
//! corrupt state) come back as [`AgentError`].

use ascension_types::{ActionKind, AgentId, Event, ItemId, NarrativeFact, Position, Realm};
use ascension_world::WorldMap;
use rand::{Rng, RngCore};

use super::combat::BattleResolver;
use super::duration::duration_elapsed;
use crate::actor::{Actor, ActorDirectory};
use crate::config::Rulebook;
use crate::error::AgentError;

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Why an eligibility check failed. A normal control-flow outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IneligibleReason {
    /// The acting actor is dead.
    #[error("the actor is dead")]
    ActorDead,
    /// Nothing left to cultivate toward.
    #[error("already at the peak of cultivation")]
    AlreadyAtPeak,
    /// Experience is blocked until a breakthrough.
    #[error("stuck in a bottleneck; a breakthrough is required")]
    InBottleneck,
    /// Breakthroughs need a bottleneck.
    #[error("not in a bottleneck")]
    NotInBottleneck,
    /// Cultivation needs a cultivation site.
    #[error("not at a cultivation site")]
    NotAtCultivationSite,
    /// The site holds no essence the actor's root can draw on.
    #[error("no essence here matches the actor's root")]
    NoMatchingEssence,
    /// No creature here is within the actor's realm.
    #[error("nothing here the actor can hunt")]
    NothingToHunt,
    /// No plant here is within the actor's realm.
    #[error("nothing here the actor can harvest")]
    NothingToHarvest,
    /// Selling needs a market.
    #[error("not at a market")]
    NotAtMarket,
    /// The actor holds none of the item (or asked to sell zero).
    #[error("nothing to sell: holds no {item}")]
    NothingToSell {
        /// Item name.
        item: String,
    },
    /// The actor asked to sell more than it holds.
    #[error("wants to sell {requested} {item} but holds only {held}")]
    InsufficientQuantity {
        /// Item name.
        item: String,
        /// Units held.
        held: u32,
        /// Units requested.
        requested: u32,
    },
    /// An action aimed at the actor itself.
    #[error("cannot target oneself")]
    TargetIsSelf,
    /// The target actor is dead.
    #[error("the target is dead")]
    TargetDead,
}

/// A named reference that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnresolvedReference {
    /// No region has this name.
    #[error("no region named {0:?}")]
    Region(String),
    /// No actor has this ID.
    #[error("no actor with id {0}")]
    Actor(AgentId),
    /// No item has this name.
    #[error("no item named {0:?}")]
    Item(String),
}

/// Why an action may not be committed.
///
/// The two cases stay distinct so callers can treat a missing reference
/// differently from a rule that merely does not apply right now.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The rules forbid the action in the current state.
    #[error("ineligible: {0}")]
    Ineligible(#[from] IneligibleReason),
    /// A named target does not exist.
    #[error("unresolved: {0}")]
    Unresolved(#[from] UnresolvedReference),
}

impl Rejection {
    /// Whether the rejection is a missing reference.
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }

    /// Whether the rejection is a rule refusal.
    pub const fn is_ineligible(&self) -> bool {
        matches!(self, Self::Ineligible(_))
    }
}

// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

/// Read-only view of the world for eligibility and completion checks.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// The current tick.
    pub tick: u64,
    /// The map.
    pub world: &'a WorldMap,
    /// Rule parameters.
    pub rules: &'a Rulebook,
    /// Every actor except the one acting.
    pub actors: &'a ActorDirectory,
}

/// Mutable context for one `execute` call.
///
/// The random source and battle resolver are explicit so that a seeded
/// generator replays a run exactly.
pub struct ExecutionContext<'a> {
    /// The current tick.
    pub tick: u64,
    /// The map.
    pub world: &'a WorldMap,
    /// Rule parameters.
    pub rules: &'a Rulebook,
    /// Every actor except the one acting.
    pub actors: &'a mut ActorDirectory,
    /// Random source for rolls and draws.
    pub rng: &'a mut dyn RngCore,
    /// Decides battles.
    pub resolver: &'a mut dyn BattleResolver,
}

impl ExecutionContext<'_> {
    /// A read-only view of this context.
    pub fn view(&self) -> ActionContext<'_> {
        ActionContext {
            tick: self.tick,
            world: self.world,
            rules: self.rules,
            actors: self.actors,
        }
    }

    /// Roll against a probability. NaN and out-of-range values are clamped
    /// to `[0, 1]` (NaN reads as 0).
    pub fn roll(&mut self, probability: f64) -> bool {
        let p = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self.rng.random::<f64>() < p
    }
}

// ---------------------------------------------------------------------------
// Step reports
// ---------------------------------------------------------------------------

/// How a breakthrough roll resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakthroughOutcome {
    /// The actor entered the next realm.
    Success {
        /// Realm before.
        from: Realm,
        /// Realm after.
        to: Realm,
        /// The success probability rolled against.
        probability: f64,
    },
    /// The actor stays in its realm and loses lifespan.
    Failure {
        /// The realm the actor stays in.
        realm: Realm,
        /// The success probability rolled against.
        probability: f64,
        /// Years of lifespan lost.
        lifespan_lost: u32,
    },
}

/// Loot gained from a hunt or harvest tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootDrop {
    /// Species the loot came from.
    pub species: String,
    /// Item gained (one unit).
    pub item: ItemId,
}

/// A completed sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sale {
    /// Item sold.
    pub item: ItemId,
    /// Units sold.
    pub quantity: u32,
    /// Spirit stones credited.
    pub proceeds: u64,
}

/// A resolved battle.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleReport {
    /// Winner ID.
    pub winner: AgentId,
    /// Loser ID.
    pub loser: AgentId,
    /// Winner name.
    pub winner_name: String,
    /// Loser name.
    pub loser_name: String,
    /// Whether the loser died of the HP penalty.
    pub loser_died: bool,
    /// Resolver-specific metadata.
    pub metadata: serde_json::Value,
}

/// What one `execute` call did.
///
/// Every field is optional: an empty report is a valid no-op (for example a
/// hunt tick whose roll failed).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// New position after movement.
    pub moved_to: Option<Position>,
    /// Experience credited to the ledger.
    pub experience_gained: Option<u64>,
    /// Whether this step pushed the ledger into a bottleneck.
    pub entered_bottleneck: bool,
    /// Breakthrough resolution.
    pub breakthrough: Option<BreakthroughOutcome>,
    /// Loot gained.
    pub loot: Option<LootDrop>,
    /// Sale completed.
    pub sale: Option<Sale>,
    /// Battle resolved.
    pub battle: Option<BattleReport>,
    /// Events produced by the step (outcomes, deaths).
    pub events: Vec<Event>,
}

// ---------------------------------------------------------------------------
// Invocable
// ---------------------------------------------------------------------------

/// An action an actor can commit to and the driver can run.
pub trait Invocable {
    /// Which concrete activity this is.
    const KIND: ActionKind;

    /// Check eligibility without side effects.
    ///
    /// Must return the same answer for the same actor and world state no
    /// matter how often it is called.
    fn can_start(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection>;

    /// Boolean form of [`can_start`](Self::can_start).
    fn is_doable(&self, actor: &Actor, ctx: &ActionContext<'_>) -> bool {
        self.can_start(actor, ctx).is_ok()
    }

    /// Apply one tick of effect.
    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError>;

    /// Whether the action is complete after the current tick's `execute`.
    ///
    /// Defaults to the fixed-duration rule for [`Self::KIND`].
    fn is_finished(&self, start_tick: u64, actor: &Actor, ctx: &ActionContext<'_>) -> bool {
        let _ = actor;
        duration_elapsed(Self::KIND, start_tick, ctx.tick)
    }

    /// The event describing the start of the action.
    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event;

    /// Facts for the story teller once the action completes.
    fn narrative_fact(&self, actor: &Actor, report: &StepReport) -> Option<NarrativeFact> {
        let _ = (actor, report);
        None
    }
}
