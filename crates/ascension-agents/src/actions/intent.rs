//! The closed set of actions, intents, and commitments.
//!
//! [`Action`] is a tagged union over every invocable kind; each variant
//! carries only the fields its kind needs. An [`Intent`] is what a decision
//! source hands the driver: either an action to commit to, or a purely
//! narrative gesture with no rule effect. A [`Commitment`] tracks an action
//! through its lifecycle:
//!
//! - **Uncommitted**: no commitment exists for the actor.
//! - **Active**: `start_tick` was set by the first [`Commitment::begin`]
//!   and is never overwritten.
//! - **Finished**: the action's `is_finished` check passes; the driver
//!   drops the commitment.

use ascension_types::{ActionKind, Event, NarrativeFact};
use serde::{Deserialize, Serialize};

use super::combat::Battle;
use super::contract::{
    ActionContext, ExecutionContext, IneligibleReason, Invocable, Rejection, StepReport,
};
use super::cultivation::{Breakthrough, Cultivate};
use super::gathering::{Harvest, Hunt};
use super::market::Sell;
use super::movement::{Move, MoveToActor, MoveToRegion};
use crate::actor::Actor;
use crate::error::AgentError;

/// Any invocable action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step by an offset.
    Move(Move),
    /// Travel to a named region.
    MoveToRegion(MoveToRegion),
    /// Travel to another actor.
    MoveToActor(MoveToActor),
    /// Absorb essence at a cultivation site.
    Cultivate(Cultivate),
    /// Attempt the next realm.
    Breakthrough(Breakthrough),
    /// Hunt creatures.
    Hunt(Hunt),
    /// Gather plants.
    Harvest(Harvest),
    /// Sell an item at market.
    Sell(Sell),
    /// Challenge another actor.
    Battle(Battle),
}

macro_rules! dispatch {
    ($action:expr, $inner:ident => $body:expr) => {
        match $action {
            Action::Move($inner) => $body,
            Action::MoveToRegion($inner) => $body,
            Action::MoveToActor($inner) => $body,
            Action::Cultivate($inner) => $body,
            Action::Breakthrough($inner) => $body,
            Action::Hunt($inner) => $body,
            Action::Harvest($inner) => $body,
            Action::Sell($inner) => $body,
            Action::Battle($inner) => $body,
        }
    };
}

const fn kind_of<A: Invocable>(_action: &A) -> ActionKind {
    A::KIND
}

impl Action {
    /// The discriminant of this action.
    pub const fn kind(&self) -> ActionKind {
        dispatch!(self, a => kind_of(a))
    }

    /// Eligibility check. A dead actor is never eligible for anything.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] describing why the action may not start.
    pub fn can_start(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        if !actor.is_alive() {
            return Err(IneligibleReason::ActorDead.into());
        }
        dispatch!(self, a => a.can_start(actor, ctx))
    }

    /// Boolean form of [`can_start`](Self::can_start).
    pub fn is_doable(&self, actor: &Actor, ctx: &ActionContext<'_>) -> bool {
        self.can_start(actor, ctx).is_ok()
    }

    /// Apply one tick of effect.
    ///
    /// # Errors
    ///
    /// Propagates genuine faults such as arithmetic overflow.
    pub fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        dispatch!(self, a => a.execute(actor, ctx))
    }

    /// Whether the action started at `start_tick` is complete.
    pub fn is_finished(&self, start_tick: u64, actor: &Actor, ctx: &ActionContext<'_>) -> bool {
        dispatch!(self, a => a.is_finished(start_tick, actor, ctx))
    }

    /// The event describing the start of the action.
    pub fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        dispatch!(self, a => a.event(actor, ctx))
    }

    /// Facts for the story teller after the final step.
    pub fn narrative_fact(&self, actor: &Actor, report: &StepReport) -> Option<NarrativeFact> {
        dispatch!(self, a => a.narrative_fact(actor, report))
    }
}

/// A gesture with no rule effect, recorded only as a story event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeAction {
    /// What the actor does, in prose.
    pub description: String,
}

impl NarrativeAction {
    /// The story event for this gesture.
    pub fn event(&self, actor: &Actor, tick: u64) -> Event {
        Event::story(
            tick,
            format!("{} {}", actor.name, self.description),
            vec![actor.id],
        )
    }
}

/// What a decision source wants an actor to do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Commit to an invocable action.
    Act(Action),
    /// Record a narrative gesture; no commitment is made.
    Narrate(NarrativeAction),
}

/// An action an actor has committed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    action: Action,
    start_tick: Option<u64>,
}

impl Commitment {
    /// A fresh, not yet started commitment.
    pub const fn new(action: Action) -> Self {
        Self {
            action,
            start_tick: None,
        }
    }

    /// Rebuild a commitment from persisted state.
    pub const fn restore(action: Action, start_tick: Option<u64>) -> Self {
        Self { action, start_tick }
    }

    /// The committed action.
    pub const fn action(&self) -> &Action {
        &self.action
    }

    /// Tick of the first execution, if any.
    pub const fn start_tick(&self) -> Option<u64> {
        self.start_tick
    }

    /// Mark the commitment active at `tick` unless it already is.
    /// Returns the start tick, which never changes once set.
    pub fn begin(&mut self, tick: u64) -> u64 {
        *self.start_tick.get_or_insert(tick)
    }

    /// Whether the first execution has happened.
    pub const fn is_active(&self) -> bool {
        self.start_tick.is_some()
    }

    /// Whether the committed action is complete. Always `false` before the
    /// first execution.
    pub fn is_finished(&self, actor: &Actor, ctx: &ActionContext<'_>) -> bool {
        self.start_tick
            .is_some_and(|start| self.action.is_finished(start, actor, ctx))
    }
}
