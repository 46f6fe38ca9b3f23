//! Movement: single steps and travel toward a region or another actor.
//!
//! Every movement clamps the requested offset to `move_step` tiles per axis.
//! A step whose destination lies off the map is a no-op, not an error.
//! Travel recomputes the vector to its target every tick and delegates to
//! the single-step rule, finishing once the actor has arrived.

use ascension_types::{ActionKind, AgentId, Event, Position};
use ascension_world::WorldMap;
use serde::{Deserialize, Serialize};

use super::contract::{
    ActionContext, ExecutionContext, IneligibleReason, Invocable, Rejection, StepReport,
    UnresolvedReference,
};
use crate::actor::Actor;
use crate::error::AgentError;

/// Move the actor by `(dx, dy)` clamped to `move_step` per axis.
///
/// Returns the new position, or `None` if the actor did not move (zero
/// offset or destination off the map).
pub(crate) fn step(
    actor: &mut Actor,
    dx: i32,
    dy: i32,
    world: &WorldMap,
    move_step: i32,
) -> Option<Position> {
    let limit = move_step.max(0);
    let dest = actor
        .position
        .offset(dx.clamp(-limit, limit), dy.clamp(-limit, limit));
    if dest == actor.position || !world.in_bounds(dest) {
        return None;
    }
    actor.position = dest;
    Some(dest)
}

fn step_toward(actor: &mut Actor, target: Position, ctx: &ExecutionContext<'_>) -> StepReport {
    let (dx, dy) = actor.position.delta_to(target);
    let moved_to = step(actor, dx, dy, ctx.world, ctx.rules.actions.move_step);
    if let Some(pos) = moved_to {
        tracing::debug!(actor = %actor.id, x = pos.x, y = pos.y, "actor travelled");
    }
    StepReport {
        moved_to,
        ..StepReport::default()
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// Step by an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Requested column offset.
    pub dx: i32,
    /// Requested row offset.
    pub dy: i32,
}

impl Invocable for Move {
    const KIND: ActionKind = ActionKind::Move;

    fn can_start(&self, _actor: &Actor, _ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        Ok(())
    }

    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        let moved_to = step(actor, self.dx, self.dy, ctx.world, ctx.rules.actions.move_step);
        if moved_to.is_none() {
            tracing::debug!(actor = %actor.id, dx = self.dx, dy = self.dy, "move blocked at map edge");
        }
        Ok(StepReport {
            moved_to,
            ..StepReport::default()
        })
    }

    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        Event::minor(
            ctx.tick,
            format!("{} moves from {} by ({}, {})", actor.name, actor.position, self.dx, self.dy),
            vec![actor.id],
        )
    }
}

// ---------------------------------------------------------------------------
// MoveToRegion
// ---------------------------------------------------------------------------

/// Travel to a named region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveToRegion {
    /// Target region name.
    pub region: String,
}

impl Invocable for MoveToRegion {
    const KIND: ActionKind = ActionKind::MoveToRegion;

    fn can_start(&self, _actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        ctx.world
            .region_by_name(&self.region)
            .map(|_| ())
            .ok_or_else(|| UnresolvedReference::Region(self.region.clone()).into())
    }

    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        let Some(region) = ctx.world.region_by_name(&self.region) else {
            return Ok(StepReport::default());
        };
        if region.contains(actor.position) {
            return Ok(StepReport::default());
        }
        Ok(step_toward(actor, region.center(), ctx))
    }

    fn is_finished(&self, _start_tick: u64, actor: &Actor, ctx: &ActionContext<'_>) -> bool {
        ctx.world
            .region_by_name(&self.region)
            .is_none_or(|region| region.contains(actor.position))
    }

    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        Event::minor(
            ctx.tick,
            format!("{} sets out for {}", actor.name, self.region),
            vec![actor.id],
        )
    }
}

// ---------------------------------------------------------------------------
// MoveToActor
// ---------------------------------------------------------------------------

/// Travel to another actor's tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveToActor {
    /// The actor to reach.
    pub target: AgentId,
}

impl Invocable for MoveToActor {
    const KIND: ActionKind = ActionKind::MoveToActor;

    fn can_start(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Result<(), Rejection> {
        if self.target == actor.id {
            return Err(IneligibleReason::TargetIsSelf.into());
        }
        let target = ctx
            .actors
            .get(self.target)
            .ok_or(UnresolvedReference::Actor(self.target))?;
        if !target.is_alive() {
            return Err(IneligibleReason::TargetDead.into());
        }
        Ok(())
    }

    fn execute(
        &self,
        actor: &mut Actor,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<StepReport, AgentError> {
        let Some(target) = ctx.actors.get(self.target).filter(|t| t.is_alive()) else {
            return Ok(StepReport::default());
        };
        let destination = target.position;
        Ok(step_toward(actor, destination, ctx))
    }

    fn is_finished(&self, _start_tick: u64, actor: &Actor, ctx: &ActionContext<'_>) -> bool {
        ctx.actors
            .get(self.target)
            .filter(|t| t.is_alive())
            .is_none_or(|t| t.position == actor.position)
    }

    fn event(&self, actor: &Actor, ctx: &ActionContext<'_>) -> Event {
        let target = ctx
            .actors
            .get(self.target)
            .map_or("someone", |t| t.name.as_str());
        Event::minor(
            ctx.tick,
            format!("{} sets out to find {target}", actor.name),
            vec![actor.id, self.target],
        )
    }
}
