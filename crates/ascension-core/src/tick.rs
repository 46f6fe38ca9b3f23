//! Tick cycle: the loop that drives the Ascension simulation one month at a
//! time.
//!
//! Each tick visits every living actor in ascending ID order and runs these
//! phases for it, fully, before moving on to the next actor:
//!
//! 1. **Age** -- advance the actor one month; an expired lifespan means
//!    death by old age.
//! 2. **Decide** -- an actor with no active commitment asks the
//!    [`DecisionSource`] for an intent. Narrative intents become story
//!    events. Action intents are checked with `can_start`; eligible ones
//!    are committed and their start event recorded, rejections are noted in
//!    the summary and nothing is committed.
//! 3. **Execute** -- the committed action runs one step. The first step
//!    fixes the commitment's start tick.
//! 4. **Complete** -- if the action is finished the story teller narrates
//!    any fact it yields and the commitment is dropped.
//! 5. **Deaths** -- the actor (and a battle opponent) who died this step is
//!    recorded and loses any commitment.
//!
//! The clock advances once every actor has been visited. With the same
//! initial state, seed, and decision source output, a tick is fully
//! deterministic. Random draws come from a stream keyed on the seed and
//! the tick number, so a run resumed from a snapshot at tick `t` draws
//! exactly what an uninterrupted run draws from tick `t` on.

use std::collections::BTreeMap;
use std::fmt;

use ascension_agents::{
    ActionContext, Actor, ActorDirectory, AgentError, BattleResolver, Commitment, DeathCause,
    ExecutionContext, Intent, PowerBattleResolver, Rejection, Rulebook, StepReport,
};
use ascension_types::{ActionKind, AgentId, Event, Realm};
use ascension_world::WorldMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::clock::WorldClock;
use crate::decision::DecisionSource;
use crate::events::{EventLog, EventSink};
use crate::narrative::{PlainStoryTeller, StoryTeller};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },

    /// An actor's step failed with a genuine fault.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The actor whose step failed.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },
}

/// An actor who died during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeathNotice {
    /// Who died.
    pub agent_id: AgentId,
    /// Their name.
    pub name: String,
    /// How.
    pub cause: DeathCause,
    /// Realm at death.
    pub realm: Realm,
    /// Age in whole years at death.
    pub age_years: u64,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Calendar year of the tick.
    pub year: u64,
    /// Calendar month of the tick.
    pub month: u64,
    /// Number of living actors at end of tick.
    pub actors_alive: u32,
    /// Commitments made this tick.
    pub commitments_started: u32,
    /// Actions that finished this tick.
    pub completed: Vec<(AgentId, ActionKind)>,
    /// Intents the driver refused to commit.
    pub rejections: BTreeMap<AgentId, Rejection>,
    /// Actors who died this tick.
    pub deaths: Vec<DeathNotice>,
}

/// The mutable simulation state passed through the tick cycle.
pub struct SimulationState {
    /// The world clock.
    pub clock: WorldClock,
    /// The world map (read-only during a tick).
    pub world: WorldMap,
    /// Rule parameters.
    pub rules: Rulebook,
    /// Every actor, living or dead.
    pub actors: ActorDirectory,
    /// Active commitments by actor. An absent entry means uncommitted.
    pub commitments: BTreeMap<AgentId, Commitment>,
    /// Recent events.
    pub events: EventLog,
    seed: u64,
    rng: StdRng,
    resolver: Box<dyn BattleResolver>,
    story_teller: Box<dyn StoryTeller>,
}

impl fmt::Debug for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationState")
            .field("clock", &self.clock)
            .field("actors", &self.actors.len())
            .field("commitments", &self.commitments.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl SimulationState {
    /// A state with no actors, a seeded random source, the power-based
    /// battle resolver, and the plain story teller.
    pub fn new(
        world: WorldMap,
        rules: Rulebook,
        clock: WorldClock,
        seed: u64,
        event_capacity: usize,
    ) -> Self {
        let rng = tick_rng(seed, clock.tick());
        Self {
            clock,
            world,
            rules,
            actors: ActorDirectory::new(),
            commitments: BTreeMap::new(),
            events: EventLog::new(event_capacity),
            seed,
            rng,
            resolver: Box::new(PowerBattleResolver),
            story_teller: Box::new(PlainStoryTeller),
        }
    }

    /// Replace the battle resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn BattleResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the story teller.
    #[must_use]
    pub fn with_story_teller(mut self, story_teller: Box<dyn StoryTeller>) -> Self {
        self.story_teller = story_teller;
        self
    }

    /// Register an actor.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateName`] if the name is taken.
    pub fn add_actor(&mut self, actor: Actor) -> Result<AgentId, AgentError> {
        self.actors.insert(actor)
    }

    /// The actor's active commitment, if any.
    pub fn commitment(&self, actor: AgentId) -> Option<&Commitment> {
        self.commitments.get(&actor)
    }

    /// Drop the actor's commitment. Effects already applied are kept.
    pub fn abandon(&mut self, actor: AgentId) -> Option<Commitment> {
        let dropped = self.commitments.remove(&actor);
        if let Some(commitment) = &dropped {
            info!(
                actor = %actor,
                kind = ?commitment.action().kind(),
                start_tick = ?commitment.start_tick(),
                "commitment abandoned"
            );
        }
        dropped
    }

    /// The seed random draws are keyed on.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Key future random draws on `seed`.
    pub(crate) fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = tick_rng(seed, self.clock.tick());
    }

    /// A read-only view for eligibility checks and decisions.
    pub const fn view(&self) -> ActionContext<'_> {
        ActionContext {
            tick: self.clock.tick(),
            world: &self.world,
            rules: &self.rules,
            actors: &self.actors,
        }
    }
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError::Agent`] if an action hits a genuine fault (the
/// actor is returned to the directory first) and [`TickError::Clock`] if
/// the tick counter overflows.
pub fn run_tick(
    state: &mut SimulationState,
    decisions: &mut dyn DecisionSource,
) -> Result<TickSummary, TickError> {
    let tick = state.clock.tick();
    state.rng = tick_rng(state.seed, tick);
    info!(tick, year = state.clock.year(), month = state.clock.month(), "Tick started");

    let mut summary = TickSummary {
        tick,
        year: state.clock.year(),
        month: state.clock.month(),
        actors_alive: 0,
        commitments_started: 0,
        completed: Vec::new(),
        rejections: BTreeMap::new(),
        deaths: Vec::new(),
    };

    for id in state.actors.living_ids() {
        // An earlier actor's battle may have killed this one.
        if !state.actors.get(id).is_some_and(Actor::is_alive) {
            continue;
        }
        let mut actor = state
            .actors
            .take(id)
            .map_err(|source| TickError::Agent { agent_id: id, source })?;
        let result = step_actor(state, &mut actor, tick, decisions, &mut summary);
        let died = !actor.is_alive();
        state.actors.put_back(actor);
        let report = result.map_err(|source| TickError::Agent { agent_id: id, source })?;

        if died {
            record_death(state, id, &mut summary);
        }
        if let Some(battle) = report.as_ref().and_then(|r| r.battle.as_ref())
            && battle.loser_died
            && battle.loser != id
        {
            record_death(state, battle.loser, &mut summary);
        }
    }

    summary.actors_alive = u32::try_from(state.actors.living_count()).unwrap_or(u32::MAX);
    info!(
        tick,
        alive = summary.actors_alive,
        started = summary.commitments_started,
        completed = summary.completed.len(),
        deaths = summary.deaths.len(),
        "Tick completed"
    );

    state.clock.advance()?;
    Ok(summary)
}

/// The random stream for one tick.
fn tick_rng(seed: u64, tick: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ tick.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Run the age, decide, execute, and complete phases for one actor, who
/// has been taken out of the directory. Returns the step report if the
/// actor acted.
fn step_actor(
    state: &mut SimulationState,
    actor: &mut Actor,
    tick: u64,
    decisions: &mut dyn DecisionSource,
    summary: &mut TickSummary,
) -> Result<Option<StepReport>, AgentError> {
    // --- Age ---
    actor.lifespan.advance_month();
    if actor.lifespan.is_expired() {
        actor.die(DeathCause::OldAge, tick);
        return Ok(None);
    }

    // --- Decide ---
    if !state.commitments.contains_key(&actor.id) {
        let ctx = ActionContext {
            tick,
            world: &state.world,
            rules: &state.rules,
            actors: &state.actors,
        };
        match decisions.decide(actor, &ctx) {
            None => return Ok(None),
            Some(Intent::Narrate(gesture)) => {
                debug!(tick, actor = %actor.id, "narrative gesture");
                state.events.record(gesture.event(actor, tick));
                return Ok(None);
            }
            Some(Intent::Act(action)) => match action.can_start(actor, &ctx) {
                Ok(()) => {
                    let event = action.event(actor, &ctx);
                    info!(tick, actor = %actor.id, kind = ?action.kind(), "commitment started");
                    state.events.record(event);
                    state.commitments.insert(actor.id, Commitment::new(action));
                    summary.commitments_started = summary.commitments_started.saturating_add(1);
                }
                Err(rejection) => {
                    debug!(
                        tick,
                        actor = %actor.id,
                        kind = ?action.kind(),
                        reason = %rejection,
                        "commitment rejected"
                    );
                    summary.rejections.insert(actor.id, rejection);
                    return Ok(None);
                }
            },
        }
    }

    // --- Execute ---
    let Some(commitment) = state.commitments.get_mut(&actor.id) else {
        return Ok(None);
    };
    let start_tick = commitment.begin(tick);
    let mut exec = ExecutionContext {
        tick,
        world: &state.world,
        rules: &state.rules,
        actors: &mut state.actors,
        rng: &mut state.rng,
        resolver: state.resolver.as_mut(),
    };
    let mut report = commitment.action().execute(actor, &mut exec)?;
    debug!(tick, actor = %actor.id, kind = ?commitment.action().kind(), start_tick, "step executed");
    for event in std::mem::take(&mut report.events) {
        state.events.record(event);
    }

    if actor.hp.current() < 0 {
        actor.die(DeathCause::Wounds, tick);
    }

    // --- Complete ---
    let ctx = ActionContext {
        tick,
        world: &state.world,
        rules: &state.rules,
        actors: &state.actors,
    };
    if commitment.is_finished(actor, &ctx) {
        let kind = commitment.action().kind();
        match commitment.action().narrative_fact(actor, &report) {
            Some(fact) => {
                let text = state.story_teller.tell(&fact);
                let related = report
                    .battle
                    .as_ref()
                    .map_or_else(|| vec![actor.id], |b| vec![b.winner, b.loser]);
                state.events.record(Event::story(tick, text, related));
            }
            None if matches!(kind, ActionKind::Breakthrough | ActionKind::Battle) => {
                warn!(tick, actor = %actor.id, ?kind, "finished action produced no narrative fact");
            }
            None => {}
        }
        state.commitments.remove(&actor.id);
        summary.completed.push((actor.id, kind));
        info!(tick, actor = %actor.id, ?kind, start_tick, "commitment finished");
    }

    Ok(Some(report))
}

fn record_death(state: &mut SimulationState, id: AgentId, summary: &mut TickSummary) {
    let Some(actor) = state.actors.get(id) else {
        warn!(actor = %id, "dead actor missing from the directory");
        return;
    };
    let Some(record) = actor.death else {
        return;
    };
    let age_years = actor.lifespan.age_years();
    let text = match record.cause {
        DeathCause::OldAge => {
            format!("{} passed away of old age at {age_years} years", actor.name)
        }
        DeathCause::Wounds => format!("{} succumbed to their wounds", actor.name),
    };
    info!(
        tick = record.tick,
        actor = %id,
        name = %actor.name,
        cause = ?record.cause,
        realm = ?actor.realm(),
        "actor died"
    );
    summary.deaths.push(DeathNotice {
        agent_id: id,
        name: actor.name.clone(),
        cause: record.cause,
        realm: actor.realm(),
        age_years,
    });
    state.events.record(Event::major(record.tick, text, vec![id]));
    state.commitments.remove(&id);
}
