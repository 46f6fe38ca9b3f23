//! Actors and the actor directory.
//!
//! An [`Actor`] owns every piece of mutable rule state for one cultivator:
//! position, progression ledger, HP/MP pools, lifespan, inventory, and
//! spirit stones. The [`ActorDirectory`] indexes actors by ID and by
//! unique name.
//!
//! The tick driver takes the acting actor out of the directory while its
//! action runs, so the action holds `&mut Actor` for itself and can still
//! borrow a second actor mutably from the directory (Battle). Everything a
//! single action touches is therefore borrowed exactly once.

use std::collections::BTreeMap;

use ascension_types::{AgentId, Position, Realm, Root};
use serde::{Deserialize, Serialize};

use crate::config::Rulebook;
use crate::error::AgentError;
use crate::inventory::Inventory;
use crate::lifespan::Lifespan;
use crate::pools::{PoolKind, ResourcePool};
use crate::progression::ProgressionLedger;

// ---------------------------------------------------------------------------
// Death
// ---------------------------------------------------------------------------

/// Why an actor died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Age reached the lifespan.
    OldAge,
    /// HP fell below zero.
    Wounds,
}

/// When and how an actor died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    /// Cause of death.
    pub cause: DeathCause,
    /// Tick of death.
    pub tick: u64,
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// One cultivator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier.
    pub id: AgentId,
    /// Unique display name.
    pub name: String,
    /// Spiritual root.
    pub root: Root,
    /// Current tile.
    pub position: Position,
    /// Experience, level, realm, and bottleneck.
    pub ledger: ProgressionLedger,
    /// Hit points.
    pub hp: ResourcePool,
    /// Mana.
    pub mp: ResourcePool,
    /// Age and life expectancy.
    pub lifespan: Lifespan,
    /// Carried items.
    pub inventory: Inventory,
    /// Currency balance.
    pub spirit_stones: u64,
    /// Set once the actor dies.
    pub death: Option<DeathRecord>,
}

impl Actor {
    /// A new Qi Refinement actor at level 1 with full pools and the realm's
    /// baseline lifespan.
    pub fn new(name: &str, root: Root, position: Position, rules: &Rulebook) -> Self {
        let realm = Realm::QiRefinement;
        let stats = rules.realms.stats(realm);
        Self {
            id: AgentId::new(),
            name: name.to_owned(),
            root,
            position,
            ledger: ProgressionLedger::new(realm, rules),
            hp: ResourcePool::full(PoolKind::Health, stats.max_hp),
            mp: ResourcePool::full(PoolKind::Mana, stats.max_mp),
            lifespan: Lifespan::new(stats.lifespan_years),
            inventory: Inventory::new(),
            spirit_stones: 0,
            death: None,
        }
    }

    /// Current realm.
    pub const fn realm(&self) -> Realm {
        self.ledger.realm()
    }

    /// Whether the actor is alive.
    pub const fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Record death. A second call keeps the first record.
    pub fn die(&mut self, cause: DeathCause, tick: u64) {
        if self.death.is_none() {
            self.death = Some(DeathRecord { cause, tick });
        }
    }

    /// Enter the next realm: advance the ledger, raise both pool caps to the
    /// new realm's values (adding the increase to current), and raise the
    /// lifespan floor.
    ///
    /// Returns the new realm, or `None` with no change at the last realm.
    pub fn advance_realm(&mut self, rules: &Rulebook) -> Option<Realm> {
        let next = self.ledger.complete_breakthrough()?;
        let stats = rules.realms.stats(next);
        self.hp.raise_max(stats.max_hp);
        self.mp.raise_max(stats.max_mp);
        self.lifespan.raise_floor(stats.lifespan_years);
        Some(next)
    }
}

// ---------------------------------------------------------------------------
// ActorDirectory
// ---------------------------------------------------------------------------

/// All actors, indexed by ID and by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorDirectory {
    actors: BTreeMap<AgentId, Actor>,
    names: BTreeMap<String, AgentId>,
}

impl ActorDirectory {
    /// An empty directory.
    pub const fn new() -> Self {
        Self {
            actors: BTreeMap::new(),
            names: BTreeMap::new(),
        }
    }

    /// Register an actor.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateName`] if another actor has the name.
    pub fn insert(&mut self, actor: Actor) -> Result<AgentId, AgentError> {
        if let Some(existing) = self.names.get(&actor.name)
            && *existing != actor.id
        {
            return Err(AgentError::DuplicateName(actor.name));
        }
        let id = actor.id;
        self.names.insert(actor.name.clone(), id);
        self.actors.insert(id, actor);
        Ok(id)
    }

    /// Look up an actor by ID.
    pub fn get(&self, id: AgentId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Look up an actor by ID, mutably.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Look up an actor by name.
    pub fn by_name(&self, name: &str) -> Option<&Actor> {
        self.names.get(name).and_then(|id| self.actors.get(id))
    }

    /// Remove an actor for exclusive mutation. The name stays reserved
    /// until the actor is put back.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::AgentNotFound`] for unknown IDs.
    pub fn take(&mut self, id: AgentId) -> Result<Actor, AgentError> {
        self.actors.remove(&id).ok_or(AgentError::AgentNotFound(id))
    }

    /// Return an actor previously removed with [`take`](Self::take).
    pub fn put_back(&mut self, actor: Actor) {
        self.names.insert(actor.name.clone(), actor.id);
        self.actors.insert(actor.id, actor);
    }

    /// All actor IDs in ascending order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.actors.keys().copied().collect()
    }

    /// IDs of living actors in ascending order.
    pub fn living_ids(&self) -> Vec<AgentId> {
        self.actors
            .values()
            .filter(|a| a.is_alive())
            .map(|a| a.id)
            .collect()
    }

    /// Number of living actors.
    pub fn living_count(&self) -> usize {
        self.actors.values().filter(|a| a.is_alive()).count()
    }

    /// Iterate over all actors in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// Number of actors, living or dead.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn actor(name: &str) -> Actor {
        Actor::new(name, Root::Fire, Position::new(0, 0), &Rulebook::default())
    }

    #[test]
    fn new_actor_starts_full() {
        let a = actor("Lin");
        assert_eq!(a.realm(), Realm::QiRefinement);
        assert!(a.hp.is_full());
        assert!(a.mp.is_full());
        assert_eq!(a.lifespan.max_years, 100);
        assert!(a.is_alive());
    }

    #[test]
    fn advance_realm_raises_caps_and_heals_delta() {
        let rules = Rulebook::default();
        let mut a = actor("Lin");
        a.ledger = ProgressionLedger::at_level(Realm::QiRefinement, 30, &rules);
        a.hp.reduce(30);
        a.mp.reduce(10);
        a.lifespan.apply_penalty(20);

        assert_eq!(a.advance_realm(&rules), Some(Realm::FoundationEstablishment));
        assert_eq!(a.hp.max(), 300);
        assert_eq!(a.hp.current(), 270);
        assert_eq!(a.mp.max(), 150);
        assert_eq!(a.mp.current(), 140);
        assert_eq!(a.lifespan.max_years, 200);
    }

    #[test]
    fn death_is_recorded_once() {
        let mut a = actor("Lin");
        a.die(DeathCause::Wounds, 4);
        a.die(DeathCause::OldAge, 9);
        assert_eq!(
            a.death,
            Some(DeathRecord {
                cause: DeathCause::Wounds,
                tick: 4
            })
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut dir = ActorDirectory::new();
        dir.insert(actor("Lin")).unwrap();
        assert!(matches!(dir.insert(actor("Lin")), Err(AgentError::DuplicateName(_))));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn take_and_put_back() {
        let mut dir = ActorDirectory::new();
        let id = dir.insert(actor("Lin")).unwrap();
        let mut taken = dir.take(id).unwrap();
        assert!(dir.get(id).is_none());
        assert!(dir.take(id).is_err());
        taken.spirit_stones = 7;
        dir.put_back(taken);
        assert_eq!(dir.by_name("Lin").unwrap().spirit_stones, 7);
    }

    #[test]
    fn living_ids_skip_the_dead() {
        let mut dir = ActorDirectory::new();
        let a = dir.insert(actor("A")).unwrap();
        let b = dir.insert(actor("B")).unwrap();
        dir.get_mut(a).unwrap().die(DeathCause::OldAge, 1);
        assert_eq!(dir.living_ids(), vec![b]);
        assert_eq!(dir.living_count(), 1);
    }
}
