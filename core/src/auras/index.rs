use std::sync::Arc;

use hashbrown::HashSet;

use super::CombatantSnapshot;
use crate::combat_log::{AbilityId, ActorId, Event, FightId};
use crate::report::Fight;

/// Identity of an aura instance: who has it and which ability it is
type AuraKey = (ActorId, Option<AbilityId>);

/// All aura events of one fight, most recent first.
///
/// Holds the synthetic pre-pull applies plus every apply/remove event of the
/// fight. Point-in-time lookups walk the list from the query time backwards
/// and stop caring about a key once its most recent occurrence is seen.
#[derive(Debug, Clone, PartialEq)]
pub struct AuraIndex {
    fight: FightId,
    recent_first: Vec<Arc<Event>>,
}

impl AuraIndex {
    pub fn build(fight: &Fight, snapshots: &[CombatantSnapshot], events: Vec<Event>) -> Self {
        let mut all: Vec<Event> = snapshots
            .iter()
            .flat_map(|snapshot| snapshot.prepull_applies(fight))
            .collect();
        let prepull = all.len();
        all.extend(events);

        // Stable ascending then reversed: for equal timestamps the event
        // later in the log counts as more recent.
        all.sort_by_key(|e| e.time);
        all.reverse();

        tracing::debug!(
            fight = fight.id,
            prepull,
            total = all.len(),
            "Built aura index"
        );

        Self {
            fight: fight.id,
            recent_first: all.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn fight(&self) -> FightId {
        self.fight
    }

    pub fn len(&self) -> usize {
        self.recent_first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent_first.is_empty()
    }

    /// Every indexed event, most recent first
    pub fn recent_first(&self) -> &[Arc<Event>] {
        &self.recent_first
    }

    /// Indexed events at or before `time`, most recent first
    fn as_of(&self, time: i64) -> &[Arc<Event>] {
        let from = self.recent_first.partition_point(|e| e.time > time);
        &self.recent_first[from..]
    }

    /// Auras active at `time`, as their most recent apply events, in
    /// chronological order. At most one entry per (target, ability).
    pub fn applied_at(&self, time: i64) -> Vec<Arc<Event>> {
        let mut seen: HashSet<AuraKey> = HashSet::new();
        let mut current: Vec<Arc<Event>> = self
            .as_of(time)
            .iter()
            .filter(|e| seen.insert((e.target, e.ability_id())) && e.kind.is_apply())
            .cloned()
            .collect();
        current.reverse();
        current
    }

    /// Every application of any of `abilities` during the fight, chronological
    pub fn applications(&self, abilities: &[AbilityId]) -> Vec<Arc<Event>> {
        self.recent_first
            .iter()
            .rev()
            .filter(|e| e.kind.is_apply() && e.ability_id().is_some_and(|id| abilities.contains(&id)))
            .cloned()
            .collect()
    }
}
