use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Report, ReportError, cached};
use crate::auras::AuraIndex;
use crate::combat_log::{AURA_KINDS, AbilityId, AbilitySelector, ActorId, Event, EventCollection, FightId};

impl Report {
    /// Aura index of a fight, built on first use. `Ok(None)` for unknown fights.
    pub fn aura_index(&self, fight_id: FightId) -> Result<Option<Arc<AuraIndex>>, ReportError> {
        let Some(fight) = self.fight(fight_id)? else {
            return Ok(None);
        };
        let index = cached(&self.auras, fight_id, || {
            let snapshots = self.source.fetch_prepull_snapshot(&fight)?;
            let events = self.source.fetch_typed_events(&fight, AURA_KINDS)?;
            Ok(AuraIndex::build(&fight, &snapshots, events))
        })?;
        Ok(Some(index))
    }

    /// Apply events of every aura active at the moment of `event`, chronological
    pub fn applied_at(&self, event: &Event) -> Result<EventCollection<'_>, ReportError> {
        let applied = self
            .aura_index(event.fight)?
            .map(|index| index.applied_at(event.time))
            .unwrap_or_default();
        Ok(EventCollection::new(self, applied))
    }

    /// Active ability ids per target at the moment of `event`
    pub fn active_at(&self, event: &Event) -> Result<BTreeMap<ActorId, Vec<AbilityId>>, ReportError> {
        let mut active: BTreeMap<ActorId, Vec<AbilityId>> = BTreeMap::new();
        for apply in &self.applied_at(event)? {
            if let Some(ability) = apply.ability_id() {
                active.entry(apply.target).or_default().push(ability);
            }
        }
        Ok(active)
    }

    /// Like [`active_at`](Self::active_at) with target and ability names
    pub fn active_at_named(&self, event: &Event) -> Result<BTreeMap<String, Vec<String>>, ReportError> {
        let mut active: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (target, abilities) in self.active_at(event)? {
            active
                .entry(self.master.actor_display_name(target))
                .or_default()
                .extend(abilities.into_iter().map(|id| self.master.ability_display_name(id)));
        }
        Ok(active)
    }

    /// Every application of the selected abilities during a fight, chronological
    pub fn aura(
        &self,
        selectors: &[AbilitySelector],
        fight_id: FightId,
    ) -> Result<EventCollection<'_>, ReportError> {
        let abilities = AbilitySelector::resolve_all(selectors, &self.master);
        if abilities.is_empty() {
            return Ok(EventCollection::empty(self));
        }
        let applied = self
            .aura_index(fight_id)?
            .map(|index| index.applications(&abilities))
            .unwrap_or_default();
        Ok(EventCollection::new(self, applied))
    }

    /// Names of the targets of each application of `name`, in application order
    pub fn aura_on(&self, name: &str, fight_id: FightId) -> Result<Vec<String>, ReportError> {
        let applied = self.aura(&[AbilitySelector::from(name)], fight_id)?;
        Ok(applied
            .targets()
            .into_iter()
            .map(|target| self.master.actor_display_name(target))
            .collect())
    }
}
