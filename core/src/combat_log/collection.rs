//! Chainable, side-effect-free queries over events of one report.
//!
//! Every operation returns a new [`EventCollection`]; the underlying events
//! are shared (`Arc<Event>`) and never mutated. A collection always borrows
//! the [`Report`] it came from, since name and phase lookups need it.

use std::ops::Range;
use std::sync::Arc;

use super::{AbilitySelector, ActorId, CollectionError, Event, EventKind, FightId, NamedEvent};
use crate::report::{MasterData, Report, ReportError};

#[derive(Debug, Clone)]
pub struct EventCollection<'r> {
    report: &'r Report,
    events: Vec<Arc<Event>>,
}

impl<'r> EventCollection<'r> {
    pub fn new(report: &'r Report, events: Vec<Arc<Event>>) -> Self {
        Self { report, events }
    }

    pub fn empty(report: &'r Report) -> Self {
        Self::new(report, Vec::new())
    }

    fn derive(&self, events: Vec<Arc<Event>>) -> Self {
        Self::new(self.report, events)
    }

    fn retain(&self, mut keep: impl FnMut(&Event) -> bool) -> Self {
        self.derive(self.events.iter().filter(|e| keep(e)).cloned().collect())
    }

    fn master(&self) -> &'r MasterData {
        self.report.master()
    }

    // --- Accessors ---

    pub fn report(&self) -> &'r Report {
        self.report
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<Event>> + ExactSizeIterator {
        self.events.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Event>> {
        self.events.get(index)
    }

    pub fn first(&self) -> Option<&Arc<Event>> {
        self.events.first()
    }

    pub fn last(&self) -> Option<&Arc<Event>> {
        self.events.last()
    }

    /// Source ids in collection order
    pub fn sources(&self) -> Vec<ActorId> {
        self.events.iter().map(|e| e.source).collect()
    }

    /// Target ids in collection order
    pub fn targets(&self) -> Vec<ActorId> {
        self.events.iter().map(|e| e.target).collect()
    }

    // --- Filters ---

    pub fn of_kinds(&self, kinds: &[EventKind]) -> Self {
        self.retain(|e| kinds.contains(&e.kind))
    }

    pub fn of_kind(&self, kind: EventKind) -> Self {
        self.of_kinds(&[kind])
    }

    /// Events referencing any of the selected abilities. Events without an
    /// ability attribute never match.
    pub fn with_abilities(&self, selectors: &[AbilitySelector]) -> Self {
        let ids = AbilitySelector::resolve_all(selectors, self.master());
        self.retain(|e| e.ability_id().is_some_and(|id| ids.contains(&id)))
    }

    pub fn casts(&self, selectors: &[AbilitySelector]) -> Self {
        self.with_abilities(selectors).of_kind(EventKind::Cast)
    }

    /// Events whose source is any actor with one of the given names
    pub fn by(&self, names: &[&str]) -> Self {
        if self.is_empty() {
            return self.derive(Vec::new());
        }
        let ids = self.master().actor_ids_for(names);
        self.retain(|e| ids.contains(&e.source))
    }

    /// Events whose target is any actor with one of the given names
    pub fn to(&self, names: &[&str]) -> Self {
        if self.is_empty() {
            return self.derive(Vec::new());
        }
        let ids = self.master().actor_ids_for(names);
        self.retain(|e| ids.contains(&e.target))
    }

    pub fn by_actor(&self, id: ActorId) -> Self {
        self.retain(|e| e.source == id)
    }

    pub fn to_actor(&self, id: ActorId) -> Self {
        self.retain(|e| e.target == id)
    }

    pub fn by_players(&self) -> Self {
        let master = self.master();
        self.retain(|e| master.actor(e.source).is_some_and(|a| a.is_player()))
    }

    pub fn by_npcs(&self) -> Self {
        let master = self.master();
        self.retain(|e| master.actor(e.source).is_some_and(|a| a.is_npc()))
    }

    pub fn to_players(&self) -> Self {
        let master = self.master();
        self.retain(|e| master.actor(e.target).is_some_and(|a| a.is_player()))
    }

    pub fn to_npcs(&self) -> Self {
        let master = self.master();
        self.retain(|e| master.actor(e.target).is_some_and(|a| a.is_npc()))
    }

    pub fn in_fights(&self, fight_ids: &[FightId]) -> Self {
        self.retain(|e| fight_ids.contains(&e.fight))
    }

    /// Events classified into one of the named phases, ordered by
    /// phase-relative time. Unknown phase names are an error.
    pub fn in_phases(&self, names: &[&str]) -> Result<Self, ReportError> {
        let model = self.report.phase_model();
        let wanted = names
            .iter()
            .map(|name| model.phase_index(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut kept = Vec::new();
        for event in &self.events {
            if let Some(phase) = self.report.phase(event)?
                && wanted.contains(&phase)
            {
                kept.push(Arc::clone(event));
            }
        }
        self.derive(kept).sort_by_phase_time()
    }

    pub fn filter(&self, predicate: impl Fn(&Event) -> bool) -> Self {
        self.retain(predicate)
    }

    /// Events at or before the reference event's time, order preserved
    pub fn before(&self, event: &Event) -> Self {
        let time = event.time;
        self.retain(|e| e.time <= time)
    }

    /// Events at or after the reference event's time, order preserved
    pub fn after(&self, event: &Event) -> Self {
        let time = event.time;
        self.retain(|e| e.time >= time)
    }

    /// Events with `start <= time <= end`
    pub fn between(&self, start: i64, end: i64) -> Result<Self, CollectionError> {
        if start > end {
            return Err(CollectionError::InvalidWindow { start, end });
        }
        Ok(self.retain(|e| (start..=end).contains(&e.time)))
    }

    pub fn slice(&self, range: Range<usize>) -> Result<Self, CollectionError> {
        let len = self.events.len();
        match self.events.get(range.clone()) {
            Some(events) => Ok(self.derive(events.to_vec())),
            None => Err(CollectionError::OutOfRange {
                start: range.start,
                end: range.end,
                len,
            }),
        }
    }

    // --- Ordering ---

    /// Stable sort by time. `reverse` puts the most recent first.
    pub fn sort_by_time(&self, reverse: bool) -> Self {
        let mut events = self.events.clone();
        if reverse {
            events.sort_by(|a, b| b.time.cmp(&a.time));
        } else {
            events.sort_by_key(|e| e.time);
        }
        self.derive(events)
    }

    /// Stable sort by phase index. Events of unknown fights go last.
    pub fn sort_by_phase(&self) -> Result<Self, ReportError> {
        self.sort_by_fallible_key(|report, event| {
            Ok(report.phase(event)?.map(|p| p as i64))
        })
    }

    /// Stable sort by phase-relative time. Events of unknown fights go last.
    pub fn sort_by_phase_time(&self) -> Result<Self, ReportError> {
        self.sort_by_fallible_key(|report, event| report.phase_relative_time(event))
    }

    fn sort_by_fallible_key(
        &self,
        key: impl Fn(&Report, &Event) -> Result<Option<i64>, ReportError>,
    ) -> Result<Self, ReportError> {
        let mut keyed = self
            .events
            .iter()
            .map(|e| Ok((key(self.report, e)?.unwrap_or(i64::MAX), Arc::clone(e))))
            .collect::<Result<Vec<_>, ReportError>>()?;
        keyed.sort_by_key(|(k, _)| *k);
        Ok(self.derive(keyed.into_iter().map(|(_, e)| e).collect()))
    }

    // --- Combination ---

    /// Append `other` after `self`. Both must come from the same report.
    pub fn concat(&self, other: &EventCollection<'_>) -> Result<Self, CollectionError> {
        let (left, right) = (self.report.id(), other.report.id());
        if left != right {
            return Err(CollectionError::ContextMismatch { left, right });
        }
        let mut events = Vec::with_capacity(self.len() + other.len());
        events.extend(self.events.iter().cloned());
        events.extend(other.events.iter().cloned());
        Ok(self.derive(events))
    }

    // --- Projection ---

    /// Copy of every event with actor and ability ids replaced by names.
    /// Ids that do not resolve are kept as their decimal text.
    pub fn named(&self) -> Vec<NamedEvent> {
        let master = self.master();
        self.events
            .iter()
            .map(|event| {
                let fight_start = self
                    .report
                    .known_fight(event.fight)
                    .map(|f| f.start_time)
                    .unwrap_or_default();
                NamedEvent {
                    time: event.time,
                    fight_time: event.time - fight_start,
                    kind: event.kind,
                    source: master.actor_display_name(event.source),
                    target: master.actor_display_name(event.target),
                    fight: event.fight,
                    ability: event.ability_id().map(|id| master.ability_display_name(id)),
                    extra_ability: event
                        .extra_ability_id()
                        .map(|id| master.ability_display_name(id)),
                    attributes: event.attributes.clone(),
                }
            })
            .collect()
    }
}

impl<'a, 'r> IntoIterator for &'a EventCollection<'r> {
    type Item = &'a Arc<Event>;
    type IntoIter = std::slice::Iter<'a, Arc<Event>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
