use std::sync::Arc;

use super::{Report, ReportError, cached};
use crate::combat_log::{Event, EventCollection, FightId};
use crate::phases::Timeline;
use crate::source::CheckpointEvents;

impl Report {
    /// Phase timeline of a fight, built on first use. `Ok(None)` for unknown fights.
    pub fn timeline(&self, fight_id: FightId) -> Result<Option<Arc<Timeline>>, ReportError> {
        let Some(fight) = self.fight(fight_id)? else {
            return Ok(None);
        };
        let timeline = cached(&self.timelines, fight_id, || {
            let checkpoints = if self.phase_model.needs_checkpoints(&fight) {
                self.source.fetch_checkpoint_events(&fight, &self.master)?
            } else {
                CheckpointEvents::default()
            };
            Ok(self.phase_model.build(&fight, &checkpoints)?)
        })?;
        Ok(Some(timeline))
    }

    /// Index of the phase `event` happened in
    pub fn phase(&self, event: &Event) -> Result<Option<usize>, ReportError> {
        Ok(self.timeline(event.fight)?.map(|t| t.phase_of(event.time)))
    }

    pub fn phase_name(&self, event: &Event) -> Result<Option<&'static str>, ReportError> {
        Ok(self
            .phase(event)?
            .and_then(|phase| self.phase_model.phase_name(phase)))
    }

    /// Checkpoint that started the phase `event` happened in
    pub fn phase_start(&self, event: &Event) -> Result<Option<Arc<Event>>, ReportError> {
        Ok(self
            .timeline(event.fight)?
            .map(|t| Arc::clone(t.phase_start(event.time))))
    }

    /// Milliseconds between the start of the event's phase and the event
    pub fn phase_relative_time(&self, event: &Event) -> Result<Option<i64>, ReportError> {
        Ok(self
            .timeline(event.fight)?
            .map(|t| t.relative_time(event.time)))
    }

    /// Start checkpoints of the named phases across every fight, fight by
    /// fight. Fights that never reached a phase contribute nothing for it.
    pub fn phase_starts(&self, names: &[&str]) -> Result<EventCollection<'_>, ReportError> {
        let starts = self
            .labelled_phase_starts(names)?
            .into_iter()
            .map(|(_, start)| start)
            .collect();
        Ok(EventCollection::new(self, starts))
    }

    /// Like [`Report::phase_starts`], each start paired with the phase it
    /// opens. Milestones sharing a timestamp keep their own names.
    pub fn labelled_phase_starts(
        &self,
        names: &[&str],
    ) -> Result<Vec<(&'static str, Arc<Event>)>, ReportError> {
        let model = &self.phase_model;
        let phases = names
            .iter()
            .map(|name| {
                let index = model.phase_index(name)?;
                Ok((index, model.phase_names()[index]))
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        let mut starts = Vec::new();
        for fight in self.fights() {
            let Some(timeline) = self.timeline(fight.id)? else {
                continue;
            };
            starts.extend(
                phases
                    .iter()
                    .filter_map(|&(i, name)| timeline.get(i).map(|e| (name, Arc::clone(e)))),
            );
        }
        Ok(starts)
    }
}
