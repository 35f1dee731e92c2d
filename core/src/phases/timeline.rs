use std::sync::Arc;

use crate::combat_log::{Event, FightId};

/// Ordered phase checkpoints of one fight: entry `i` marks the start of phase `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    fight: FightId,
    checkpoints: Vec<Arc<Event>>,
}

impl Timeline {
    /// # Panics
    ///
    /// If `checkpoints` is empty or not ordered by time. Either means the
    /// checkpoint data is inconsistent and any phase answer would be wrong.
    pub fn new(fight: FightId, checkpoints: Vec<Event>) -> Self {
        assert!(
            !checkpoints.is_empty(),
            "timeline for fight {fight} has no checkpoints"
        );
        assert!(
            checkpoints.windows(2).all(|w| w[0].time <= w[1].time),
            "timeline for fight {fight} is not ordered by time"
        );

        Self {
            fight,
            checkpoints: checkpoints.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn fight(&self) -> FightId {
        self.fight
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Always false for a constructed timeline
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn checkpoints(&self) -> &[Arc<Event>] {
        &self.checkpoints
    }

    pub fn get(&self, phase: usize) -> Option<&Arc<Event>> {
        self.checkpoints.get(phase)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<Event>> + ExactSizeIterator {
        self.checkpoints.iter()
    }

    /// Index of the last checkpoint at or before `time`. Times before the
    /// first checkpoint are counted as the first phase.
    pub fn phase_of(&self, time: i64) -> usize {
        self.checkpoints
            .iter()
            .rposition(|c| c.time <= time)
            .unwrap_or(0)
    }

    pub fn phase_start(&self, time: i64) -> &Arc<Event> {
        &self.checkpoints[self.phase_of(time)]
    }

    /// Milliseconds since the start of the phase `time` falls in
    pub fn relative_time(&self, time: i64) -> i64 {
        time - self.phase_start(time).time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(times: &[i64]) -> Timeline {
        Timeline::new(1, times.iter().map(|&t| Event::marker(t, 1)).collect())
    }

    #[test]
    fn phase_is_last_checkpoint_at_or_before() {
        let t = timeline(&[-1, 1_000, 5_000, 9_000]);
        assert_eq!(t.phase_of(1_000), 1);
        assert_eq!(t.phase_of(4_999), 1);
        assert_eq!(t.phase_of(5_000), 2);
        assert_eq!(t.phase_of(20_000), 3);
    }

    #[test]
    fn relative_time_counts_from_phase_start() {
        let t = timeline(&[-1, 1_000, 5_000]);
        assert_eq!(t.relative_time(6_500), 1_500);
        assert_eq!(t.relative_time(5_000), 0);
        assert_eq!(t.phase_start(3_000).time, 1_000);
    }

    #[test]
    fn equal_checkpoints_resolve_to_the_later_phase() {
        let t = timeline(&[0, 2_000, 2_000]);
        assert_eq!(t.phase_of(2_000), 2);
    }

    #[test]
    #[should_panic(expected = "no checkpoints")]
    fn empty_timeline_panics() {
        Timeline::new(1, Vec::new());
    }

    #[test]
    #[should_panic(expected = "not ordered")]
    fn unordered_timeline_panics() {
        timeline(&[5_000, 1_000]);
    }
}
