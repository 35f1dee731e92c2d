//! Dragonsong's Reprise checkpoint heuristics.
//!
//! The positions below were read off the ordered stream of NPC deaths and
//! became-targetable updates of real pulls. They hold for this encounter
//! only and are kept as literal data.

use crate::combat_log::Event;
use crate::report::Fight;
use crate::source::CheckpointEvents;

pub const PHASE_NAMES: &[&str] = &["P1", "P2", "P3", "P4", "I", "P5", "P6", "P7"];

/// Positions in the merged checkpoint stream of each milestone after P2 starts
const MILESTONES: &[usize] = &[
    2,  // Thordan dies
    4,  // Nidhogg dies
    8,  // both eyes dead
    12, // Thordan targetable
    16, // dragons targetable
    26, // Dragon-king Thordan targetable
];

/// In the door phase Adelphel and Charibert are separate targets, so a pull
/// that started in P1 has different targets at positions 0 and 2. Position 3
/// is Thordan appearing.
const P1_THORDAN_APPEARS: usize = 3;

/// Time given to the start of P1 when the pull began after it
pub const BEFORE_RECORDED_HISTORY: i64 = -1;

/// Deaths followed by became-targetable updates, stable sorted by time
fn merged_stream(checkpoints: &CheckpointEvents) -> Vec<&Event> {
    let mut merged: Vec<&Event> = checkpoints
        .deaths
        .iter()
        .chain(
            checkpoints
                .targetable_transitions
                .iter()
                .filter(|e| e.targetable() == Some(true)),
        )
        .collect();
    merged.sort_by_key(|e| e.time);
    merged
}

pub(super) fn checkpoints(fight: &Fight, checkpoints: &CheckpointEvents) -> Vec<Event> {
    let start = Event::marker(fight.start_time, fight.id);

    if fight.last_phase == 0 {
        return vec![start];
    }

    let merged = merged_stream(checkpoints);

    if fight.last_phase == 1 && merged.len() > 2 && merged[0].target != merged[2].target {
        let mut timeline = vec![start];
        timeline.extend(merged.get(P1_THORDAN_APPEARS).map(|e| (*e).clone()));
        return timeline;
    }

    let mut timeline = vec![Event::marker(BEFORE_RECORDED_HISTORY, fight.id), start];
    timeline.extend(
        MILESTONES
            .iter()
            .filter_map(|&i| merged.get(i))
            .map(|e| (*e).clone()),
    );
    timeline
}
