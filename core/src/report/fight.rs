use serde::Deserialize;

use super::null_as_default;
use crate::combat_log::{ActorId, FightId};

/// Boundary metadata of one pull, as reported by the log host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fight {
    pub id: FightId,
    #[serde(rename = "encounterID")]
    pub encounter_id: i64,
    #[serde(rename = "startTime")]
    pub start_time: i64,
    #[serde(rename = "endTime")]
    pub end_time: i64,
    /// Boss health remaining at the end of the pull, in percent
    #[serde(rename = "fightPercentage", default, deserialize_with = "null_as_default")]
    pub completion_percent: f64,
    /// Index of the last phase reached (0 = the fight ended in the first phase)
    #[serde(rename = "lastPhaseAsAbsoluteIndex", default, deserialize_with = "null_as_default")]
    pub last_phase: usize,
    #[serde(rename = "friendlyPlayers", default, deserialize_with = "null_as_default")]
    pub participants: Vec<ActorId>,
}

impl Fight {
    pub fn duration_ms(&self) -> i64 {
        self.end_time - self.start_time
    }
}
